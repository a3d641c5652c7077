//! Error types.
//!
//! - `AppError`: what the `neckgen` binary reports (message + process exit code)
//! - `GeometryError`, `RenderError`, `InputFormatError`: library-level failures
//! - `PipelineError`: either of the first two, as seen by the orchestrator
//!
//! Validation problems are *not* errors in this sense: they are collected as
//! human-readable strings in a `ValidationResult` so every violation can be
//! reported at once.

use thiserror::Error;

/// Exit code for bad input (unreadable request, failed validation).
pub const EXIT_INPUT: u8 = 2;
/// Exit code for filesystem failures while writing outputs.
pub const EXIT_IO: u8 = 3;
/// Exit code for geometry/render failures.
pub const EXIT_GEOMETRY: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<InputFormatError> for AppError {
    fn from(err: InputFormatError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

impl From<GeometryError> for AppError {
    fn from(err: GeometryError) -> Self {
        AppError::new(EXIT_GEOMETRY, err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::new(EXIT_GEOMETRY, err.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(EXIT_GEOMETRY, err.to_string())
    }
}

/// A derived or geometric computation left its numeric domain.
///
/// Validated parameters never trigger these; they exist so the math helpers
/// stay total on their own.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// `arc_sagitta` called with a chord that does not fit the circle.
    #[error("arc undefined: chord {chord:.3} mm does not fit radius {radius:.3} mm")]
    ArcDomain { radius: f64, chord: f64 },

    /// Two lines were too close to parallel to intersect reliably.
    #[error("near-parallel lines in {context} (|cross| = {cross:e})")]
    NearParallel { context: &'static str, cross: f64 },

    /// A computed quantity came out NaN or infinite.
    #[error("non-finite value for {quantity}")]
    NonFinite { quantity: &'static str },

    /// A divisor that must be positive was zero or negative.
    #[error("degenerate {what}: {value}")]
    Degenerate { what: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("view '{0}' has no geometry to render")]
    EmptyView(&'static str),
}

/// Anything that can go wrong after validation succeeded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The request payload itself is malformed (before any validation).
#[derive(Debug, Error)]
pub enum InputFormatError {
    #[error("Invalid parameter JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parameters must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
