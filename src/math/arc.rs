//! Circular-arc helpers for the fingerboard radius.
//!
//! - `arc_sagitta(r, c)`: rise of an arc of radius `r` over a chord of width `c`
//! - `ArcSpec`: a concave notch of given radius sitting on a horizontal chord,
//!   tessellated into equal angular steps
//! - `intersect_lines`: line/line intersection with a near-parallel guard
//!
//! Numerical notes:
//! - `r - sqrt(r² - h²)` cancels badly when `r ≫ h` (flat guitar radii).
//!   We use the equivalent `h² / (r + sqrt(r² - h²))`.
//! - The arc is undefined for `c ≥ 2r`; validated parameters never get there,
//!   but these helpers still refuse rather than return NaN.

use nalgebra::Vector2;

use crate::domain::Point;
use crate::error::GeometryError;

/// Cross products smaller than this are treated as parallel.
pub const EPSILON: f64 = 1e-10;

/// Number of equal angular steps used to approximate an arc.
pub const ARC_POINT_RESOLUTION: usize = 50;

/// Rise of a circular arc of `radius` above a chord of width `chord`.
pub fn arc_sagitta(radius: f64, chord: f64) -> Result<f64, GeometryError> {
    let in_domain = radius.is_finite()
        && chord.is_finite()
        && radius > 0.0
        && chord >= 0.0
        && chord < 2.0 * radius;
    if !in_domain {
        return Err(GeometryError::ArcDomain { radius, chord });
    }

    let half = chord / 2.0;
    let leg = (radius * radius - half * half).sqrt();
    Ok(half * half / (radius + leg))
}

/// A circular arc hanging below its center: the profile of a concave
/// radius gauge cut into the top edge of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSpec {
    pub center: Point,
    pub radius: f64,
    /// Angle (radians) from straight down to either end of the arc.
    pub half_span: f64,
    pub resolution: usize,
}

impl ArcSpec {
    /// Arc of `radius` whose ends sit at `(±chord/2, chord_y)`.
    pub fn notch(radius: f64, chord: f64, chord_y: f64) -> Result<Self, GeometryError> {
        let sagitta = arc_sagitta(radius, chord)?;
        let half_span = (chord / (2.0 * radius)).asin();
        if !half_span.is_finite() {
            return Err(GeometryError::NonFinite {
                quantity: "arc half-span",
            });
        }

        Ok(Self {
            center: Point::new(0.0, chord_y - sagitta + radius),
            radius,
            half_span,
            resolution: ARC_POINT_RESOLUTION,
        })
    }

    /// Unit direction from the center towards the arc point at `theta`
    /// (0 = straight down, positive towards +x).
    pub fn direction(&self, theta: f64) -> Vector2<f64> {
        Vector2::new(theta.sin(), -theta.cos())
    }

    pub fn point_at(&self, theta: f64) -> Point {
        self.center + self.direction(theta) * self.radius
    }

    /// Deepest point of the arc.
    pub fn lowest_point(&self) -> Point {
        Point::new(self.center.x, self.center.y - self.radius)
    }

    /// `resolution + 1` points from the left end (-half_span) to the right end.
    pub fn tessellate(&self) -> Vec<Point> {
        let steps = self.resolution.max(1);
        let step = 2.0 * self.half_span / steps as f64;
        (0..=steps)
            .map(|i| self.point_at(-self.half_span + step * i as f64))
            .collect()
    }
}

/// Intersect the line `p + t·d` with the line `q + s·e`.
///
/// Returns `GeometryError::NearParallel` when `|d × e| < EPSILON` instead of
/// dividing by a vanishing denominator.
pub fn intersect_lines(
    p: Point,
    d: Vector2<f64>,
    q: Point,
    e: Vector2<f64>,
    context: &'static str,
) -> Result<Point, GeometryError> {
    let cross = d.x * e.y - d.y * e.x;
    if cross.abs() < EPSILON {
        return Err(GeometryError::NearParallel { context, cross });
    }
    let w = q - p;
    let t = (w.x * e.y - w.y * e.x) / cross;
    Ok(p + d * t)
}
