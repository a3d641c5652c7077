//! Shared "template pipeline" used by the CLI and by JSON callers.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> derive -> generate (x3) -> render (x3) -> response
//!
//! The response-shaped entry points (`generate*`, `derive*`) never return an
//! error: every failure ends up in the response's `errors` list. The CLI uses
//! the lower-level `run_templates` so it can map failures to exit codes.

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::derived::compute;
use crate::domain::{
    DerivedResponse, DerivedValues, GenerateResponse, ParameterSet, RawParams, ViewKind, Views,
};
use crate::error::{GeometryError, InputFormatError, PipelineError};
use crate::geometry;
use crate::io::request::parameters_from_document;
use crate::params::{ParameterRegistry, validate};
use crate::render::{RenderOptions, render_with};
use crate::report::format_derived;

/// All computed outputs of a single template run.
#[derive(Debug, Clone)]
pub struct TemplateRun {
    pub params: ParameterSet,
    pub derived: DerivedValues,
    pub views: Views,
}

/// Validate a raw request, logging and returning every violation on failure.
pub fn validated(
    registry: &ParameterRegistry,
    raw: &RawParams,
) -> Result<ParameterSet, Vec<String>> {
    validate(registry, raw).into_params().inspect_err(|errors| {
        warn!(count = errors.len(), "parameter validation failed");
    })
}

/// Derive once, then build and render the three views in parallel.
#[instrument(
    skip_all,
    fields(family = params.instrument_family.value(), frets = params.num_frets)
)]
pub fn run_templates(
    params: &ParameterSet,
    opts: &RenderOptions,
) -> Result<TemplateRun, PipelineError> {
    let derived = compute(params)?;
    debug!(
        taper_rate = derived.taper_rate,
        arc_sagitta = derived.arc_sagitta,
        flat_area_height = derived.flat_area_height,
        "derived values"
    );

    // Each view is independent; collect keeps ViewKind::ALL order.
    let rendered: Vec<String> = ViewKind::ALL
        .par_iter()
        .map(|&kind| render_view(kind, params, &derived, opts))
        .collect::<Result<_, _>>()?;

    let [side, top, cross_section] = <[String; 3]>::try_from(rendered).map_err(|v| {
        GeometryError::Degenerate {
            what: "rendered view count",
            value: v.len() as f64,
        }
    })?;

    Ok(TemplateRun {
        params: params.clone(),
        derived,
        views: Views {
            side,
            top,
            cross_section,
        },
    })
}

fn render_view(
    kind: ViewKind,
    params: &ParameterSet,
    derived: &DerivedValues,
    opts: &RenderOptions,
) -> Result<String, PipelineError> {
    let view = geometry::generate(kind, params, derived)?;
    debug!(
        view = kind.key(),
        groups = view.groups.len(),
        labels = view.labels.len(),
        width = view.bounds.width(),
        height = view.bounds.height(),
        "generated view"
    );
    Ok(render_with(&view, opts)?)
}

/// Full generation with default render options.
pub fn generate(registry: &ParameterRegistry, raw: &RawParams) -> GenerateResponse {
    generate_with(registry, raw, &RenderOptions::default())
}

#[instrument(skip_all, fields(keys = raw.len()))]
pub fn generate_with(
    registry: &ParameterRegistry,
    raw: &RawParams,
    opts: &RenderOptions,
) -> GenerateResponse {
    let params = match validated(registry, raw) {
        Ok(params) => params,
        Err(errors) => return GenerateResponse::failed(errors),
    };

    match run_templates(&params, opts) {
        Ok(run) => GenerateResponse::ok(run.views),
        Err(err) => {
            warn!(error = %err, "geometry generation failed");
            GenerateResponse::failed(vec![format!("Geometry generation failed: {err}")])
        }
    }
}

/// Generation from an already-parsed JSON payload (flat mapping or preset document).
pub fn generate_value(registry: &ParameterRegistry, payload: &Value) -> GenerateResponse {
    match parameters_from_document(payload.clone()) {
        Ok(raw) => generate(registry, &raw),
        Err(err) => GenerateResponse::failed(vec![err.to_string()]),
    }
}

/// JSON text in, JSON text out.
pub fn generate_json(registry: &ParameterRegistry, payload: &str) -> String {
    let response = match serde_json::from_str::<Value>(payload) {
        Ok(value) => generate_value(registry, &value),
        Err(err) => GenerateResponse::failed(vec![InputFormatError::Json(err).to_string()]),
    };
    to_json_or_fallback(&response)
}

/// Live-preview entry point: derived values and their display strings only.
#[instrument(skip_all, fields(keys = raw.len()))]
pub fn derive(registry: &ParameterRegistry, raw: &RawParams) -> DerivedResponse {
    let params = match validated(registry, raw) {
        Ok(params) => params,
        Err(errors) => return DerivedResponse::failed(errors),
    };

    match compute(&params) {
        Ok(values) => DerivedResponse {
            success: true,
            formatted: format_derived(&values),
            values: Some(values),
            errors: Vec::new(),
        },
        Err(err) => {
            DerivedResponse::failed(vec![format!("Derived value calculation failed: {err}")])
        }
    }
}

/// `derive` for a JSON payload.
pub fn derive_value(registry: &ParameterRegistry, payload: &Value) -> DerivedResponse {
    match parameters_from_document(payload.clone()) {
        Ok(raw) => derive(registry, &raw),
        Err(err) => DerivedResponse::failed(vec![err.to_string()]),
    }
}

fn to_json_or_fallback(response: &GenerateResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        serde_json::json!({
            "success": false,
            "views": null,
            "errors": [format!("Failed to serialize response: {err}")],
        })
        .to_string()
    })
}
