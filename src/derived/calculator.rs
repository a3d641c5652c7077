//! Derived measurements.
//!
//! Everything here is a pure function of a `ParameterSet`. The validator
//! calls `flat_area_height` for its minimum-legend check; the pipeline calls
//! `compute` once per request and threads the result into all three views.

use crate::domain::{DerivedValues, ParameterSet};
use crate::error::GeometryError;
use crate::geometry::TEMPLATE_WIDTH_MARGIN;
use crate::math::{arc_sagitta, fret_distances};

/// Smallest flat area (mm) under the radius notch that still fits a legible legend.
pub const MIN_FLAT_AREA_HEIGHT: f64 = 20.0;

/// Width gained per millimetre of fingerboard length.
pub fn taper_rate(params: &ParameterSet) -> Result<f64, GeometryError> {
    if !(params.neck_length > 0.0) {
        return Err(GeometryError::Degenerate {
            what: "fingerboard length",
            value: params.neck_length,
        });
    }
    Ok((params.fb_width_at_end - params.fb_width_at_nut) / params.neck_length)
}

/// Material left on the radius template under the deepest point of the notch.
///
/// The notch spans the widest fingerboard width, so this is the template
/// height minus the arc rise over that width.
pub fn flat_area_height(params: &ParameterSet) -> Result<f64, GeometryError> {
    let sagitta = arc_sagitta(params.fingerboard_radius, params.max_width())?;
    Ok(params.radius_template_height - sagitta)
}

pub fn compute(params: &ParameterSet) -> Result<DerivedValues, GeometryError> {
    let taper_rate = taper_rate(params)?;
    // The end is the widest point once validated, so one rise serves the
    // notch depth and the centre height at the join.
    let arc_sagitta_end = arc_sagitta(params.fingerboard_radius, params.max_width())?;
    let arc_sagitta_nut = arc_sagitta(params.fingerboard_radius, params.fb_width_at_nut)?;
    let flat_area_height = flat_area_height(params)?;

    let fret_distances = fret_distances(params.vibrating_length, params.num_frets);
    let fret_positions = fret_distances
        .iter()
        .map(|d| d / params.neck_length)
        .collect();

    Ok(DerivedValues {
        taper_rate,
        arc_sagitta: arc_sagitta_end,
        arc_sagitta_at_nut: arc_sagitta_nut,
        flat_area_height,
        fb_center_height_at_nut: params.fb_visible_height_at_nut + arc_sagitta_nut,
        fb_center_height_at_join: params.fb_visible_height_at_join + arc_sagitta_end,
        template_width: params.max_width() + TEMPLATE_WIDTH_MARGIN,
        fret_positions,
        fret_distances,
    })
}
