//! View generators.
//!
//! Three independent, pure generators turn `(ParameterSet, DerivedValues)`
//! into a `GeometryView` in y-up millimetre coordinates:
//!
//! - `side`: neck taper profile (visible height from nut to join)
//! - `top`: fingerboard outline with fret ticks
//! - `cross_section`: radius gauge with a printed legend
//!
//! Selection is a `match` on the closed `ViewKind` set. The generators share
//! no state, so they can run in any order or in parallel.

use crate::domain::{DerivedValues, GeometryView, ParameterSet, ViewKind};
use crate::error::GeometryError;

pub mod cross_section;
pub mod side;
pub mod top;

/// Extra material around the fingerboard on the templates (mm).
///
/// The side template hangs this far below the neck surface; the radius
/// template is this much wider than the fingerboard.
pub const TEMPLATE_WIDTH_MARGIN: f64 = 10.0;

/// Legend text height as a fraction of the radius template's flat area.
pub const TEXT_HEIGHT_FRACTION: f64 = 1.0 / 3.0;
/// Average glyph advance as a fraction of the text height.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;
/// Space around the legend as a fraction of its text height.
pub const TEXT_MARGIN_FRACTION: f64 = 0.3;

/// Size of dimension labels (mm).
pub const LABEL_SIZE: f64 = 3.0;
/// Size of fret-number labels (mm).
pub const FRET_LABEL_SIZE: f64 = 2.0;

/// Build one view.
pub fn generate(
    kind: ViewKind,
    params: &ParameterSet,
    derived: &DerivedValues,
) -> Result<GeometryView, GeometryError> {
    match kind {
        ViewKind::Side => side::generate(params, derived),
        ViewKind::Top => top::generate(params, derived),
        ViewKind::CrossSection => cross_section::generate(params, derived),
    }
}
