//! Cross-section view: the radius gauge template.
//!
//! A rectangular plate `template_width × radius_template_height`, centred on
//! x = 0, with a concave notch of the fingerboard radius cut into its top
//! edge. The notch spans the widest fingerboard width. The flat area under
//! the notch carries the radius legend and, optionally, the instrument name.
//!
//! The cut line is emitted as two open groups that meet at the notch ends:
//! the plate (shoulders, sides and base) and the tessellated arc.

use nalgebra::Vector2;

use crate::domain::{
    DerivedValues, GeometryView, ParameterSet, Point, PointGroup, ShapeRole, TextAlign,
    TextAnchor, ViewKind,
};
use crate::error::GeometryError;
use crate::math::{ArcSpec, intersect_lines};
use crate::report::format_mm;

use super::{TEXT_HEIGHT_FRACTION, TEXT_MARGIN_FRACTION, TEXT_WIDTH_FACTOR};

/// Instrument-name text size relative to the radius legend.
const NAME_SIZE_FRACTION: f64 = 0.5;

pub fn generate(
    params: &ParameterSet,
    derived: &DerivedValues,
) -> Result<GeometryView, GeometryError> {
    let height = params.radius_template_height;
    let half_width = derived.template_width / 2.0;

    let arc = notch_points(params.fingerboard_radius, params.max_width(), height)?;
    let (left, right) = match (arc.first(), arc.last()) {
        (Some(&l), Some(&r)) => (l, r),
        _ => {
            return Err(GeometryError::Degenerate {
                what: "radius notch",
                value: 0.0,
            });
        }
    };

    let plate = PointGroup::open(
        ShapeRole::Outline,
        vec![
            right,
            Point::new(half_width, height),
            Point::new(half_width, 0.0),
            Point::new(-half_width, 0.0),
            Point::new(-half_width, height),
            left,
        ],
    );
    let notch = PointGroup::open(ShapeRole::Arc, arc);

    let labels = legend(params, derived);
    GeometryView::new(ViewKind::CrossSection, vec![plate, notch], labels)
}

/// Tessellated notch, left to right, with both ends snapped onto the
/// shoulder line `y = shoulder_y`.
///
/// The ends are found by intersecting the radial line at the half-span angle
/// with the shoulder. Tessellation alone leaves them off the line by
/// rounding error, which shows up as a hairline step in the cut path.
pub fn notch_points(radius: f64, chord: f64, shoulder_y: f64) -> Result<Vec<Point>, GeometryError> {
    let arc = ArcSpec::notch(radius, chord, shoulder_y)?;
    let mut points = arc.tessellate();

    let shoulder = Point::new(0.0, shoulder_y);
    let along = Vector2::new(1.0, 0.0);
    let left = intersect_lines(
        arc.center,
        arc.direction(-arc.half_span),
        shoulder,
        along,
        "left notch end",
    )?;
    let right = intersect_lines(
        arc.center,
        arc.direction(arc.half_span),
        shoulder,
        along,
        "right notch end",
    )?;

    let last = points.len() - 1;
    points[0] = left;
    points[last] = right;
    Ok(points)
}

/// Sizing of the legend block in the flat area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    /// Text height of the radius legend (mm).
    pub text_height: f64,
    /// Space kept between the text and the plate edges (mm).
    pub margin: f64,
}

/// Size the radius legend from the flat area, shrinking it until it fits
/// between the plate edges.
///
/// Both the text width and the margins scale with the text height, so the
/// fitting height is solved for directly.
pub fn legend_layout(text: &str, flat_area_height: f64, plate_width: f64) -> LegendLayout {
    let chars = text.chars().count().max(1) as f64;
    let fitting = plate_width / (TEXT_WIDTH_FACTOR * chars + 2.0 * TEXT_MARGIN_FRACTION);
    let text_height = (flat_area_height * TEXT_HEIGHT_FRACTION).min(fitting).max(0.0);

    LegendLayout {
        text_height,
        margin: text_height * TEXT_MARGIN_FRACTION,
    }
}

fn legend(params: &ParameterSet, derived: &DerivedValues) -> Vec<TextAnchor> {
    let text = format!("R {} mm", format_mm(params.fingerboard_radius));
    let flat = derived.flat_area_height;
    let layout = legend_layout(&text, flat, derived.template_width);

    let name = params.instrument_name.trim();
    if !params.show_measurements || name.is_empty() {
        return vec![TextAnchor::new(
            Point::new(0.0, (flat - layout.text_height) / 2.0),
            text,
            layout.text_height,
            TextAlign::Middle,
        )];
    }

    let name_limit = legend_layout(name, flat, derived.template_width).text_height;
    let name_size = (layout.text_height * NAME_SIZE_FRACTION).min(name_limit);
    let block = layout.text_height + layout.margin + name_size;
    let bottom = (flat - block) / 2.0;

    vec![
        TextAnchor::new(
            Point::new(0.0, bottom + name_size + layout.margin),
            text,
            layout.text_height,
            TextAlign::Middle,
        ),
        TextAnchor::new(
            Point::new(0.0, bottom),
            name.to_string(),
            name_size,
            TextAlign::Middle,
        ),
    ]
}
