//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built per request and dropped after the response is serialized
//! - exported to JSON for an external UI layer
//! - compared in tests (determinism checks compare whole values)

use std::collections::BTreeMap;

use clap::ValueEnum;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::TEXT_WIDTH_FACTOR;

/// A raw, untyped request: parameter key -> JSON value.
pub type RawParams = serde_json::Map<String, serde_json::Value>;

/// A 2D point in template millimetres (y up).
pub type Point = Point2<f64>;

/// Instrument family. Drives family-specific defaults (fret count, scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentFamily {
    Violin,
    Viol,
    Guitar,
}

impl InstrumentFamily {
    pub const ALL: [InstrumentFamily; 3] = [
        InstrumentFamily::Violin,
        InstrumentFamily::Viol,
        InstrumentFamily::Guitar,
    ];

    /// Wire value used in requests and in the definitions export.
    pub fn value(self) -> &'static str {
        match self {
            InstrumentFamily::Violin => "VIOLIN",
            InstrumentFamily::Viol => "VIOL",
            InstrumentFamily::Guitar => "GUITAR",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            InstrumentFamily::Violin => "Violin",
            InstrumentFamily::Viol => "Viol",
            InstrumentFamily::Guitar => "Guitar",
        }
    }

    /// Case-insensitive match against the wire values.
    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.value().eq_ignore_ascii_case(value))
    }
}

/// A fully validated, typed parameter set.
///
/// Values of this type only come out of the validator or the registry's
/// defaults, so every field is known to satisfy its definition and the
/// cross-field constraints. Nothing downstream looks parameters up by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub instrument_name: String,
    pub instrument_family: InstrumentFamily,
    pub fingerboard_radius: f64,
    pub fb_width_at_nut: f64,
    pub fb_width_at_end: f64,
    pub fb_visible_height_at_nut: f64,
    pub fb_visible_height_at_join: f64,
    pub num_frets: u32,
    pub neck_length: f64,
    pub vibrating_length: f64,
    pub radius_template_height: f64,
    pub show_measurements: bool,
}

impl ParameterSet {
    /// The wider of the two fingerboard widths (the one the radius must span).
    pub fn max_width(&self) -> f64 {
        self.fb_width_at_nut.max(self.fb_width_at_end)
    }

    /// Convert back into a raw mapping (e.g. to write a preset document).
    pub fn to_raw(&self) -> RawParams {
        use serde_json::Value;

        let mut map = RawParams::new();
        map.insert("instrument_name".into(), Value::from(self.instrument_name.clone()));
        map.insert(
            "instrument_family".into(),
            Value::from(self.instrument_family.value()),
        );
        map.insert("fingerboard_radius".into(), Value::from(self.fingerboard_radius));
        map.insert("fb_width_at_nut".into(), Value::from(self.fb_width_at_nut));
        map.insert("fb_width_at_end".into(), Value::from(self.fb_width_at_end));
        map.insert(
            "fb_visible_height_at_nut".into(),
            Value::from(self.fb_visible_height_at_nut),
        );
        map.insert(
            "fb_visible_height_at_join".into(),
            Value::from(self.fb_visible_height_at_join),
        );
        map.insert("num_frets".into(), Value::from(self.num_frets));
        map.insert("neck_length".into(), Value::from(self.neck_length));
        map.insert("vibrating_length".into(), Value::from(self.vibrating_length));
        map.insert(
            "radius_template_height".into(),
            Value::from(self.radius_template_height),
        );
        map.insert("show_measurements".into(), Value::from(self.show_measurements));
        map
    }
}

/// Secondary measurements computed from a `ParameterSet`.
///
/// Recomputed per request; never cached or mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    /// Width gained per millimetre of fingerboard length (mm/mm).
    pub taper_rate: f64,
    /// Arc rise over the widest fingerboard width (the radius template chord).
    pub arc_sagitta: f64,
    /// Arc rise over the nut width.
    pub arc_sagitta_at_nut: f64,
    /// Material left under the radius notch on the template.
    pub flat_area_height: f64,
    /// Visible edge height plus crown rise, at the nut.
    pub fb_center_height_at_nut: f64,
    /// Visible edge height plus crown rise, at the join.
    pub fb_center_height_at_join: f64,
    /// Overall width of the radius template plate.
    pub template_width: f64,
    /// Fret positions as fractions of the fingerboard length (strictly increasing).
    pub fret_positions: Vec<f64>,
    /// Fret distances from the nut (mm).
    pub fret_distances: Vec<f64>,
}

/// The three views, as a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Side,
    Top,
    CrossSection,
}

impl ViewKind {
    /// Response order: side, top, cross_section.
    pub const ALL: [ViewKind; 3] = [ViewKind::Side, ViewKind::Top, ViewKind::CrossSection];

    pub fn key(self) -> &'static str {
        match self {
            ViewKind::Side => "side",
            ViewKind::Top => "top",
            ViewKind::CrossSection => "cross_section",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ViewKind::Side => "Side View",
            ViewKind::Top => "Top View",
            ViewKind::CrossSection => "Cross-Section",
        }
    }
}

/// What a point group depicts. Drives stroke styling in the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRole {
    /// Cut line of the template.
    Outline,
    /// Construction/reference line (centreline, neck surface).
    Reference,
    /// Tessellated circular arc (the radius notch).
    Arc,
    /// Fret tick mark.
    Tick,
}

/// One drawn shape: an ordered run of points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    pub role: ShapeRole,
    pub points: Vec<Point>,
    /// Closed groups render as polygons, open ones as polylines.
    pub closed: bool,
}

impl PointGroup {
    pub fn closed(role: ShapeRole, points: Vec<Point>) -> Self {
        Self {
            role,
            points,
            closed: true,
        }
    }

    pub fn open(role: ShapeRole, points: Vec<Point>) -> Self {
        Self {
            role,
            points,
            closed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

impl TextAlign {
    pub fn svg_value(self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Middle => "middle",
            TextAlign::End => "end",
        }
    }
}

/// A text label. `position` is the baseline anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnchor {
    pub position: Point,
    pub text: String,
    /// Cap height in millimetres (SVG `font-size`).
    pub size: f64,
    pub align: TextAlign,
}

impl TextAnchor {
    pub fn new(position: Point, text: impl Into<String>, size: f64, align: TextAlign) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            align,
        }
    }

    /// Approximate footprint, using the same width heuristic the legend sizing uses.
    pub fn estimated_extent(&self) -> (Point, Point) {
        let width = self.text.chars().count() as f64 * self.size * TEXT_WIDTH_FACTOR;
        let x0 = match self.align {
            TextAlign::Start => self.position.x,
            TextAlign::Middle => self.position.x - width / 2.0,
            TextAlign::End => self.position.x - width,
        };
        (
            Point::new(x0, self.position.y),
            Point::new(x0 + width, self.position.y + self.size),
        )
    }
}

/// Axis-aligned bounding box in template millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounding box of a point cloud, or `None` if it is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bb.include(p);
        }
        Some(bb)
    }

    pub fn include(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        BoundingBox {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}

/// One generated view: shapes + labels + bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryView {
    pub kind: ViewKind,
    pub groups: Vec<PointGroup>,
    pub labels: Vec<TextAnchor>,
    pub bounds: BoundingBox,
}

impl GeometryView {
    /// Assemble a view and compute its bounds (shapes plus estimated label extents).
    pub fn new(
        kind: ViewKind,
        groups: Vec<PointGroup>,
        labels: Vec<TextAnchor>,
    ) -> Result<Self, GeometryError> {
        let all_finite = groups
            .iter()
            .flat_map(|g| g.points.iter())
            .chain(labels.iter().map(|l| &l.position))
            .all(|p| p.x.is_finite() && p.y.is_finite());
        if !all_finite {
            return Err(GeometryError::NonFinite {
                quantity: kind.key(),
            });
        }

        let mut bounds = BoundingBox::from_points(groups.iter().flat_map(|g| g.points.iter()))
            .ok_or(GeometryError::Degenerate {
                what: "view without shapes",
                value: 0.0,
            })?;
        for label in &labels {
            let (lo, hi) = label.estimated_extent();
            bounds.include(&lo);
            bounds.include(&hi);
        }

        Ok(Self {
            kind,
            groups,
            labels,
            bounds,
        })
    }

    /// Number of fret tick marks in this view.
    pub fn tick_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.role == ShapeRole::Tick)
            .count()
    }

    pub fn outline(&self) -> Option<&PointGroup> {
        self.groups.iter().find(|g| g.role == ShapeRole::Outline)
    }
}

/// Outcome of validating a raw request.
///
/// `valid` is true exactly when `params` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    #[serde(skip)]
    pub params: Option<ParameterSet>,
}

impl ValidationResult {
    pub fn accepted(params: ParameterSet) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            params: Some(params),
        }
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            params: None,
        }
    }

    pub fn into_params(self) -> Result<ParameterSet, Vec<String>> {
        match self.params {
            Some(params) if self.valid => Ok(params),
            _ => Err(self.errors),
        }
    }
}

/// The three rendered SVG documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Views {
    pub side: String,
    pub top: String,
    pub cross_section: String,
}

impl Views {
    pub fn get(&self, kind: ViewKind) -> &str {
        match kind {
            ViewKind::Side => &self.side,
            ViewKind::Top => &self.top,
            ViewKind::CrossSection => &self.cross_section,
        }
    }
}

/// Response of the full generation entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub views: Option<Views>,
    pub errors: Vec<String>,
}

impl GenerateResponse {
    pub fn ok(views: Views) -> Self {
        Self {
            success: true,
            views: Some(views),
            errors: Vec::new(),
        }
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            success: false,
            views: None,
            errors,
        }
    }
}

/// Response of the live-preview entry point (no rendering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedResponse {
    pub success: bool,
    pub values: Option<DerivedValues>,
    /// Display strings keyed like the fields of `DerivedValues` (e.g. `"5.79 mm"`).
    pub formatted: BTreeMap<String, String>,
    pub errors: Vec<String>,
}

impl DerivedResponse {
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            success: false,
            values: None,
            formatted: BTreeMap::new(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_values_match_case_insensitively() {
        assert_eq!(InstrumentFamily::from_value("viol"), Some(InstrumentFamily::Viol));
        assert_eq!(InstrumentFamily::from_value(" GUITAR "), Some(InstrumentFamily::Guitar));
        assert_eq!(InstrumentFamily::from_value("cello"), None);
    }

    #[test]
    fn view_bounds_cover_labels() {
        let groups = vec![PointGroup::closed(
            ShapeRole::Outline,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 5.0)],
        )];
        let labels = vec![TextAnchor::new(Point::new(10.0, 5.0), "abc", 2.0, TextAlign::Start)];
        let view = GeometryView::new(ViewKind::Side, groups, labels).unwrap();
        assert!(view.bounds.max_x > 10.0);
        assert!((view.bounds.max_y - 7.0).abs() < 1e-12);
    }

    #[test]
    fn view_without_shapes_is_degenerate() {
        let err = GeometryView::new(ViewKind::Top, Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, GeometryError::Degenerate { .. }));
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let groups = vec![PointGroup::open(
            ShapeRole::Reference,
            vec![Point::new(0.0, f64::NAN), Point::new(1.0, 1.0)],
        )];
        let err = GeometryView::new(ViewKind::Top, groups, Vec::new()).unwrap_err();
        assert!(matches!(err, GeometryError::NonFinite { .. }));
    }

    #[test]
    fn raw_round_trip_keeps_family_wire_value() {
        let set = ParameterSet {
            instrument_name: "Test".into(),
            instrument_family: InstrumentFamily::Viol,
            fingerboard_radius: 41.0,
            fb_width_at_nut: 24.0,
            fb_width_at_end: 42.0,
            fb_visible_height_at_nut: 3.2,
            fb_visible_height_at_join: 1.2,
            num_frets: 7,
            neck_length: 270.0,
            vibrating_length: 328.0,
            radius_template_height: 40.0,
            show_measurements: true,
        };
        let raw = set.to_raw();
        assert_eq!(raw["instrument_family"], "VIOL");
        assert_eq!(raw["num_frets"], 7);
    }
}
