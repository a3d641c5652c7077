//! `GeometryView` -> print-scale SVG.
//!
//! One user unit is one millimetre: the root carries `width="{W}mm"` and
//! `height="{H}mm"` alongside a `viewBox` of exactly the same size, so the
//! template prints at 100% without any aspect-ratio fitting.
//!
//! Geometry is y-up; SVG is y-down. Every point goes through `Frame::map`,
//! which flips y and moves the padded bounding box to the origin.

use ::svg::Document;
use ::svg::node::element::{Polygon, Polyline, Text};

use crate::domain::{BoundingBox, GeometryView, Point, PointGroup, ShapeRole, TextAnchor};
use crate::error::RenderError;

/// Blank border around the drawing on every side (mm).
pub const SVG_MARGIN: f64 = 2.0;

/// Presentation settings. Geometry is never affected by these.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Stroke width for cut lines (mm). Reference lines use half of it.
    pub stroke_width: f64,
    pub font_family: String,
    pub show_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stroke_width: 0.25,
            font_family: "sans-serif".to_string(),
            show_labels: true,
        }
    }
}

pub fn render(view: &GeometryView) -> Result<String, RenderError> {
    render_with(view, &RenderOptions::default())
}

pub fn render_with(view: &GeometryView, opts: &RenderOptions) -> Result<String, RenderError> {
    if view.groups.iter().all(|g| g.points.is_empty()) {
        return Err(RenderError::EmptyView(view.kind.key()));
    }

    let frame = Frame::new(view.bounds.expanded(SVG_MARGIN));
    let width = fmt_coord(frame.bounds.width());
    let height = fmt_coord(frame.bounds.height());

    let mut document = Document::new()
        .set("width", format!("{width}mm"))
        .set("height", format!("{height}mm"))
        .set("viewBox", format!("0 0 {width} {height}"));

    for group in view.groups.iter().filter(|g| !g.points.is_empty()) {
        let points = frame.points_attr(&group.points);
        let (stroke, dash) = stroke_for(group.role, opts.stroke_width);
        if group.closed {
            let mut shape = base_polygon(points, group, stroke);
            if let Some(dash) = dash {
                shape = shape.set("stroke-dasharray", dash);
            }
            document = document.add(shape);
        } else {
            let mut shape = base_polyline(points, group, stroke);
            if let Some(dash) = dash {
                shape = shape.set("stroke-dasharray", dash);
            }
            document = document.add(shape);
        }
    }

    if opts.show_labels {
        for label in &view.labels {
            document = document.add(text_element(&frame, label, &opts.font_family));
        }
    }

    Ok(document.to_string())
}

/// Maps y-up template coordinates into the y-down SVG frame.
struct Frame {
    bounds: BoundingBox,
}

impl Frame {
    fn new(bounds: BoundingBox) -> Self {
        Self { bounds }
    }

    fn map(&self, p: &Point) -> (f64, f64) {
        (p.x - self.bounds.min_x, self.bounds.max_y - p.y)
    }

    fn points_attr(&self, points: &[Point]) -> String {
        points
            .iter()
            .map(|p| {
                let (x, y) = self.map(p);
                format!("{},{}", fmt_coord(x), fmt_coord(y))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn role_name(role: ShapeRole) -> &'static str {
    match role {
        ShapeRole::Outline => "outline",
        ShapeRole::Reference => "reference",
        ShapeRole::Arc => "arc",
        ShapeRole::Tick => "tick",
    }
}

fn stroke_for(role: ShapeRole, stroke_width: f64) -> (f64, Option<&'static str>) {
    match role {
        ShapeRole::Outline | ShapeRole::Arc | ShapeRole::Tick => (stroke_width, None),
        ShapeRole::Reference => (stroke_width / 2.0, Some("2,1")),
    }
}

fn base_polygon(points: String, group: &PointGroup, stroke: f64) -> Polygon {
    Polygon::new()
        .set("class", role_name(group.role))
        .set("points", points)
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", fmt_coord(stroke))
}

fn base_polyline(points: String, group: &PointGroup, stroke: f64) -> Polyline {
    Polyline::new()
        .set("class", role_name(group.role))
        .set("points", points)
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", fmt_coord(stroke))
}

fn text_element(frame: &Frame, label: &TextAnchor, font_family: &str) -> Text {
    let (x, y) = frame.map(&label.position);
    Text::new(label.text.clone())
        .set("x", fmt_coord(x))
        .set("y", fmt_coord(y))
        .set("font-size", fmt_coord(label.size))
        .set("font-family", font_family.to_string())
        .set("text-anchor", label.align.svg_value())
        .set("fill", "black")
}

/// Fixed three-decimal coordinate with trailing zeros removed.
pub fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::compute;
    use crate::domain::{InstrumentFamily, ViewKind};
    use crate::geometry;
    use crate::params::ParameterRegistry;
    use approx::assert_relative_eq;

    fn render_kind(family: InstrumentFamily, kind: ViewKind) -> (GeometryView, String) {
        let params = ParameterRegistry::new().defaults_for(family);
        let derived = compute(&params).unwrap();
        let view = geometry::generate(kind, &params, &derived).unwrap();
        let svg = render(&view).unwrap();
        (view, svg)
    }

    fn attr<'a>(svg: &'a str, name: &str) -> &'a str {
        let needle = format!(" {name}=\"");
        let start = svg.find(&needle).unwrap() + needle.len();
        let len = svg[start..].find('"').unwrap();
        &svg[start..start + len]
    }

    #[test]
    fn viewbox_is_bounds_plus_margin() {
        let (view, svg) = render_kind(InstrumentFamily::Violin, ViewKind::Side);
        let parts: Vec<f64> = attr(&svg, "viewBox")
            .split(' ')
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], 0.0);
        assert_eq!(parts[1], 0.0);
        assert_relative_eq!(parts[2], view.bounds.width() + 2.0 * SVG_MARGIN, epsilon = 1e-3);
        assert_relative_eq!(parts[3], view.bounds.height() + 2.0 * SVG_MARGIN, epsilon = 1e-3);
    }

    #[test]
    fn physical_size_matches_viewbox() {
        let (_, svg) = render_kind(InstrumentFamily::Guitar, ViewKind::Top);
        let viewbox: Vec<&str> = attr(&svg, "viewBox").split(' ').collect();
        assert_eq!(attr(&svg, "width"), format!("{}mm", viewbox[2]));
        assert_eq!(attr(&svg, "height"), format!("{}mm", viewbox[3]));
    }

    #[test]
    fn one_element_per_group_and_label() {
        let (view, svg) = render_kind(InstrumentFamily::Guitar, ViewKind::Top);
        let closed = view.groups.iter().filter(|g| g.closed).count();
        let open = view.groups.len() - closed;
        assert_eq!(svg.matches("<polygon").count(), closed);
        assert_eq!(svg.matches("<polyline").count(), open);
        assert_eq!(svg.matches("<text").count(), view.labels.len());
        assert_eq!(svg.matches("class=\"tick\"").count(), 20);
    }

    #[test]
    fn labels_can_be_switched_off() {
        let params = ParameterRegistry::new().defaults();
        let derived = compute(&params).unwrap();
        let view = geometry::generate(ViewKind::CrossSection, &params, &derived).unwrap();
        let opts = RenderOptions {
            show_labels: false,
            ..RenderOptions::default()
        };
        let svg = render_with(&view, &opts).unwrap();
        assert!(!svg.contains("<text"));
        assert!(render(&view).unwrap().contains("R 41 mm"));
    }

    #[test]
    fn output_is_byte_stable() {
        let (_, a) = render_kind(InstrumentFamily::Viol, ViewKind::CrossSection);
        let (_, b) = render_kind(InstrumentFamily::Viol, ViewKind::CrossSection);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_view_is_refused() {
        let (mut view, _) = render_kind(InstrumentFamily::Violin, ViewKind::Side);
        view.groups.clear();
        assert_eq!(render(&view), Err(RenderError::EmptyView("side")));
    }

    #[test]
    fn y_axis_is_flipped() {
        let frame = Frame::new(BoundingBox {
            min_x: -5.0,
            min_y: -10.0,
            max_x: 5.0,
            max_y: 10.0,
        });
        assert_eq!(frame.map(&Point::new(-5.0, 10.0)), (0.0, 0.0));
        assert_eq!(frame.map(&Point::new(5.0, -10.0)), (10.0, 20.0));
    }

    #[test]
    fn coordinates_use_three_decimals() {
        assert_eq!(fmt_coord(1.0), "1");
        assert_eq!(fmt_coord(1.23456), "1.235");
        assert_eq!(fmt_coord(-0.0001), "0");
        assert_eq!(fmt_coord(12.5), "12.5");
    }
}
