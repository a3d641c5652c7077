//! Side view: the neck taper template.
//!
//! The x axis runs along the fingerboard from the nut (x = 0) to the join
//! (x = neck_length). The neck surface is y = 0; the template's top edge is
//! the straight taper between the two visible heights and its bottom edge
//! hangs `TEMPLATE_WIDTH_MARGIN` below the surface.

use crate::domain::{
    DerivedValues, GeometryView, ParameterSet, Point, PointGroup, ShapeRole, TextAlign,
    TextAnchor, ViewKind,
};
use crate::error::GeometryError;
use crate::report::format_mm;

use super::{LABEL_SIZE, TEMPLATE_WIDTH_MARGIN};

/// Gap between a labelled edge and its text baseline (mm).
const LABEL_GAP: f64 = 1.0;

pub fn generate(
    params: &ParameterSet,
    _derived: &DerivedValues,
) -> Result<GeometryView, GeometryError> {
    let length = params.neck_length;
    let h_nut = params.fb_visible_height_at_nut;
    let h_join = params.fb_visible_height_at_join;
    let m = TEMPLATE_WIDTH_MARGIN;

    let outline = PointGroup::closed(
        ShapeRole::Outline,
        vec![
            Point::new(0.0, -m),
            Point::new(length, -m),
            Point::new(length, h_join),
            Point::new(0.0, h_nut),
        ],
    );
    let surface = PointGroup::open(
        ShapeRole::Reference,
        vec![Point::new(0.0, 0.0), Point::new(length, 0.0)],
    );

    let mut labels = Vec::new();
    if params.show_measurements {
        labels.push(TextAnchor::new(
            Point::new(0.0, h_nut + LABEL_GAP),
            format!("Nut {} mm", format_mm(h_nut)),
            LABEL_SIZE,
            TextAlign::Start,
        ));
        labels.push(TextAnchor::new(
            Point::new(length, h_join + LABEL_GAP),
            format!("Join {} mm", format_mm(h_join)),
            LABEL_SIZE,
            TextAlign::End,
        ));
        // Centred in the strip between the surface and the bottom edge.
        labels.push(TextAnchor::new(
            Point::new(length / 2.0, -(m + LABEL_SIZE) / 2.0),
            format!("{} mm", format_mm(length)),
            LABEL_SIZE,
            TextAlign::Middle,
        ));
    }

    GeometryView::new(ViewKind::Side, vec![outline, surface], labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::compute;
    use crate::params::ParameterRegistry;
    use approx::assert_relative_eq;

    #[test]
    fn outline_follows_the_taper() {
        let params = ParameterRegistry::new().defaults();
        let view = generate(&params, &compute(&params).unwrap()).unwrap();

        let outline = view.outline().unwrap();
        assert!(outline.closed);
        assert_eq!(outline.points.len(), 4);
        assert_relative_eq!(outline.points[2].x, 270.0);
        assert_relative_eq!(outline.points[2].y, 1.2);
        assert_relative_eq!(outline.points[3].y, 3.2);
        assert_relative_eq!(view.bounds.min_y, -TEMPLATE_WIDTH_MARGIN);
        assert_eq!(view.tick_count(), 0);
    }

    #[test]
    fn labels_follow_show_measurements() {
        let mut params = ParameterRegistry::new().defaults();
        let derived = compute(&params).unwrap();
        let view = generate(&params, &derived).unwrap();
        assert_eq!(view.labels.len(), 3);
        assert_eq!(view.labels[0].text, "Nut 3.2 mm");
        assert_eq!(view.labels[1].text, "Join 1.2 mm");
        assert_eq!(view.labels[2].text, "270 mm");

        params.show_measurements = false;
        assert!(generate(&params, &derived).unwrap().labels.is_empty());
    }
}
