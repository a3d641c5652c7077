//! Top view: fingerboard outline with fret ticks.
//!
//! - trapezoid from the nut width (x = 0) to the end width (x = neck_length),
//!   symmetric about the centreline y = 0
//! - one perpendicular tick per fret at `fraction · neck_length`, spanning the
//!   local width `wn + taper_rate · x`
//! - a fret-number label above each tick

use crate::domain::{
    DerivedValues, GeometryView, ParameterSet, Point, PointGroup, ShapeRole, TextAlign,
    TextAnchor, ViewKind,
};
use crate::error::GeometryError;
use crate::report::format_mm;

use super::{FRET_LABEL_SIZE, LABEL_SIZE};

const LABEL_GAP: f64 = 1.0;

pub fn generate(
    params: &ParameterSet,
    derived: &DerivedValues,
) -> Result<GeometryView, GeometryError> {
    let length = params.neck_length;
    let wn = params.fb_width_at_nut;
    let we = params.fb_width_at_end;

    let mut groups = vec![
        PointGroup::closed(
            ShapeRole::Outline,
            vec![
                Point::new(0.0, -wn / 2.0),
                Point::new(length, -we / 2.0),
                Point::new(length, we / 2.0),
                Point::new(0.0, wn / 2.0),
            ],
        ),
        PointGroup::open(
            ShapeRole::Reference,
            vec![Point::new(0.0, 0.0), Point::new(length, 0.0)],
        ),
    ];
    let mut labels = Vec::with_capacity(derived.fret_positions.len() + 3);

    for (i, fraction) in derived.fret_positions.iter().enumerate() {
        let x = fraction * length;
        let half = (wn + derived.taper_rate * x) / 2.0;
        groups.push(PointGroup::open(
            ShapeRole::Tick,
            vec![Point::new(x, -half), Point::new(x, half)],
        ));
        labels.push(TextAnchor::new(
            Point::new(x, half + LABEL_GAP / 2.0),
            (i + 1).to_string(),
            FRET_LABEL_SIZE,
            TextAlign::Middle,
        ));
    }

    if params.show_measurements {
        let baseline = -LABEL_SIZE / 2.0;
        labels.push(TextAnchor::new(
            Point::new(-LABEL_GAP, baseline),
            format!("{} mm", format_mm(wn)),
            LABEL_SIZE,
            TextAlign::End,
        ));
        labels.push(TextAnchor::new(
            Point::new(length + LABEL_GAP, baseline),
            format!("{} mm", format_mm(we)),
            LABEL_SIZE,
            TextAlign::Start,
        ));
        labels.push(TextAnchor::new(
            Point::new(length / 2.0, -we / 2.0 - LABEL_GAP - LABEL_SIZE),
            format!("{} mm", format_mm(length)),
            LABEL_SIZE,
            TextAlign::Middle,
        ));
    }

    GeometryView::new(ViewKind::Top, groups, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived::compute;
    use crate::domain::InstrumentFamily;
    use crate::params::ParameterRegistry;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn ticks(view: &GeometryView) -> Vec<&PointGroup> {
        view.groups.iter().filter(|g| g.role == ShapeRole::Tick).collect()
    }

    #[test]
    fn fretless_board_has_no_ticks() {
        let params = ParameterRegistry::new().defaults();
        let view = generate(&params, &compute(&params).unwrap()).unwrap();
        assert_eq!(view.tick_count(), 0);
        // Outline and centreline only.
        assert_eq!(view.groups.len(), 2);
        let outline = view.outline().unwrap();
        assert_relative_eq!(outline.points[0].y, -12.0);
        assert_relative_eq!(outline.points[2].y, 21.0);
    }

    #[test]
    fn ticks_span_the_local_width() {
        let params = ParameterRegistry::new().defaults_for(InstrumentFamily::Guitar);
        let derived = compute(&params).unwrap();
        let view = generate(&params, &derived).unwrap();

        assert_eq!(view.tick_count(), 20);
        for tick in ticks(&view) {
            let x = tick.points[0].x;
            let width = tick.points[1].y - tick.points[0].y;
            let expected = params.fb_width_at_nut
                + (params.fb_width_at_end - params.fb_width_at_nut) * x / params.neck_length;
            assert_relative_eq!(width, expected, epsilon = 1e-9);
            assert!(!tick.closed);
        }
        assert_eq!(view.labels[0].text, "1");
        assert_eq!(view.labels[19].text, "20");
    }

    proptest! {
        #[test]
        fn tick_count_matches_fret_count(frets in 0u32..=20) {
            let mut params = ParameterRegistry::new().defaults_for(InstrumentFamily::Guitar);
            params.num_frets = frets;
            let view = generate(&params, &compute(&params).unwrap()).unwrap();

            prop_assert_eq!(view.tick_count(), frets as usize);
            let xs: Vec<f64> = ticks(&view).iter().map(|t| t.points[0].x).collect();
            prop_assert!(xs.windows(2).all(|w| w[1] > w[0]));
            prop_assert!(xs.iter().all(|&x| x > 0.0 && x < params.neck_length));
        }

        #[test]
        fn end_width_never_below_nut_width(nut in 20.0f64..50.0, extra in 0.0f64..30.0) {
            let mut params = ParameterRegistry::new().defaults_for(InstrumentFamily::Guitar);
            params.fb_width_at_nut = nut;
            params.fb_width_at_end = nut + extra;
            let view = generate(&params, &compute(&params).unwrap()).unwrap();

            let outline = view.outline().unwrap();
            let nut_width = outline.points[3].y - outline.points[0].y;
            let end_width = outline.points[2].y - outline.points[1].y;
            prop_assert!(end_width >= nut_width);
        }

        #[test]
        fn widening_the_end_widens_the_outline(
            nut in 20.0f64..50.0,
            extra in 0.0f64..20.0,
            delta in 0.01f64..10.0,
        ) {
            let end_extent = |end: f64| {
                let mut params = ParameterRegistry::new().defaults_for(InstrumentFamily::Guitar);
                params.fb_width_at_nut = nut;
                params.fb_width_at_end = end;
                let view = generate(&params, &compute(&params).unwrap()).unwrap();
                let outline = view.outline().unwrap();
                outline.points[2].y - outline.points[1].y
            };

            let narrow = end_extent(nut + extra);
            let wide = end_extent(nut + extra + delta);
            prop_assert!(wide > narrow);
            prop_assert!((wide - narrow - delta).abs() < 1e-9);
        }
    }
}
