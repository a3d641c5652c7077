//! Equal-tempered fret spacing.
//!
//! Each fret shortens the remaining vibrating length by a constant factor of
//! 2^(1/12), so fret `n` sits at `scale · (1 - 2^(-n/12))` from the nut and
//! fret 12 lands at half the scale.

/// 2^(1/12).
pub const SEMITONE_RATIO: f64 = 1.059_463_094_359_295_3;

/// Distances (mm from the nut) of frets `1..=count` for a given scale length.
///
/// Built iteratively from the remaining string length, so the sequence is
/// strictly increasing and identical for every caller.
pub fn fret_distances(scale_length: f64, count: u32) -> Vec<f64> {
    let mut remaining = scale_length;
    (0..count)
        .map(|_| {
            remaining /= SEMITONE_RATIO;
            scale_length - remaining
        })
        .collect()
}

/// Closed-form distance of a single fret from the nut.
pub fn fret_distance(scale_length: f64, fret: u32) -> f64 {
    scale_length * (1.0 - 2f64.powf(-f64::from(fret) / 12.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn no_frets_no_positions() {
        assert!(fret_distances(650.0, 0).is_empty());
    }

    #[test]
    fn twelfth_fret_is_half_the_scale() {
        let d = fret_distances(650.0, 12);
        assert_eq!(d.len(), 12);
        assert_relative_eq!(d[11], 325.0, epsilon = 1e-9);
    }

    #[test]
    fn iterative_and_closed_form_agree() {
        let d = fret_distances(690.0, 24);
        for (i, &v) in d.iter().enumerate() {
            assert_relative_eq!(v, fret_distance(690.0, i as u32 + 1), epsilon = 1e-9);
        }
    }

    #[test]
    fn spacing_shrinks_up_the_neck() {
        let d = fret_distances(650.0, 20);
        let gaps: Vec<f64> = d.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.windows(2).all(|g| g[1] < g[0]));
    }
}
