use std::f64::consts::TAU;

/// Compass labels in rose order, counter-clockwise from East
pub const COMPASS_POINTS: [&str; 16] = [
    "E", "ENE", "NE", "NNE", "N", "NNW", "NW", "WNW", "W", "WSW", "SW", "SSW", "S", "SSE", "SE",
    "ESE",
];

const STEP: f64 = TAU / 16.0;

/// The fixed 16-point wind rose.
///
/// Point `i` sits at `i * 2π/16` radians, so E is 0 and N is π/2.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindRose;

impl WindRose {
    /// Angle of a compass label. Calm, variable and unknown labels have none.
    pub fn angle(label: &str) -> Option<f64> {
        let label = label.trim();
        COMPASS_POINTS
            .iter()
            .position(|p| p.eq_ignore_ascii_case(label))
            .map(|i| i as f64 * STEP)
    }

    /// Label closest to `angle`; ties go to the earlier point in rose order.
    ///
    /// Distances are measured linearly on [0, 2π) without wrapping, so angles
    /// above the last point resolve to ESE rather than E.
    pub fn nearest(angle: f64) -> &'static str {
        let angle = normalize(angle);
        let mut best = COMPASS_POINTS[0];
        let mut best_diff = f64::INFINITY;

        for (i, label) in COMPASS_POINTS.iter().enumerate() {
            let diff = (angle - i as f64 * STEP).abs();
            if diff < best_diff {
                best = *label;
                best_diff = diff;
            }
        }

        best
    }

    pub fn points() -> impl Iterator<Item = (&'static str, f64)> {
        COMPASS_POINTS
            .iter()
            .enumerate()
            .map(|(i, label)| (*label, i as f64 * STEP))
    }
}

/// Map any angle into [0, 2π)
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_rose_angles() {
        assert_eq!(WindRose::angle("E"), Some(0.0));
        assert!((WindRose::angle("N").unwrap() - PI / 2.0).abs() < 1e-12);
        assert!((WindRose::angle("W").unwrap() - PI).abs() < 1e-12);
        assert!((WindRose::angle("s").unwrap() - 3.0 * PI / 2.0).abs() < 1e-12);
        assert_eq!(WindRose::points().count(), 16);
    }

    #[test]
    fn test_non_directional_labels() {
        assert_eq!(WindRose::angle("C"), None);
        assert_eq!(WindRose::angle("VRB"), None);
        assert_eq!(WindRose::angle("???"), None);
    }

    #[test]
    fn test_nearest_round_trips_every_point() {
        for (label, angle) in WindRose::points() {
            assert_eq!(WindRose::nearest(angle), label);
        }
    }

    #[test]
    fn test_nearest_does_not_wrap_past_east() {
        assert_eq!(WindRose::nearest(TAU - 0.01), "ESE");
        assert_eq!(WindRose::nearest(-0.05), "ESE");
        assert_eq!(WindRose::nearest(0.05), "E");
    }

    #[test]
    fn test_nearest_tie_goes_to_first_point() {
        // Exactly halfway between E (0) and ENE (π/8)
        assert_eq!(WindRose::nearest(STEP / 2.0), "E");
    }
}
