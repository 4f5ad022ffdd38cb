/// Reduce a longitude to its canonical representative in (-180, 180].
/// Direct modulo form, so any finite input terminates in one step.
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    let shifted = (lon + 180.0).rem_euclid(360.0);
    if shifted == 0.0 {
        180.0
    } else {
        shifted - 180.0
    }
}

/// Signed angular distance from `from` to `to` along the shorter arc,
/// in (-180, 180]. Crossing the +180/-180 seam takes the short way:
/// `shortest_delta(170, -170) == 20`, not -340.
#[inline(always)]
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    normalize_lon(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_in_canonical_range() {
        for &lon in &[0.0, 179.9, 180.0, 180.1, -179.9, -180.0, 360.0, -360.0, 725.0, -1234.5] {
            let n = normalize_lon(lon);
            assert!(n > -180.0 && n <= 180.0, "normalize_lon({lon}) = {n}");
        }
    }

    #[test]
    fn normalize_idempotent() {
        for &lon in &[0.0, 45.5, 180.0, -180.0, 190.0, -190.0, 7200.25] {
            let once = normalize_lon(lon);
            assert_eq!(normalize_lon(once), once);
        }
    }

    #[test]
    fn normalize_known_values() {
        assert_eq!(normalize_lon(0.0), 0.0);
        assert_eq!(normalize_lon(185.0), -175.0);
        assert_eq!(normalize_lon(-185.0), 175.0);
        assert_eq!(normalize_lon(540.0), 180.0);
        // -180 and 180 share a canonical representative
        assert_eq!(normalize_lon(-180.0), 180.0);
        assert_eq!(normalize_lon(180.0), 180.0);
    }

    #[test]
    fn shortest_delta_crosses_seam() {
        assert_eq!(shortest_delta(170.0, -170.0), 20.0);
        assert_eq!(shortest_delta(-170.0, 170.0), -20.0);
    }

    #[test]
    fn shortest_delta_in_range_and_composes() {
        let cases = [
            (0.0, 0.0),
            (10.0, 200.0),
            (170.0, -170.0),
            (-90.0, 90.0),
            (45.0, -135.0),
            (179.0, -179.0),
        ];
        for (from, to) in cases {
            let d = shortest_delta(from, to);
            assert!(d > -180.0 && d <= 180.0, "delta({from}, {to}) = {d}");
            assert!(
                (normalize_lon(from + d) - normalize_lon(to)).abs() < 1e-9,
                "from + delta should land on to (mod 360): {from} + {d} vs {to}"
            );
        }
    }
}
