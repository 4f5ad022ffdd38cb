use crate::geo::{normalize_lon, shortest_delta};

/// Keyboard pan step in degrees (arrow keys, a/d).
pub const PAN_STEP: f64 = 5.0;
/// Keyboard roll step in degrees (w/s).
pub const ROLL_STEP: f64 = 5.0;

/// Latitude limit for the pole; matches the Mercator-comfortable range.
pub const LAT_LIMIT: f64 = 85.0;

/// The rotation pole of the projection.
/// Longitude is always canonical; latitude stays within [-85, 85]
/// for every incremental operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pole {
    pub lon: f64,
    pub lat: f64,
}

/// Immutable snapshot captured when a drag gesture starts. Every drag
/// update recomputes from this anchor rather than accumulating per-frame
/// deltas, so a long gesture cannot drift.
#[derive(Clone, Copy, Debug)]
pub struct DragAnchor {
    pub pole: Pole,
    /// Geographic coordinate under the pointer at gesture start.
    pub coords: (f64, f64),
}

/// The complete view: rotation pole plus an independent roll angle.
/// All updates are pure (state in, state out); the event layer owns the
/// single mutable copy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub pole: Pole,
    /// Secondary twist applied after the pole rotation, canonical range.
    pub roll: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            pole: Pole { lon: 0.0, lat: 0.0 },
            roll: 0.0,
        }
    }
}

impl ViewState {
    /// Center the view on a geographic point. Centering is the inverse
    /// rotation of the target to the origin, hence the negated longitude.
    pub fn centered_on(&self, lon: f64, lat: f64) -> Self {
        Self {
            pole: Pole {
                lon: normalize_lon(-lon),
                lat,
            },
            roll: self.roll,
        }
    }

    /// Set the rotation pole directly. Pole semantics are complementary to
    /// center semantics: here the latitude is negated, not the longitude.
    /// Kept as a separate named operation from `centered_on` on purpose.
    pub fn with_pole(&self, lon: f64, lat: f64) -> Self {
        Self {
            pole: Pole {
                lon: normalize_lon(lon),
                lat: -lat,
            },
            roll: self.roll,
        }
    }

    /// Recompute the pole for a drag gesture, anchored to its start.
    /// Longitude moves along the shorter arc so crossing the +180/-180
    /// seam never jumps the long way around.
    pub fn dragged(&self, anchor: &DragAnchor, coords: (f64, f64)) -> Self {
        let dlon = shortest_delta(anchor.coords.0, coords.0);
        let dlat = coords.1 - anchor.coords.1;
        Self {
            pole: Pole {
                lon: normalize_lon(anchor.pole.lon + dlon),
                lat: (anchor.pole.lat + dlat).clamp(-LAT_LIMIT, LAT_LIMIT),
            },
            roll: self.roll,
        }
    }

    /// Keyboard pan: fixed-step pole move with the same wrap/clamp rules
    /// as dragging.
    pub fn panned(&self, dlon: f64, dlat: f64) -> Self {
        Self {
            pole: Pole {
                lon: normalize_lon(self.pole.lon + dlon),
                lat: (self.pole.lat + dlat).clamp(-LAT_LIMIT, LAT_LIMIT),
            },
            roll: self.roll,
        }
    }

    /// Keyboard roll: fixed-step twist, pole untouched.
    pub fn rolled(&self, delta: f64) -> Self {
        Self {
            pole: self.pole,
            roll: normalize_lon(self.roll + delta),
        }
    }

    /// The geographic point currently at the center of the view.
    pub fn center(&self) -> (f64, f64) {
        (normalize_lon(-self.pole.lon), self.pole.lat)
    }
}

/// Cubic in-out easing on t in [0, 1].
pub fn ease_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = 2.0 * t - 2.0;
        1.0 + u * u * u / 2.0
    }
}

/// Blend two view states at eased parameter `t`, taking the shorter arc
/// for longitude and roll. Powers the animated re-center transition.
pub fn interpolate(from: &ViewState, to: &ViewState, t: f64) -> ViewState {
    let t = ease_cubic(t);
    ViewState {
        pole: Pole {
            lon: normalize_lon(from.pole.lon + shortest_delta(from.pole.lon, to.pole.lon) * t),
            lat: from.pole.lat + (to.pole.lat - from.pole.lat) * t,
        },
        roll: normalize_lon(from.roll + shortest_delta(from.roll, to.roll) * t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_on_negates_longitude() {
        // Paris
        let view = ViewState::default().centered_on(2.3522, 48.8566);
        assert_eq!(view.pole.lon, normalize_lon(-2.3522));
        assert_eq!(view.pole.lat, 48.8566);
    }

    #[test]
    fn with_pole_negates_latitude() {
        let view = ViewState::default().with_pole(30.0, 40.0);
        assert_eq!(view.pole.lon, 30.0);
        assert_eq!(view.pole.lat, -40.0);
    }

    #[test]
    fn center_readout_inverts_pole() {
        let view = ViewState::default().centered_on(2.3522, 48.8566);
        let (lon, lat) = view.center();
        assert!((lon - 2.3522).abs() < 1e-9);
        assert_eq!(lat, 48.8566);
    }

    #[test]
    fn drag_is_anchored_to_gesture_start() {
        let start = ViewState::default();
        let anchor = DragAnchor {
            pole: start.pole,
            coords: (10.0, 0.0),
        };
        let dragged = start.dragged(&anchor, (200.0, 0.0));
        assert_eq!(dragged.pole.lon, normalize_lon(shortest_delta(10.0, 200.0)));
    }

    #[test]
    fn drag_does_not_drift_across_updates() {
        // Many intermediate drag events must land exactly where a single
        // jump to the final pointer position would.
        let start = ViewState {
            pole: Pole { lon: 20.0, lat: 10.0 },
            roll: 0.0,
        };
        let anchor = DragAnchor {
            pole: start.pole,
            coords: (-5.0, 5.0),
        };
        let mut view = start;
        for step in 1..=50 {
            let lon = -5.0 + step as f64 * 0.7;
            let lat = 5.0 + step as f64 * 0.2;
            view = view.dragged(&anchor, (lon, lat));
        }
        let direct = start.dragged(&anchor, (30.0, 15.0));
        assert!((view.pole.lon - direct.pole.lon).abs() < 1e-9);
        assert!((view.pole.lat - direct.pole.lat).abs() < 1e-9);
    }

    #[test]
    fn drag_clamps_latitude() {
        let start = ViewState {
            pole: Pole { lon: 0.0, lat: 80.0 },
            roll: 0.0,
        };
        let anchor = DragAnchor {
            pole: start.pole,
            coords: (0.0, 0.0),
        };
        let dragged = start.dragged(&anchor, (0.0, 40.0));
        assert_eq!(dragged.pole.lat, LAT_LIMIT);
    }

    #[test]
    fn pan_clamps_latitude() {
        let view = ViewState {
            pole: Pole { lon: 0.0, lat: 83.0 },
            roll: 0.0,
        };
        let panned = view.panned(0.0, PAN_STEP);
        assert_eq!(panned.pole.lat, 85.0);
    }

    #[test]
    fn pan_wraps_longitude() {
        let view = ViewState {
            pole: Pole { lon: 178.0, lat: 0.0 },
            roll: 0.0,
        };
        let panned = view.panned(PAN_STEP, 0.0);
        assert_eq!(panned.pole.lon, -177.0);
    }

    #[test]
    fn roll_keeps_canonical_range() {
        let mut view = ViewState::default();
        for _ in 0..100 {
            view = view.rolled(ROLL_STEP);
            assert!(view.roll > -180.0 && view.roll <= 180.0);
        }
        assert_eq!(view.pole, Pole { lon: 0.0, lat: 0.0 });
    }

    #[test]
    fn default_is_reset_state() {
        let reset = ViewState::default();
        assert_eq!(reset.pole, Pole { lon: 0.0, lat: 0.0 });
        assert_eq!(reset.roll, 0.0);
    }

    #[test]
    fn ease_endpoints() {
        assert_eq!(ease_cubic(0.0), 0.0);
        assert_eq!(ease_cubic(1.0), 1.0);
        assert!((ease_cubic(0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn interpolate_endpoints_and_short_arc() {
        let from = ViewState {
            pole: Pole { lon: 170.0, lat: 0.0 },
            roll: 0.0,
        };
        let to = ViewState {
            pole: Pole { lon: -170.0, lat: 10.0 },
            roll: 0.0,
        };
        let start = interpolate(&from, &to, 0.0);
        let end = interpolate(&from, &to, 1.0);
        assert!((start.pole.lon - 170.0).abs() < 1e-9);
        assert!((end.pole.lon - -170.0).abs() < 1e-9);
        // Midpoint crosses the seam rather than sweeping back through 0
        let mid = interpolate(&from, &to, 0.5);
        assert!(mid.pole.lon > 170.0 || mid.pole.lon < -170.0, "mid = {}", mid.pole.lon);
    }
}
