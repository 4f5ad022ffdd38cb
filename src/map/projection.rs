use glam::DVec3;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::geo::normalize_lon;
use crate::view::ViewState;

/// Mercator projection with a three-angle spherical rotation applied
/// first: [pole longitude, pole latitude, roll]. Scale is fixed at
/// width / 2pi so the full longitude range spans the canvas width,
/// translated to the canvas center.
#[derive(Clone)]
pub struct RotatedMercator {
    delta_lon: f64, // radians
    sin_phi: f64,
    cos_phi: f64,
    sin_gamma: f64,
    cos_gamma: f64,
    scale: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl RotatedMercator {
    pub fn new(pole_lon: f64, pole_lat: f64, roll: f64, width: usize, height: usize) -> Self {
        let phi = pole_lat.to_radians();
        let gamma = roll.to_radians();
        Self {
            delta_lon: pole_lon.to_radians(),
            sin_phi: phi.sin(),
            cos_phi: phi.cos(),
            sin_gamma: gamma.sin(),
            cos_gamma: gamma.cos(),
            scale: width as f64 / (2.0 * PI),
            width,
            height,
        }
    }

    /// Build the projection for the current view state.
    pub fn from_view(view: &ViewState, width: usize, height: usize) -> Self {
        Self::new(view.pole.lon, view.pole.lat, view.roll, width, height)
    }

    /// Apply the spherical rotation to a geographic point (degrees in,
    /// radians out).
    fn rotate(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lambda = lon.to_radians() + self.delta_lon;
        let p = lonlat_to_vec3(lambda, lat.to_radians());
        let p = rotate_y(p, self.sin_phi, self.cos_phi);
        let p = rotate_x(p, self.sin_gamma, self.cos_gamma);
        vec3_to_lonlat(p)
    }

    /// Undo the spherical rotation (radians in, degrees out).
    fn unrotate(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let p = lonlat_to_vec3(lambda, phi);
        let p = rotate_x(p, -self.sin_gamma, self.cos_gamma);
        let p = rotate_y(p, -self.sin_phi, self.cos_phi);
        let (lambda, phi) = vec3_to_lonlat(p);
        (
            normalize_lon((lambda - self.delta_lon).to_degrees()),
            phi.to_degrees(),
        )
    }

    /// Project a geographic point to braille-pixel coordinates.
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (lambda, phi) = self.rotate(lon, lat);
        let y = (FRAC_PI_4 + phi / 2.0).tan().ln();
        let px = self.width as f64 / 2.0 + self.scale * lambda;
        let py = self.height as f64 / 2.0 - self.scale * y;
        (px.round() as i32, py.round() as i32)
    }

    /// Invert a pixel back to geographic coordinates. Returns `None` when
    /// the pixel falls outside the projected longitude strip (the pointer
    /// is off the visible world); callers drop the event silently.
    pub fn invert(&self, px: i32, py: i32) -> Option<(f64, f64)> {
        let lambda = (px as f64 - self.width as f64 / 2.0) / self.scale;
        if !lambda.is_finite() || lambda.abs() > PI {
            return None;
        }
        let y = (self.height as f64 / 2.0 - py as f64) / self.scale;
        if !y.is_finite() {
            return None;
        }
        let phi = 2.0 * y.exp().atan() - FRAC_PI_2;
        Some(self.unrotate(lambda, phi))
    }

    /// Check if a projected point is on or near the canvas.
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Rough bounding-box check for a projected segment.
    pub fn segment_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

/// Unit sphere vector for a (lon, lat) pair in radians.
#[inline(always)]
fn lonlat_to_vec3(lambda: f64, phi: f64) -> DVec3 {
    DVec3::new(
        phi.cos() * lambda.cos(),
        phi.cos() * lambda.sin(),
        phi.sin(),
    )
}

/// Back from unit vector to (lon, lat) radians.
#[inline(always)]
fn vec3_to_lonlat(p: DVec3) -> (f64, f64) {
    (p.y.atan2(p.x), p.z.clamp(-1.0, 1.0).asin())
}

/// Rotate about the y axis (the pole-latitude rotation).
#[inline(always)]
fn rotate_y(p: DVec3, sin: f64, cos: f64) -> DVec3 {
    DVec3::new(p.x * cos - p.z * sin, p.y, p.z * cos + p.x * sin)
}

/// Rotate about the x axis (the roll rotation).
#[inline(always)]
fn rotate_x(p: DVec3, sin: f64, cos: f64) -> DVec3 {
    DVec3::new(p.x, p.y * cos - p.z * sin, p.z * cos + p.y * sin)
}
