//! Circular bodies and wall bounce
//!
//! A body's radius doubles as its mass in collisions, so larger bodies push
//! smaller ones around.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized RGBA with full opacity (for GPU upload)
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

/// One circular particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub color: Rgb,
}

impl Body {
    /// Create a body. Panics on a non-positive radius or non-finite state.
    pub fn new(pos: DVec2, vel: DVec2, radius: f64, color: Rgb) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "body radius must be positive, got {radius}"
        );
        assert!(pos.is_finite(), "body position must be finite, got {pos}");
        assert!(vel.is_finite(), "body velocity must be finite, got {vel}");
        Self {
            pos,
            vel,
            radius,
            color,
        }
    }

    /// Mass used by the collision response
    #[inline]
    pub fn mass(&self) -> f64 {
        self.radius
    }

    /// Momentum (mass * velocity)
    #[inline]
    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass()
    }

    /// Integrate position, then reflect off the walls of a `world_size` box
    ///
    /// Each axis is handled on its own: leaving `[radius, size - radius]`
    /// flips that velocity component and clamps the position back inside.
    pub fn advance(&mut self, dt: f64, world_size: DVec2) {
        self.pos += self.vel * dt;

        let (x, vx) = bounce_axis(self.pos.x, self.vel.x, self.radius, world_size.x);
        let (y, vy) = bounce_axis(self.pos.y, self.vel.y, self.radius, world_size.y);
        self.pos = DVec2::new(x, y);
        self.vel = DVec2::new(vx, vy);
    }

    /// Whether the body lies fully inside a `world_size` box
    pub fn is_contained(&self, world_size: DVec2) -> bool {
        let min = DVec2::splat(self.radius);
        let max = world_size - min;
        self.pos.cmpge(min).all() && self.pos.cmple(max).all()
    }
}

/// Elastic wall reflection along one axis
#[inline]
fn bounce_axis(pos: f64, vel: f64, radius: f64, size: f64) -> (f64, f64) {
    let min = radius;
    let max = size - radius;
    if pos < min || pos > max {
        // Clamp so the body doesn't sit outside and flip again next tick
        (pos.clamp(min, max), -vel)
    } else {
        (pos, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: DVec2 = DVec2::new(6000.0, 4500.0);

    fn body(pos: DVec2, vel: DVec2, radius: f64) -> Body {
        Body::new(pos, vel, radius, Rgb::new(255, 255, 255))
    }

    #[test]
    fn test_advance_free_flight() {
        let mut b = body(DVec2::new(100.0, 100.0), DVec2::new(3.0, -2.0), 10.0);
        b.advance(1.0, WORLD);
        assert_eq!(b.pos, DVec2::new(103.0, 98.0));
        assert_eq!(b.vel, DVec2::new(3.0, -2.0));
    }

    #[test]
    fn test_advance_scales_with_dt() {
        let mut b = body(DVec2::new(100.0, 100.0), DVec2::new(4.0, 2.0), 10.0);
        b.advance(0.5, WORLD);
        assert_eq!(b.pos, DVec2::new(102.0, 101.0));
    }

    #[test]
    fn test_bounce_left_wall() {
        let mut b = body(DVec2::new(12.0, 100.0), DVec2::new(-5.0, 1.0), 10.0);
        b.advance(1.0, WORLD);
        assert_eq!(b.pos.x, 10.0);
        assert_eq!(b.vel.x, 5.0);
        // Other axis untouched
        assert_eq!(b.vel.y, 1.0);
    }

    #[test]
    fn test_bounce_bottom_right_corner() {
        let mut b = body(DVec2::new(5985.0, 4485.0), DVec2::new(10.0, 10.0), 10.0);
        b.advance(1.0, WORLD);
        assert_eq!(b.pos, DVec2::new(5990.0, 4490.0));
        assert_eq!(b.vel, DVec2::new(-10.0, -10.0));
    }

    #[test]
    fn test_huge_velocity_stays_contained() {
        let mut b = body(DVec2::new(3000.0, 2000.0), DVec2::new(1e9, -1e9), 15.0);
        b.advance(1.0, WORLD);
        assert!(b.is_contained(WORLD));
        assert_eq!(b.pos, DVec2::new(5985.0, 15.0));
    }

    #[test]
    fn test_tangent_to_wall_is_inside() {
        let mut b = body(DVec2::new(10.0, 100.0), DVec2::ZERO, 10.0);
        b.advance(1.0, WORLD);
        assert_eq!(b.pos.x, 10.0);
        assert_eq!(b.vel.x, 0.0);
    }

    #[test]
    #[should_panic(expected = "radius must be positive")]
    fn test_zero_radius_panics() {
        body(DVec2::ZERO, DVec2::ZERO, 0.0);
    }

    #[test]
    #[should_panic(expected = "velocity must be finite")]
    fn test_nan_velocity_panics() {
        body(DVec2::new(50.0, 50.0), DVec2::new(f64::NAN, 0.0), 5.0);
    }

    #[test]
    fn test_rgba_conversion() {
        let c = Rgb::new(255, 0, 51).to_rgba_f32();
        assert_eq!(c, [1.0, 0.0, 0.2, 1.0]);
    }
}
