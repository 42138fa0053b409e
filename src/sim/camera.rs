//! View transform and visibility
//!
//! `screen = (world + offset) * zoom`. The camera is a plain value owned by
//! whoever drives the view; nothing in the physics reads it.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_STEP};

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner
    pub min: DVec2,
    pub size: DVec2,
}

impl ScreenRect {
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }
}

/// World-to-screen transform driven by pan and zoom input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CameraState")]
pub struct Camera {
    /// Added to world positions before scaling
    pub offset: DVec2,
    /// Scale factor, always within [MIN_ZOOM, MAX_ZOOM]
    zoom: f64,
}

/// Camera fields as stored, before the zoom is clamped
#[derive(Deserialize)]
struct CameraState {
    offset: DVec2,
    zoom: f64,
}

impl TryFrom<CameraState> for Camera {
    type Error = String;

    fn try_from(state: CameraState) -> Result<Self, Self::Error> {
        if !state.zoom.is_finite() {
            return Err(format!("zoom must be finite, got {}", state.zoom));
        }
        Ok(Self::new(state.offset, state.zoom))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: DVec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Panics if `zoom` isn't finite; otherwise it's clamped
    pub fn new(offset: DVec2, zoom: f64) -> Self {
        Self {
            offset,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Starting view for a world: offset by half the world size, zoom 1
    pub fn for_world(world_size: DVec2) -> Self {
        Self::new(-world_size / 2.0, 1.0)
    }

    #[inline]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[inline]
    pub fn world_to_screen(&self, pos: DVec2) -> DVec2 {
        (pos + self.offset) * self.zoom
    }

    #[inline]
    pub fn screen_to_world(&self, screen: DVec2) -> DVec2 {
        screen / self.zoom - self.offset
    }

    /// Radius as drawn on screen
    #[inline]
    pub fn screen_radius(&self, radius: f64) -> f64 {
        radius * self.zoom
    }

    /// Whether any part of a circle can land on a `screen_size` viewport
    ///
    /// Tests the circle's screen-space bounding box against
    /// `[0, w] x [0, h]`, edges inclusive.
    pub fn is_visible(&self, pos: DVec2, radius: f64, screen_size: DVec2) -> bool {
        let center = self.world_to_screen(pos);
        let margin = self.screen_radius(radius);
        center.x >= -margin
            && center.x <= screen_size.x + margin
            && center.y >= -margin
            && center.y <= screen_size.y + margin
    }

    /// Drag the view by a screen-space delta
    ///
    /// The world under the cursor moves with it, at any zoom.
    pub fn pan(&mut self, screen_delta: DVec2) {
        self.offset += screen_delta / self.zoom;
    }

    /// Multiply zoom by `factor`, keeping the world point under `around` fixed
    pub fn zoom_by(&mut self, factor: f64, around: DVec2) {
        assert!(
            factor.is_finite() && factor > 0.0,
            "zoom factor must be positive, got {factor}"
        );
        self.set_zoom(self.zoom * factor, around);
    }

    /// Set zoom (clamped), keeping the world point under `around` fixed
    ///
    /// Panics if `zoom` isn't finite.
    pub fn set_zoom(&mut self, zoom: f64, around: DVec2) {
        let new_zoom = clamp_zoom(zoom);
        self.offset -= around / self.zoom - around / new_zoom;
        self.zoom = new_zoom;
    }

    /// One mouse-wheel notch toward (`direction > 0`) or away from the scene
    ///
    /// Steps grow with the current zoom so zooming feels even across the range.
    pub fn wheel_zoom(&mut self, direction: f64, around: DVec2) {
        if direction == 0.0 {
            return;
        }
        let step = WHEEL_ZOOM_STEP.copysign(direction);
        let speed = 0.5 + self.zoom / 3.0;
        self.set_zoom(self.zoom + step * speed, around);
    }

    /// The world rectangle in screen space (for the border overlay)
    pub fn world_border(&self, world_size: DVec2) -> ScreenRect {
        ScreenRect {
            min: self.world_to_screen(DVec2::ZERO),
            size: world_size * self.zoom,
        }
    }
}

#[inline]
fn clamp_zoom(zoom: f64) -> f64 {
    assert!(zoom.is_finite(), "zoom must be finite, got {zoom}");
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
