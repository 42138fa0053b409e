//! HUD text model
//!
//! Produces the overlay lines (cursor position and zoom, FPS, visible body
//! count). Rendering the text is up to the caller. Lines are rebuilt every
//! few frames rather than every frame.

use glam::DVec2;

use crate::consts::HUD_REFRESH_FRAMES;
use crate::round2;
use crate::sim::Simulation;

/// Frames averaged by the FPS counter
const FPS_WINDOW: usize = 60;

/// Rolling frame-rate estimate over the last `FPS_WINDOW` frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    recorded: usize,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            recorded: 0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.recorded = (self.recorded + 1).min(FPS_WINDOW);
    }

    /// Frames per second, 0 until two frames are recorded
    pub fn fps(&self) -> u32 {
        if self.recorded < 2 {
            return 0;
        }
        let newest = self.frame_times[(self.frame_index + FPS_WINDOW - 1) % FPS_WINDOW];
        let oldest = if self.recorded < FPS_WINDOW {
            self.frame_times[0]
        } else {
            self.frame_times[self.frame_index]
        };
        let elapsed = newest - oldest;
        if elapsed <= 0.0 {
            return 0;
        }
        ((self.recorded - 1) as f64 / elapsed).round() as u32
    }
}

/// Overlay text lines, refreshed every `HUD_REFRESH_FRAMES` frames
#[derive(Debug, Clone, Default)]
pub struct Hud {
    fps: FpsCounter,
    frames_since_refresh: u32,
    lines: Vec<String>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame and rebuild the text if it's due
    ///
    /// Returns true when the lines changed.
    pub fn update(&mut self, sim: &Simulation, cursor: DVec2, time: f64) -> bool {
        self.fps.record(time);
        self.frames_since_refresh += 1;
        if self.frames_since_refresh < HUD_REFRESH_FRAMES {
            return false;
        }
        self.frames_since_refresh = 0;

        let world_cursor = sim.camera.screen_to_world(cursor);
        self.lines = vec![
            format!(
                "({}, {}) - {}",
                round2(world_cursor.x),
                round2(world_cursor.y),
                round2(sim.camera.zoom())
            ),
            format!("FPS: {}", self.fps.fps()),
            format!("Dots: {}", sim.visible_count()),
        ];
        true
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }
}
