//! Collision Sim - many circular bodies bouncing around a bounded 2D world
//!
//! Core modules:
//! - `sim`: Physics core (bodies, world, spatial grid, collisions, camera)
//! - `view`: Draw-side queries for an external renderer (visible set, HUD text)
//! - `settings`: Serializable run configuration
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod view;

pub use error::ConfigError;
pub use settings::SimConfig;
pub use sim::{Body, Camera, Simulation, SpatialGrid, TickInput, World};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// World dimensions (width, height)
    pub const WORLD_WIDTH: f64 = 6000.0;
    pub const WORLD_HEIGHT: f64 = 4500.0;

    /// Initial window dimensions
    pub const SCREEN_WIDTH: f64 = 800.0;
    pub const SCREEN_HEIGHT: f64 = 600.0;

    /// Body population
    pub const NUM_BODIES: usize = 1000;
    pub const MIN_RADIUS: f64 = 13.0;
    pub const MAX_RADIUS: f64 = 19.0;
    /// Initial velocity components are drawn from [-MAX_SPEED, MAX_SPEED]
    pub const MAX_SPEED: f64 = 5.0;
    /// Lowest value of each randomized color channel
    pub const MIN_COLOR_CHANNEL: u8 = 50;

    /// Grid cell side length. Must be at least twice MAX_RADIUS.
    pub const CELL_SIZE: f64 = 40.0;

    /// Fixed simulation step (one unit per tick)
    pub const SIM_DT: f64 = 1.0;
    /// Target frame rate of the surrounding loop
    pub const TICK_RATE_HZ: u32 = 60;

    /// Camera zoom limits
    pub const MIN_ZOOM: f64 = 0.1;
    pub const MAX_ZOOM: f64 = 3.0;
    /// Base zoom change per wheel notch
    pub const WHEEL_ZOOM_STEP: f64 = 0.05;

    /// HUD text refreshes every N frames
    pub const HUD_REFRESH_FRAMES: u32 = 3;
}

/// Floor-divide a world position into integer cell coordinates
#[inline]
pub fn cell_coords(pos: DVec2, cell_size: f64) -> (i32, i32) {
    (
        (pos.x / cell_size).floor() as i32,
        (pos.y / cell_size).floor() as i32,
    )
}

/// Round to 2 decimal places (HUD display)
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
