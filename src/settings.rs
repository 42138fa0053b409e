//! Run configuration
//!
//! Every field has a default, so a config file only needs the values it
//! overrides. Loaded from JSON on native builds.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    /// World width in simulation units
    pub world_width: f64,
    /// World height in simulation units
    pub world_height: f64,

    // === Population ===
    /// Number of bodies spawned at start (fixed for the run)
    pub num_bodies: usize,
    /// Smallest spawned radius
    pub min_radius: f64,
    /// Largest spawned radius
    pub max_radius: f64,
    /// Velocity components are drawn from [-max_speed, max_speed]
    pub max_speed: f64,
    /// Lowest value of each color channel
    pub min_color_channel: u8,
    /// RNG seed for the initial population
    pub seed: u64,

    // === Physics ===
    /// Spatial grid cell size (independent of camera zoom)
    pub cell_size: f64,
    /// Time advanced per tick
    pub dt: f64,

    // === Display ===
    /// Initial screen width in pixels
    pub screen_width: f64,
    /// Initial screen height in pixels
    pub screen_height: f64,
    /// Frame rate cap for the surrounding loop
    pub tick_rate_hz: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            num_bodies: NUM_BODIES,
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            max_speed: MAX_SPEED,
            min_color_channel: MIN_COLOR_CHANNEL,
            seed: 0,

            cell_size: CELL_SIZE,
            dt: SIM_DT,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tick_rate_hz: TICK_RATE_HZ,
        }
    }
}

impl SimConfig {
    /// World size as a vector
    pub fn world_size(&self) -> DVec2 {
        DVec2::new(self.world_width, self.world_height)
    }

    /// Screen size as a vector
    pub fn screen_size(&self) -> DVec2 {
        DVec2::new(self.screen_width, self.screen_height)
    }

    /// Check the invariants the physics core relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("min_radius", self.min_radius),
            ("cell_size", self.cell_size),
            ("dt", self.dt),
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_speed must be non-negative, got {}",
                self.max_speed
            )));
        }

        if !self.max_radius.is_finite() || self.max_radius < self.min_radius {
            return Err(ConfigError::Invalid(format!(
                "radius range [{}, {}] is empty",
                self.min_radius, self.max_radius
            )));
        }

        // A body must fit in the world, or the wall clamp range is inverted
        if 2.0 * self.max_radius > self.world_width.min(self.world_height) {
            return Err(ConfigError::Invalid(format!(
                "max_radius {} does not fit in a {}x{} world",
                self.max_radius, self.world_width, self.world_height
            )));
        }

        // Broad phase only looks at adjacent cells
        if self.cell_size < 2.0 * self.max_radius {
            return Err(ConfigError::Invalid(format!(
                "cell_size {} is smaller than the largest body diameter {}",
                self.cell_size,
                2.0 * self.max_radius
            )));
        }

        // Cell keys are i32; the far wall's cell and its neighbor must both fit
        let max_cells = (i32::MAX - 1) as f64;
        if self.world_width.max(self.world_height) / self.cell_size > max_cells {
            return Err(ConfigError::Invalid(format!(
                "a {}x{} world has more than {max_cells} cells of size {} per side",
                self.world_width, self.world_height, self.cell_size
            )));
        }

        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be non-zero".into()));
        }

        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}
