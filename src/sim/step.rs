//! Fixed-step simulation tick
//!
//! Order within a tick is fixed: move every body, re-bucket, then resolve
//! collisions. Camera input is applied before the physics so a tick never
//! sees a half-updated view.

use glam::DVec2;

use super::camera::Camera;
use super::collision::resolve_collisions;
use super::grid::SpatialGrid;
use super::world::World;
use crate::error::ConfigError;
use crate::settings::SimConfig;
use crate::view::{DrawParams, query_visible};

/// Input gathered since the last tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drag delta in screen pixels
    pub pan: DVec2,
    /// Wheel notches (positive zooms in)
    pub wheel: f64,
    /// Cursor position in screen pixels (zoom anchor)
    pub cursor: DVec2,
    /// Pause toggle
    pub toggle_pause: bool,
    /// New screen size after a window resize
    pub resize: Option<DVec2>,
}

/// Counters from one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub occupied_cells: usize,
    pub candidate_pairs: usize,
    pub collisions_resolved: usize,
}

/// Advance every body, rebuild the grid, then resolve collisions
pub fn step_simulation(world: &mut World, grid: &mut SpatialGrid, dt: f64) -> TickStats {
    world.advance(dt);
    grid.rebuild(&world.bodies);
    let collisions = resolve_collisions(&mut world.bodies, grid);

    TickStats {
        occupied_cells: grid.occupied_count(),
        candidate_pairs: collisions.candidate_pairs,
        collisions_resolved: collisions.resolved,
    }
}

/// World, grid and view state for one run
#[derive(Debug, Clone)]
pub struct Simulation {
    pub world: World,
    pub grid: SpatialGrid,
    pub camera: Camera,
    /// Viewport size in pixels
    pub screen_size: DVec2,
    /// Time advanced per tick
    pub dt: f64,
    /// Physics frozen (camera still responds)
    pub paused: bool,
    /// Physics ticks run so far
    pub time_ticks: u64,
}

impl Simulation {
    /// Validate `config` and spawn its randomized population
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = World::populate(config);
        let mut sim = Self::from_world(world, config.cell_size, config.dt);
        sim.screen_size = config.screen_size();
        log::info!(
            "Simulation ready: {} bodies, {}x{} world, cell size {}",
            sim.world.body_count(),
            sim.world.size.x,
            sim.world.size.y,
            sim.grid.cell_size()
        );
        Ok(sim)
    }

    /// Wrap an existing world (the camera starts on the world's offset view)
    pub fn from_world(world: World, cell_size: f64, dt: f64) -> Self {
        let grid = SpatialGrid::new(cell_size);
        let max_radius = world.max_radius();
        if !grid.supports_radius(max_radius) {
            log::warn!(
                "Cell size {} is too small for radius {}; collisions may be missed",
                cell_size,
                max_radius
            );
        }
        let camera = Camera::for_world(world.size);
        Self {
            world,
            grid,
            camera,
            screen_size: DVec2::new(crate::consts::SCREEN_WIDTH, crate::consts::SCREEN_HEIGHT),
            dt,
            paused: false,
            time_ticks: 0,
        }
    }

    /// Apply input, then advance the physics unless paused
    ///
    /// Returns the physics counters, or `None` when paused.
    pub fn tick(&mut self, input: &TickInput) -> Option<TickStats> {
        self.apply_input(input);
        if self.paused {
            return None;
        }

        self.time_ticks += 1;
        Some(step_simulation(&mut self.world, &mut self.grid, self.dt))
    }

    fn apply_input(&mut self, input: &TickInput) {
        if input.toggle_pause {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        if let Some(size) = input.resize {
            self.resize(size);
        }
        if input.pan != DVec2::ZERO {
            self.camera.pan(input.pan);
        }
        if input.wheel != 0.0 {
            self.camera.wheel_zoom(input.wheel, input.cursor);
        }
    }

    /// Change the viewport size used by visibility queries
    pub fn resize(&mut self, screen_size: DVec2) {
        assert!(
            screen_size.is_finite() && screen_size.cmpgt(DVec2::ZERO).all(),
            "screen size must be positive, got {screen_size}"
        );
        self.screen_size = screen_size;
    }

    /// Draw parameters for every body currently on screen
    pub fn visible(&self) -> Vec<DrawParams> {
        query_visible(&self.world.bodies, &self.camera, self.screen_size)
    }

    /// Number of bodies currently on screen
    pub fn visible_count(&self) -> usize {
        self.world
            .bodies
            .iter()
            .filter(|b| self.camera.is_visible(b.pos, b.radius, self.screen_size))
            .count()
    }
}
