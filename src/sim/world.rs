//! World bounds and the body arena
//!
//! The world is the sole owner of every body. Everything else refers to a
//! body by its index, which stays stable for the whole run since the
//! population never changes.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Rgb};
use crate::settings::SimConfig;

/// Stable index of a body in `World::bodies`
pub type BodyId = usize;

/// Fixed rectangular world owning all bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// (width, height), fixed for the run
    pub size: DVec2,
    /// Body arena
    pub bodies: Vec<Body>,
}

impl World {
    /// Create an empty world. Panics on non-positive dimensions.
    pub fn new(size: DVec2) -> Self {
        assert!(
            size.is_finite() && size.cmpgt(DVec2::ZERO).all(),
            "world size must be positive, got {size}"
        );
        Self {
            size,
            bodies: Vec::new(),
        }
    }

    /// Create a world populated with randomized bodies from `config`
    ///
    /// The same seed always yields the same population.
    pub fn populate(config: &SimConfig) -> Self {
        let mut world = Self::new(config.world_size());
        let mut rng = Pcg32::seed_from_u64(config.seed);

        world.bodies.reserve(config.num_bodies);
        for _ in 0..config.num_bodies {
            let radius = rng.random_range(config.min_radius..=config.max_radius);
            // Spawn fully inside so containment holds from tick zero
            let pos = DVec2::new(
                rng.random_range(radius..=world.size.x - radius),
                rng.random_range(radius..=world.size.y - radius),
            );
            let vel = DVec2::new(
                rng.random_range(-config.max_speed..=config.max_speed),
                rng.random_range(-config.max_speed..=config.max_speed),
            );
            let lo = config.min_color_channel;
            let color = Rgb::new(
                rng.random_range(lo..=255),
                rng.random_range(lo..=255),
                rng.random_range(lo..=255),
            );
            world.bodies.push(Body::new(pos, vel, radius, color));
        }

        log::debug!(
            "Populated {}x{} world with {} bodies (seed {})",
            world.size.x,
            world.size.y,
            world.bodies.len(),
            config.seed
        );
        world
    }

    /// Add a body, returning its stable id
    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance every body by `dt` and bounce off the walls
    pub fn advance(&mut self, dt: f64) {
        let size = self.size;
        for body in &mut self.bodies {
            body.advance(dt, size);
        }
    }

    /// Sum of all body momenta
    pub fn total_momentum(&self) -> DVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    /// Total kinetic energy (0.5 * m * v²)
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| 0.5 * b.mass() * b.vel.length_squared())
            .sum()
    }

    /// Largest body radius (0 if empty)
    pub fn max_radius(&self) -> f64 {
        self.bodies.iter().map(|b| b.radius).fold(0.0, f64::max)
    }
}
