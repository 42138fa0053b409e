//! Physics core
//!
//! Single-threaded and deterministic for a given seed:
//! - Fixed population, stable body indices
//! - Grid rebuilt from scratch every tick
//! - Cells visited in first-occupied order, never hash order
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod grid;
pub mod step;
pub mod world;

pub use body::{Body, Rgb};
pub use camera::{Camera, ScreenRect};
pub use collision::{
    CollisionStats, HALF_NEIGHBORHOOD, candidate_pairs, collides, resolve, resolve_collisions,
};
pub use grid::{CellKey, SpatialGrid};
pub use step::{Simulation, TickInput, TickStats, step_simulation};
pub use world::{BodyId, World};
