//! Draw-side queries for an external renderer
//!
//! Everything here reads committed simulation state and never mutates it,
//! so a renderer can run these between ticks as often as it likes.

pub mod draw;
pub mod hud;

pub use draw::{CircleInstance, DrawParams, instances, query_visible};
pub use hud::{FpsCounter, Hud};
