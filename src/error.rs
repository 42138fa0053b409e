//! Configuration errors
//!
//! The physics core has no runtime error channel: bad radii, cell sizes, or
//! non-finite state are programmer errors and panic at the boundary where they
//! enter. Only loading and validating a run configuration can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
