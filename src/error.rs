//! Error types.
//!
//! Everything that can go wrong is detected when a controller is set up.
//! Per-tick code never fails.

use bevy::prelude::Entity;
use thiserror::Error;

/// A [`MomentumConfig`](crate::config::MomentumConfig) value that cannot drive a controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A tunable that must be strictly positive was zero or negative.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// A tunable was NaN or infinite.
    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },

    /// Crouched height must be below standing height and fit the body radius.
    #[error(
        "crouch height {crouch} must be below standing height {standing} \
         and at least twice the radius {radius}"
    )]
    InvalidStance {
        standing: f32,
        crouch: f32,
        radius: f32,
    },
}

/// Fatal misconfiguration found while attaching a controller.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("controller {0} has no camera and camera generation is disabled")]
    MissingCamera(Entity),

    #[error("controller {0} is missing the physics backend's move primitive")]
    MissingMovePrimitive(Entity),

    #[error("controller {0} has an invalid config: {1}")]
    InvalidConfig(Entity, #[source] ConfigError),
}
