//! Probe result structures.
//!
//! These structures hold the results of physics queries (raycasts) used
//! for slope detection and the crouch head-clearance check.

use bevy::prelude::*;

/// Information about a raycast hit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionData {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if any).
    pub entity: Option<Entity>,
}

impl CollisionData {
    /// Create a collision result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }

    /// Whether the hit surface faces exactly along `up`.
    ///
    /// This is an exact comparison: a surface tilted by any amount, however
    /// small, is not flat.
    pub fn is_flat(&self, up: Vec3) -> bool {
        self.normal == up
    }
}
