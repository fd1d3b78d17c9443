//! Gravity accumulation.

use bevy::prelude::*;

use crate::config::MomentumConfig;

/// Hard ceiling on fall speed (about ten times standard gravity).
pub const MAX_FALL_SPEED: f32 = 98.1;

/// Fall speed that builds while airborne and resets on the ground.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct GravityAccumulator {
    gravity_force: f32,
}

impl GravityAccumulator {
    /// Accumulate for one tick.
    ///
    /// There is no landing falloff: touching ground zeroes the fall speed
    /// immediately.
    pub fn update(&mut self, grounded: bool, dt: f32, config: &MomentumConfig) {
        if grounded {
            self.gravity_force = 0.0;
        } else {
            self.gravity_force += config.gravity * config.fall_velocity_ramp * dt;
        }

        self.gravity_force = self.gravity_force.clamp(0.0, MAX_FALL_SPEED);
    }

    /// Zero the fall speed right away.
    pub fn stop(&mut self) {
        self.gravity_force = 0.0;
    }

    /// Current fall speed.
    #[inline]
    pub fn gravity_force(&self) -> f32 {
        self.gravity_force
    }
}
