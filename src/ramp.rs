//! Speed ramp.
//!
//! The player's speed ("force") builds up while any movement key is held
//! and bleeds off otherwise, instead of snapping to a target velocity.

use bevy::prelude::*;

use crate::config::MomentumConfig;

/// Scalar speed magnitude, clamped to `[0, walk_speed]`.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedRamp {
    force: f32,
}

impl SpeedRamp {
    /// Ramp the force for one tick.
    ///
    /// Held: `force += ramp_up * dt`. Released: `force -= (force + ramp_down) * dt`,
    /// so the decay is proportional to the current speed plus a constant.
    pub fn update(&mut self, moving: bool, dt: f32, config: &MomentumConfig) {
        if moving {
            self.force += config.speed_ramp_up * dt;
        } else {
            self.force -= (self.force + config.speed_ramp_down) * dt;
        }

        self.force = self.force.clamp(0.0, config.walk_speed);
    }

    /// Current speed magnitude.
    #[inline]
    pub fn force(&self) -> f32 {
        self.force
    }

    /// Whether the player is still carrying any speed.
    pub fn is_force_non_zero(&self) -> bool {
        self.force > 0.0
    }

    #[cfg(test)]
    pub(crate) fn set_force(&mut self, force: f32) {
        self.force = force;
    }
}
