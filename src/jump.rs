//! Jump arbitration.
//!
//! A jump latches until the ground sensor reports a landing. The arbiter
//! never clears its own latch: if it did, the controller's own ground check
//! could re-arm the jump a tick before the sensor catches up, and holding
//! jump would chain jumps in mid-air.

use bevy::prelude::*;

use crate::slope::SlopeProjector;

/// Jump latch for one jump cycle.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpArbiter {
    jumping: bool,
    jump_velocity: Vec3,
    jump_direction: Vec3,
}

impl JumpArbiter {
    /// Start a jump if jump is held and none is in progress.
    ///
    /// Clears `grounded` optimistically so the same tick's gravity and
    /// ground logic already treat the body as airborne. The jump carries
    /// `current_direction`, or the slope vector when jumping off a slope
    /// while moving.
    ///
    /// Returns whether a jump started.
    #[allow(clippy::too_many_arguments)]
    pub fn try_jump(
        &mut self,
        jump_held: bool,
        moving: bool,
        up: Vec3,
        jump_power: f32,
        current_direction: Vec3,
        slope: &SlopeProjector,
        grounded: &mut bool,
    ) -> bool {
        if !jump_held || self.jumping {
            return false;
        }

        self.jump_velocity = up * jump_power;
        self.jumping = true;
        self.jump_direction = if slope.on_slope() && moving {
            slope.slope_vector()
        } else {
            current_direction
        };
        *grounded = false;

        true
    }

    /// Clear the latch. Only a landing may call this.
    pub fn stop(&mut self) {
        self.jumping = false;
        self.jump_velocity = Vec3::ZERO;
        self.jump_direction = Vec3::ZERO;
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    #[inline]
    pub fn jump_velocity(&self) -> Vec3 {
        self.jump_velocity
    }

    #[inline]
    pub fn jump_direction(&self) -> Vec3 {
        self.jump_direction
    }
}
