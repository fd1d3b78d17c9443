//! Direction tracking.
//!
//! Movement direction is not read every tick. Input is sampled on a slower
//! fixed cadence, which smooths out key chatter, and the last non-zero
//! sample is kept as the direction the player keeps sliding in while the
//! speed ramp decays.

use bevy::prelude::*;

use crate::intent::InputFrame;

/// Seconds between direction samples.
pub const DIRECTION_SAMPLE_INTERVAL: f32 = 0.09;

/// Orientation basis of the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementBasis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for MovementBasis {
    fn default() -> Self {
        Self::from_rotation(Quat::IDENTITY)
    }
}

impl MovementBasis {
    /// Basis of a body with the given rotation (forward is -Z).
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            forward: rotation * Vec3::NEG_Z,
            right: rotation * Vec3::X,
            up: rotation * Vec3::Y,
        }
    }
}

/// Samples directional input into a planar movement direction.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionTracker {
    /// Latest sample; zero when no directional key was held.
    direction: Vec3,
    /// Last non-zero sample. Never assigned zero.
    current_direction: Vec3,
    /// Last committed sample, used to detect changes.
    last_direction: Vec3,
    /// Time accumulated toward the next sample.
    elapsed: f32,
}

impl DirectionTracker {
    /// Advance the sampling clock by `dt` and sample if the interval elapsed.
    ///
    /// At most one sample is taken per call; a backlog longer than one
    /// interval is dropped. Returns whether a sample was taken.
    pub fn advance(&mut self, dt: f32, input: &InputFrame, basis: &MovementBasis) -> bool {
        self.elapsed += dt;
        if self.elapsed < DIRECTION_SAMPLE_INTERVAL {
            return false;
        }
        self.elapsed = (self.elapsed - DIRECTION_SAMPLE_INTERVAL).min(DIRECTION_SAMPLE_INTERVAL);
        self.sample(input, basis);
        true
    }

    /// Sample directional input against the body basis right now.
    pub fn sample(&mut self, input: &InputFrame, basis: &MovementBasis) {
        let vertical = if input.forward {
            basis.forward
        } else if input.backward {
            -basis.forward
        } else {
            Vec3::ZERO
        };

        let horizontal = if input.left {
            -basis.right
        } else if input.right {
            basis.right
        } else {
            Vec3::ZERO
        };

        self.direction = (vertical + horizontal).normalize_or_zero();

        if self.direction != self.last_direction && self.direction != Vec3::ZERO {
            self.current_direction = self.direction;
            self.last_direction = self.direction;
        }
    }

    /// Latest sampled direction (zero when idle at the last sample).
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Sticky last non-zero direction.
    #[inline]
    pub fn current_direction(&self) -> Vec3 {
        self.current_direction
    }

    /// Whether any non-zero direction has been sampled yet.
    pub fn has_direction(&self) -> bool {
        self.current_direction != Vec3::ZERO
    }

    #[cfg(test)]
    pub(crate) fn set_current_direction(&mut self, direction: Vec3) {
        self.current_direction = direction;
        self.last_direction = direction;
    }
}
