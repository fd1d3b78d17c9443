//! Mouse look.

use bevy::prelude::*;

/// Pitch limit in degrees, both up and down.
pub const MAX_PITCH_DEGREES: f32 = 90.0;

/// Accumulated camera pitch.
///
/// Yaw is not stored: it turns the body itself, which is what the direction
/// tracker reads its basis from.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct LookState {
    /// Degrees, positive looks up.
    pitch: f32,
}

impl LookState {
    /// Apply one tick of mouse motion and return the new body rotation.
    ///
    /// `delta.x` turns right, `delta.y` looks up; both are scaled by
    /// `sensitivity` into degrees.
    pub fn turn(&mut self, delta: Vec2, sensitivity: f32, body_rotation: Quat) -> Quat {
        self.pitch =
            (self.pitch + delta.y * sensitivity).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);

        let yaw = (delta.x * sensitivity).to_radians();
        body_rotation * Quat::from_rotation_y(-yaw)
    }

    /// Current pitch in degrees.
    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Local camera rotation for the current pitch.
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians())
    }
}
