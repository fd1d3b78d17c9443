//! The momentum motor.
//!
//! One tick runs every movement component in a fixed order and composes
//! their outputs into a single displacement:
//!
//! 1. mouse look (turns the body, so later steps see the new basis)
//! 2. direction sampling, on its own cadence
//! 3. speed ramp
//! 4. jump
//! 5. slope projection
//! 6. gravity
//! 7. crouch toggle
//! 8. compose
//!
//! The tick is pure: it reads a [`MotorFrame`] and returns a
//! [`MotorOutput`]. Applying the output to the world is the caller's job.

use bevy::prelude::*;

use crate::collision::CollisionData;
use crate::config::MomentumConfig;
use crate::direction::MovementBasis;
use crate::intent::InputFrame;
use crate::stance::Stance;
use crate::state::MovementState;

/// Everything one tick reads from the outside world.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotorFrame {
    /// Input consumed for this tick.
    pub input: InputFrame,
    /// Body rotation before mouse look is applied.
    pub body_rotation: Quat,
    /// Result of the short downward slope probe.
    pub floor: Option<CollisionData>,
    /// Whether the head-clearance probe hit something.
    pub head_blocked: bool,
    /// Tick length in seconds.
    pub dt: f32,
}

/// Everything one tick asks the outside world to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorOutput {
    /// World-space displacement for the move primitive.
    pub displacement: Vec3,
    /// Velocity the displacement was derived from.
    pub velocity: Vec3,
    /// New body rotation after yaw.
    pub body_rotation: Quat,
    /// Local camera rotation after pitch.
    pub camera_rotation: Quat,
    /// Set when the stance changed this tick.
    pub stance_changed: Option<Stance>,
    /// A stand-up was requested but the head was blocked.
    pub stand_blocked: bool,
    /// A jump started this tick.
    pub jumped: bool,
}

impl MovementState {
    /// Run one motor tick.
    pub fn tick(&mut self, frame: &MotorFrame, config: &MomentumConfig) -> MotorOutput {
        let input = &frame.input;
        let dt = frame.dt;

        let body_rotation =
            self.look.turn(input.look_delta, config.mouse_sensitivity, frame.body_rotation);
        let basis = MovementBasis::from_rotation(body_rotation);

        self.direction.advance(dt, input, &basis);

        let moving = input.is_moving();
        self.ramp.update(moving, dt, config);

        let jumped = self.jump.try_jump(
            input.jump,
            moving,
            basis.up,
            config.jump_power,
            self.direction.current_direction(),
            &self.slope,
            &mut self.grounded,
        );

        self.slope.update(frame.floor.as_ref(), self.direction.current_direction(), basis.up);

        self.gravity.update(self.grounded, dt, config);

        let mut stance_changed = None;
        let mut stand_blocked = false;
        if input.crouch_pressed {
            let next = self.stance.toggled(frame.head_blocked);
            if next != self.stance {
                self.stance = next;
                stance_changed = Some(next);
            } else {
                stand_blocked = true;
            }
        }

        let velocity = self.compose_velocity();

        MotorOutput {
            displacement: velocity * dt,
            velocity,
            body_rotation,
            camera_rotation: self.look.camera_rotation(),
            stance_changed,
            stand_blocked,
            jumped,
        }
    }

    /// Combine the current sub-states into a world-space velocity.
    ///
    /// Planar motion follows the slope vector while on a slope, otherwise
    /// the sticky direction. Gravity pulls straight down and the jump adds
    /// its upward velocity plus its carried direction.
    pub fn compose_velocity(&self) -> Vec3 {
        let force = self.ramp.force();
        let planar = if self.slope.on_slope() {
            self.slope.slope_vector() * force
        } else {
            self.direction.current_direction() * force
        };

        planar
            + Vec3::NEG_Y * self.gravity.gravity_force()
            + self.jump.jump_velocity()
            + self.jump.jump_direction()
    }
}
