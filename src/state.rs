//! Movement state and state marker components.
//!
//! [`MovementState`] aggregates the per-tick sub-states of one controller.
//! Each sub-state is only ever mutated by its own component during the
//! motor tick, or by the ground sensor through [`GroundSignals`].
//!
//! The marker components are added/removed by the controller systems based
//! on the sensed grounded flag.

use bevy::prelude::*;

use crate::direction::DirectionTracker;
use crate::gravity::GravityAccumulator;
use crate::jump::JumpArbiter;
use crate::look::LookState;
use crate::ramp::SpeedRamp;
use crate::sensor::GroundSignals;
use crate::slope::SlopeProjector;
use crate::stance::Stance;

/// Complete movement state of one controller.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct MovementState {
    pub(crate) direction: DirectionTracker,
    pub(crate) ramp: SpeedRamp,
    pub(crate) slope: SlopeProjector,
    pub(crate) gravity: GravityAccumulator,
    pub(crate) jump: JumpArbiter,
    pub(crate) stance: Stance,
    pub(crate) look: LookState,
    /// Written by the ground sensor, and cleared by a jump.
    pub(crate) grounded: bool,
}

impl MovementState {
    pub fn direction(&self) -> &DirectionTracker {
        &self.direction
    }

    pub fn ramp(&self) -> &SpeedRamp {
        &self.ramp
    }

    pub fn slope(&self) -> &SlopeProjector {
        &self.slope
    }

    pub fn gravity(&self) -> &GravityAccumulator {
        &self.gravity
    }

    pub fn jump(&self) -> &JumpArbiter {
        &self.jump
    }

    pub fn look(&self) -> &LookState {
        &self.look
    }

    /// Current stance.
    #[inline]
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Whether the ground sensor last reported ground.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether a jump is latched.
    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jump.is_jumping()
    }

    /// Current scalar speed.
    #[inline]
    pub fn force(&self) -> f32 {
        self.ramp.force()
    }

    /// Sticky movement direction.
    #[inline]
    pub fn current_direction(&self) -> Vec3 {
        self.direction.current_direction()
    }
}

impl GroundSignals for MovementState {
    fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    fn stop_jumping(&mut self) {
        self.jump.stop();
    }

    fn stop_gravity(&mut self) {
        self.gravity.stop();
    }
}

/// Marker component indicating the character is grounded.
///
/// Added automatically when the ground sensor reports ground. Removed when
/// the character becomes airborne.
///
/// This is a marker component - it has no data, just indicates state.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use momentum_controller::prelude::*;
///
/// // Grounded is a marker component - just use it in queries
/// fn check_grounded(grounded: Option<&Grounded>) -> bool {
///     grounded.is_some()
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component indicating the character is crouched.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Crouching;
