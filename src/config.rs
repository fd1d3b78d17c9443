//! Controller configuration components.
//!
//! This module defines the central controller component, which stores the
//! probe results gathered each tick, and the tunable configuration for
//! momentum movement, stance sizes and the ground sensor volume.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionData;
use crate::error::ConfigError;
use crate::intent::MovementInput;
use crate::stance::Stance;
use crate::state::MovementState;

/// Core character controller component.
///
/// This is the **central hub** the backend sensor systems write into.
/// It contains probe RESULTS for the current tick, not raw physics state.
///
/// # Contact States
///
/// - `floor`: hit of the short downward slope probe, if any
/// - `ceiling`: hit of the upward head-clearance probe, if any
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
#[require(Transform, MovementState, MovementInput, MomentumConfig)]
pub struct MomentumController {
    /// Downward probe hit (slope detection).
    #[reflect(ignore)]
    pub floor: Option<CollisionData>,
    /// Upward probe hit (crouch head clearance).
    #[reflect(ignore)]
    pub ceiling: Option<CollisionData>,
}

impl MomentumController {
    /// Create a controller with no contacts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the floor normal if the slope probe hit something.
    pub fn floor_normal(&self) -> Option<Vec3> {
        self.floor.as_ref().map(|f| f.normal)
    }

    /// Check if something is directly above the head.
    pub fn head_blocked(&self) -> bool {
        self.ceiling.is_some()
    }

    /// Reset all probe results (called before the sensors run).
    pub(crate) fn reset_contacts(&mut self) {
        self.floor = None;
        self.ceiling = None;
    }
}

/// Camera driven by a controller's mouse look.
///
/// Setup parents the camera to the controller so the body's yaw carries it;
/// after that the controller only writes its local pitch and eye height.
/// Inserted automatically when [`MomentumConfig::generate_camera`] is set.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct ControllerCamera(pub Entity);

/// Body and eye dimensions for each stance.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceConfig {
    /// Total body height while standing.
    pub standing_height: f32,
    /// Total body height while crouched.
    pub crouch_height: f32,
    /// Capsule radius.
    pub radius: f32,
    /// Camera height above the feet while standing.
    pub standing_eye_height: f32,
    /// Camera height above the feet while crouched.
    pub crouch_eye_height: f32,
    /// Length of the upward probe that must be clear before standing up.
    pub head_clearance: f32,
}

impl Default for StanceConfig {
    fn default() -> Self {
        Self {
            standing_height: 2.0,
            crouch_height: 1.0,
            radius: 0.5,
            standing_eye_height: 1.5,
            crouch_eye_height: 0.75,
            head_clearance: 1.0,
        }
    }
}

impl StanceConfig {
    /// Body height for a stance.
    #[inline]
    pub fn body_height(&self, stance: Stance) -> f32 {
        match stance {
            Stance::Standing => self.standing_height,
            Stance::Crouched => self.crouch_height,
        }
    }

    /// Eye height above the feet for a stance.
    #[inline]
    pub fn eye_height(&self, stance: Stance) -> f32 {
        match stance {
            Stance::Standing => self.standing_eye_height,
            Stance::Crouched => self.crouch_eye_height,
        }
    }

    /// Camera offset from the body center for a stance.
    ///
    /// Bodies are centered on their entity origin, so the eye sits
    /// `eye_height - height / 2` above it.
    pub fn camera_offset(&self, stance: Stance) -> Vec3 {
        Vec3::Y * (self.eye_height(stance) - self.body_height(stance) * 0.5)
    }

    /// Offset from the body center down to the feet for a stance.
    pub fn feet_offset(&self, stance: Stance) -> Vec3 {
        Vec3::NEG_Y * self.body_height(stance) * 0.5
    }
}

/// Shape and placement of the ground sensor trigger volume.
///
/// The sensor is a thin cylinder hanging `reach` below the feet. It must be
/// thin enough that a jump clears it within a tick or two, otherwise the
/// persistent overlap reports a landing while still taking off.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSensorConfig {
    /// Cylinder radius. Keep it below the body radius so walls don't ground.
    pub radius: f32,
    /// Total cylinder thickness.
    pub thickness: f32,
    /// How far the volume extends below the feet.
    pub reach: f32,
}

impl Default for GroundSensorConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            thickness: 0.1,
            reach: 0.04,
        }
    }
}

impl GroundSensorConfig {
    /// Sensor center relative to the body center for a stance.
    pub fn offset(&self, stance_config: &StanceConfig, stance: Stance) -> Vec3 {
        stance_config.feet_offset(stance) + Vec3::Y * (self.thickness * 0.5 - self.reach)
    }
}

/// Configuration parameters for momentum movement.
///
/// Defaults match a human-sized player in world units (meters).
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct MomentumConfig {
    // === Look ===
    /// Degrees of rotation per unit of mouse motion.
    pub mouse_sensitivity: f32,

    // === Movement ===
    /// Maximum walk speed (units/second). The force never exceeds this.
    pub walk_speed: f32,

    /// Force gained per second while a movement key is held.
    pub speed_ramp_up: f32,

    /// Constant part of the per-second decay when no movement key is held.
    /// The full decay is `(force + speed_ramp_down) * dt`.
    pub speed_ramp_down: f32,

    // === Jump ===
    /// Upward speed of a jump (units/second).
    pub jump_power: f32,

    // === Gravity ===
    /// Gravity magnitude (units/second^2).
    pub gravity: f32,

    /// Multiplier on how fast fall speed builds up.
    pub fall_velocity_ramp: f32,

    // === Setup ===
    /// Spawn a camera child at eye height if no [`ControllerCamera`] is present.
    pub generate_camera: bool,

    /// Body and eye dimensions.
    pub stance: StanceConfig,

    /// Ground sensor volume.
    pub ground_sensor: GroundSensorConfig,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 2.5,
            walk_speed: 3.0,
            speed_ramp_up: 5.0,
            speed_ramp_down: 5.0,
            jump_power: 3.0,
            gravity: 9.81,
            fall_velocity_ramp: 1.0,
            generate_camera: false,
            stance: StanceConfig::default(),
            ground_sensor: GroundSensorConfig::default(),
        }
    }
}

impl MomentumConfig {
    /// Create a config for a local player that brings its own camera.
    pub fn player() -> Self {
        Self {
            generate_camera: true,
            ..default()
        }
    }

    /// Check every tunable.
    ///
    /// Called once when the controller is attached; ticks trust the result.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("walk_speed", self.walk_speed),
            ("speed_ramp_up", self.speed_ramp_up),
            ("speed_ramp_down", self.speed_ramp_down),
            ("jump_power", self.jump_power),
            ("gravity", self.gravity),
            ("fall_velocity_ramp", self.fall_velocity_ramp),
            ("stance.standing_height", self.stance.standing_height),
            ("stance.crouch_height", self.stance.crouch_height),
            ("stance.radius", self.stance.radius),
            ("stance.standing_eye_height", self.stance.standing_eye_height),
            ("stance.crouch_eye_height", self.stance.crouch_eye_height),
            ("stance.head_clearance", self.stance.head_clearance),
            ("ground_sensor.radius", self.ground_sensor.radius),
            ("ground_sensor.thickness", self.ground_sensor.thickness),
            ("ground_sensor.reach", self.ground_sensor.reach),
        ];

        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let stance = &self.stance;
        if stance.crouch_height >= stance.standing_height
            || stance.radius * 2.0 > stance.crouch_height
        {
            return Err(ConfigError::InvalidStance {
                standing: stance.standing_height,
                crouch: stance.crouch_height,
                radius: stance.radius,
            });
        }

        Ok(())
    }

    /// Builder: set mouse sensitivity.
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Builder: set walk speed (the force ceiling).
    pub fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    /// Builder: set speed ramp constants.
    pub fn with_speed_ramp(mut self, ramp_up: f32, ramp_down: f32) -> Self {
        self.speed_ramp_up = ramp_up;
        self.speed_ramp_down = ramp_down;
        self
    }

    /// Builder: set jump power.
    pub fn with_jump_power(mut self, power: f32) -> Self {
        self.jump_power = power;
        self
    }

    /// Builder: set gravity magnitude and fall ramp.
    pub fn with_gravity(mut self, gravity: f32, fall_velocity_ramp: f32) -> Self {
        self.gravity = gravity;
        self.fall_velocity_ramp = fall_velocity_ramp;
        self
    }

    /// Builder: enable or disable camera generation.
    pub fn with_generated_camera(mut self, enabled: bool) -> Self {
        self.generate_camera = enabled;
        self
    }

    /// Builder: set stance dimensions.
    pub fn with_stance(mut self, stance: StanceConfig) -> Self {
        self.stance = stance;
        self
    }

    /// Builder: set ground sensor shape.
    pub fn with_ground_sensor(mut self, sensor: GroundSensorConfig) -> Self {
        self.ground_sensor = sensor;
        self
    }
}
