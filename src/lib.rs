//! # `momentum_controller`
//!
//! A first-person kinematic character controller with momentum-based
//! movement and physics backend abstraction.
//!
//! This crate provides a character controller that:
//! - Ramps speed up while movement keys are held and lets it bleed off after
//! - Samples movement direction on a slower cadence and keeps sliding in the
//!   last direction while slowing down
//! - Reprojects movement onto slopes under the feet
//! - Accumulates its own gravity and latches jumps until a ground sensor
//!   reports a landing
//! - Crouches with a head-clearance check before standing back up
//! - Drives a first-person camera with mouse look
//! - Abstracts physics backend for easy swapping (Rapier3D included)
//!
//! ## Architecture
//!
//! The controller is **kinematic**:
//! 1. The backend sweeps the body along a displacement and slides along hits
//! 2. A short downward ray feeds slope detection
//! 3. A thin trigger volume under the feet decides whether the body is grounded
//! 4. A pure motor tick turns input and sensor state into that displacement
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use momentum_controller::prelude::*;
//!
//! // Create controller components for a player
//! let controller = MomentumController::new();
//! let config = MomentumConfig::player().with_walk_speed(4.0);
//! let input = MovementInput::default();
//!
//! // These can be spawned with the physics backend's components
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod controls;
pub mod debug;
pub mod direction;
pub mod error;
pub mod gravity;
pub mod intent;
pub mod jump;
pub mod look;
pub mod motor;
pub mod ramp;
pub mod sensor;
pub mod slope;
pub mod stance;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::MomentumPhysicsBackend;
    pub use crate::collision::CollisionData;
    pub use crate::config::{
        ControllerCamera, GroundSensorConfig, MomentumConfig, MomentumController, StanceConfig,
    };
    pub use crate::controls::{InputBindings, LocalPlayer, MomentumInputPlugin};
    pub use crate::debug::MomentumDebugPlugin;
    pub use crate::error::{ConfigError, SetupError};
    pub use crate::intent::{Action, MovementInput};
    pub use crate::sensor::{ControllerSensor, GroundSensor, GroundSignals};
    pub use crate::stance::Stance;
    pub use crate::state::{Airborne, Crouching, Grounded, MovementState};
    pub use crate::{MomentumControllerPlugin, MomentumControllerSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// System sets for the controller's fixed-step pipeline, run in order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MomentumControllerSet {
    /// Attach new controllers and clear last tick's probe results.
    Preparation,
    /// Backend probes and ground sensor bookkeeping.
    Sensors,
    /// Ground sensor replay and the motor tick.
    Motor,
    /// Sync marker components.
    Apply,
}

/// Main plugin for the momentum controller.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (sweep-and-slide, probes, trigger overlaps).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier3dBackend`)
///
/// # Examples
///
/// With Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use momentum_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
///     .add_plugins(MomentumControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct MomentumControllerPlugin<B: backend::MomentumPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::MomentumPhysicsBackend> Default for MomentumControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::MomentumPhysicsBackend> Plugin for MomentumControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::MomentumController>();
        app.register_type::<config::MomentumConfig>();
        app.register_type::<config::ControllerCamera>();
        app.register_type::<intent::MovementInput>();
        app.register_type::<sensor::GroundSensor>();
        app.register_type::<sensor::ControllerSensor>();
        app.register_type::<state::MovementState>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::Crouching>();

        app.configure_sets(
            FixedUpdate,
            (
                MomentumControllerSet::Preparation,
                MomentumControllerSet::Sensors,
                MomentumControllerSet::Motor,
                MomentumControllerSet::Apply,
            )
                .chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // Add core systems in FixedUpdate for consistent physics behavior
        app.add_systems(
            FixedUpdate,
            (systems::attach_controllers::<B>, systems::reset_contacts)
                .chain()
                .in_set(MomentumControllerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            (systems::replay_ground_sensors, systems::apply_momentum::<B>)
                .chain()
                .in_set(MomentumControllerSet::Motor),
        );
        app.add_systems(
            FixedUpdate,
            systems::sync_state_markers.in_set(MomentumControllerSet::Apply),
        );
    }
}
