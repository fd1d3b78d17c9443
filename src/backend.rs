//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to work with the momentum controller. The controller itself never talks
//! to a physics engine; it hands a displacement to the backend's
//! sweep-and-slide primitive and reads probe results the backend's own
//! systems write into [`MomentumController`](crate::config::MomentumController).

use bevy::prelude::*;

use crate::config::GroundSensorConfig;

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the momentum
/// controller. Besides the static operations below, the backend's plugin is
/// expected to:
///
/// - fill `MomentumController::floor` and `MomentumController::ceiling` in
///   [`MomentumControllerSet::Sensors`](crate::MomentumControllerSet::Sensors)
/// - report what each ground sensor volume overlaps, in the same set,
///   through [`GroundSensor::sync_overlaps`](crate::sensor::GroundSensor::sync_overlaps)
///   or the [`begin_overlap`](crate::sensor::GroundSensor::begin_overlap) /
///   [`end_overlap`](crate::sensor::GroundSensor::end_overlap) pair
///
/// # Example
///
/// For an example implementation, see the `rapier` module's `Rapier3dBackend`
/// which implements this trait for Bevy Rapier3D.
pub trait MomentumPhysicsBackend: 'static + Send + Sync {
    /// The component driving sweep-and-slide movement for this backend.
    ///
    /// Controllers without it fail setup.
    type MoveComponent: Component;

    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Queue a world-space displacement for this physics step.
    ///
    /// The backend sweeps the body along it and slides along whatever it
    /// hits. Ground sticking is not the backend's concern: the controller
    /// supplies its own gravity.
    fn move_and_slide(world: &mut World, entity: Entity, displacement: Vec3);

    /// Components that turn the sensor child entity into a trigger volume
    /// reporting overlaps.
    fn ground_sensor_collider(config: &GroundSensorConfig) -> impl Bundle;

    /// Resize the body's collider, centered on the entity origin.
    fn resize_body(world: &mut World, entity: Entity, height: f32, radius: f32);

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}
