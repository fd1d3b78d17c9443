//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.
//!
//! Controllers are expected to be root entities: probes and the ground
//! sensor are placed from the body's `Transform`, which Rapier writes back
//! every step, so they never lag behind transform propagation.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::MomentumPhysicsBackend;
use crate::collision::CollisionData;
use crate::config::{GroundSensorConfig, MomentumConfig, MomentumController, StanceConfig};
use crate::sensor::GroundSensor;
use crate::slope::SLOPE_PROBE_DISTANCE;
use crate::state::MovementState;

/// Rapier3D physics backend for the momentum controller.
///
/// Movement goes through Rapier's [`KinematicCharacterController`]. Probes
/// are raycasts run by dedicated Rapier systems that receive the Rapier
/// context as a system parameter. The ground sensor volume is tested
/// against the scene with a shape query every step.
pub struct Rapier3dBackend;

impl MomentumPhysicsBackend for Rapier3dBackend {
    type MoveComponent = KinematicCharacterController;

    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn move_and_slide(world: &mut World, entity: Entity, displacement: Vec3) {
        if let Some(mut character_controller) =
            world.get_mut::<KinematicCharacterController>(entity)
        {
            character_controller.translation = Some(displacement);
        }
    }

    fn ground_sensor_collider(config: &GroundSensorConfig) -> impl Bundle {
        (
            Collider::cylinder(config.thickness * 0.5, config.radius),
            Sensor,
        )
    }

    fn resize_body(world: &mut World, entity: Entity, height: f32, radius: f32) {
        if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
            entity_mut.insert(body_collider(height, radius));
        }
    }
}

/// Plugin that sets up Rapier3D-specific systems for the momentum controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        use crate::MomentumControllerSet;

        // With Rapier in the fixed schedule, the move queued by the motor is
        // consumed by the same step
        app.configure_sets(
            FixedUpdate,
            MomentumControllerSet::Apply.before(PhysicsSet::SyncBackend),
        );

        app.add_systems(
            FixedUpdate,
            (rapier_surface_probes, rapier_ground_sensor_overlaps)
                .in_set(MomentumControllerSet::Sensors),
        );
    }
}

/// Capsule collider for a body of the given total height, centered on the
/// entity origin.
pub fn body_collider(height: f32, radius: f32) -> Collider {
    Collider::capsule_y((height * 0.5 - radius).max(0.0), radius)
}

/// Perform a raycast using RapierContext.
fn rapier_raycast(
    context: &RapierContext,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    exclude_entity: Entity,
) -> Option<CollisionData> {
    // Skip the caster's own colliders and every trigger volume
    let filter = QueryFilter::default()
        .exclude_rigid_body(exclude_entity)
        .exclude_sensors();

    context
        .cast_ray_and_get_normal(origin, direction, max_distance, true, filter)
        .map(|(hit_entity, hit)| {
            CollisionData::new(hit.time_of_impact, hit.normal, hit.point, Some(hit_entity))
        })
}

/// Rapier-specific surface probes.
///
/// The slope probe is cast straight down from the feet. The head-clearance
/// probe is only needed while crouched and is cast straight up from the top
/// of the crouched body.
fn rapier_surface_probes(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<(
        Entity,
        &Transform,
        &MomentumConfig,
        &MovementState,
        &mut MomentumController,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, state, mut controller) in &mut q_controllers {
        let stance = state.stance();
        let feet = transform.translation + config.stance.feet_offset(stance);

        controller.floor =
            rapier_raycast(&context, feet, Vec3::NEG_Y, SLOPE_PROBE_DISTANCE, entity);

        if stance.is_crouched() {
            let head = feet + Vec3::Y * config.stance.crouch_height;
            controller.ceiling =
                rapier_raycast(&context, head, Vec3::Y, config.stance.head_clearance, entity);
        }
    }
}

/// Rebuild every ground sensor's overlap set from what its volume
/// currently intersects.
///
/// Overlaps are queried fresh each step rather than tracked through
/// collision events, so a body that comes to rest inside the volume is
/// always seen. The owner's own colliders and other trigger volumes are
/// skipped.
fn rapier_ground_sensor_overlaps(
    rapier_context: ReadRapierContext,
    q_bodies: Query<&Transform, Without<GroundSensor>>,
    mut q_sensors: Query<(&Transform, &Collider, &mut GroundSensor)>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    let mut hits = Vec::new();
    for (local, shape, mut sensor) in &mut q_sensors {
        let owner = sensor.owner();
        let Ok(body) = q_bodies.get(owner) else {
            continue;
        };
        let pose = body.mul_transform(*local);

        let filter = QueryFilter::default()
            .exclude_rigid_body(owner)
            .exclude_sensors();

        hits.clear();
        let (position, rotation) = (pose.translation, pose.rotation);
        context.intersect_shape(position, rotation, &*shape.raw, filter, |other| {
            hits.push(other);
            true
        });

        sensor.sync_overlaps(&hits);
    }
}

/// Bundle for creating a character with Rapier3D physics.
///
/// This bundle provides all the necessary Rapier3D components for a momentum
/// controller entity: a kinematic body, Rapier's character controller for
/// sweep-and-slide, and a capsule collider sized for standing.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use momentum_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     let config = MomentumConfig::player();
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         MomentumController::new(),
///         config,
///         LocalPlayer,
///         Rapier3dCharacterBundle::new(&config.stance),
///     ));
/// }
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::KinematicPositionBased`]
/// - `character_controller`: 1cm skin, no ground snapping (the controller
///   supplies its own gravity), sensors ignored
/// - `collider`: capsule of the standing height and radius
#[derive(Bundle)]
pub struct Rapier3dCharacterBundle {
    /// The rigid body type. Should stay kinematic: the controller owns velocity.
    pub rigid_body: RigidBody,
    /// Rapier's sweep-and-slide mover. The controller writes its translation.
    pub character_controller: KinematicCharacterController,
    /// Body shape. Replaced on stance changes.
    pub collider: Collider,
}

impl Default for Rapier3dCharacterBundle {
    fn default() -> Self {
        Self::new(&StanceConfig::default())
    }
}

impl Rapier3dCharacterBundle {
    /// Create a character bundle sized for a standing body.
    pub fn new(stance: &StanceConfig) -> Self {
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            character_controller: KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                snap_to_ground: None,
                filter_flags: QueryFilterFlags::EXCLUDE_SENSORS,
                ..default()
            },
            collider: body_collider(stance.standing_height, stance.radius),
        }
    }

    /// Let the mover climb small steps.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let bundle = Rapier3dCharacterBundle::default().with_autostep(CharacterAutostep {
    ///     max_height: CharacterLength::Absolute(0.3),
    ///     min_width: CharacterLength::Absolute(0.2),
    ///     include_dynamic_bodies: false,
    /// });
    /// ```
    pub fn with_autostep(mut self, autostep: CharacterAutostep) -> Self {
        self.character_controller.autostep = Some(autostep);
        self
    }

    /// Set the steepest slope (radians) the mover will climb.
    pub fn with_max_slope_climb_angle(mut self, angle: f32) -> Self {
        self.character_controller.max_slope_climb_angle = angle;
        self
    }

    /// Set the skin gap kept between the body and other colliders.
    pub fn with_offset(mut self, offset: f32) -> Self {
        self.character_controller.offset = CharacterLength::Absolute(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app
    }

    /// Half segment length and radius of a capsule collider.
    fn capsule_dimensions(collider: &Collider) -> Option<(f32, f32)> {
        collider.as_capsule().map(|capsule| {
            let segment = capsule.segment();
            ((segment.b().y - segment.a().y).abs() * 0.5, capsule.radius())
        })
    }

    #[test]
    fn body_collider_matches_height() {
        let (half_segment, radius) = capsule_dimensions(&body_collider(2.0, 0.5)).unwrap();
        assert!((half_segment - 0.5).abs() < 1e-5);
        assert!((radius - 0.5).abs() < 1e-5);

        let (half_segment, _) = capsule_dimensions(&body_collider(1.0, 0.5)).unwrap();
        assert!(half_segment.abs() < 1e-5);
    }

    #[test]
    fn body_collider_never_inverts() {
        // Shorter than its diameter degenerates to a ball-like capsule
        let (half_segment, radius) = capsule_dimensions(&body_collider(0.6, 0.5)).unwrap();
        assert_eq!(half_segment, 0.0);
        assert!((radius - 0.5).abs() < 1e-5);
    }

    #[test]
    fn move_and_slide_sets_translation() {
        let mut world = World::new();
        let entity = world.spawn(KinematicCharacterController::default()).id();

        Rapier3dBackend::move_and_slide(&mut world, entity, Vec3::new(0.0, -0.1, 0.05));

        let translation = world
            .get::<KinematicCharacterController>(entity)
            .and_then(|kcc| kcc.translation);
        assert_eq!(translation, Some(Vec3::new(0.0, -0.1, 0.05)));
    }

    #[test]
    fn resize_body_replaces_collider() {
        let mut world = World::new();
        let entity = world.spawn(body_collider(2.0, 0.5)).id();

        Rapier3dBackend::resize_body(&mut world, entity, 1.0, 0.5);

        let (half_segment, radius) = world
            .get::<Collider>(entity)
            .and_then(capsule_dimensions)
            .unwrap();
        assert!((half_segment + radius - 0.5).abs() < 1e-5);
    }

    #[test]
    fn ground_sensor_is_a_trigger() {
        let mut world = World::new();
        let config = GroundSensorConfig::default();
        let entity = world
            .spawn(Rapier3dBackend::ground_sensor_collider(&config))
            .id();

        assert!(world.get::<Sensor>(entity).is_some());
        let half_height = world
            .get::<Collider>(entity)
            .and_then(|c| c.as_cylinder().map(|cyl| cyl.half_height()));
        assert_eq!(half_height, Some(config.thickness * 0.5));
    }

    #[test]
    fn rapier_character_bundle_creates_valid_entity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((Transform::default(), Rapier3dCharacterBundle::default()))
            .id();

        app.update();

        assert_eq!(
            app.world().get::<RigidBody>(entity).copied(),
            Some(RigidBody::KinematicPositionBased)
        );
        let character_controller = app.world().get::<KinematicCharacterController>(entity);
        assert!(character_controller.is_some_and(|kcc| kcc.snap_to_ground.is_none()));
        assert!(app.world().get::<Collider>(entity).is_some());
    }

    #[test]
    fn bundle_builders_tune_the_mover() {
        let bundle = Rapier3dCharacterBundle::default()
            .with_max_slope_climb_angle(0.5)
            .with_offset(0.02);

        assert_eq!(bundle.character_controller.max_slope_climb_angle, 0.5);
        assert_eq!(
            bundle.character_controller.offset,
            CharacterLength::Absolute(0.02)
        );
        assert!(bundle.character_controller.autostep.is_none());
    }
}
