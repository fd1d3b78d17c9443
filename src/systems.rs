//! Core controller systems.
//!
//! These systems wire the pure motor into the ECS. They are generic over
//! the physics backend to allow different physics engines to be used.

use bevy::prelude::*;

use crate::backend::MomentumPhysicsBackend;
use crate::config::{ControllerCamera, MomentumConfig, MomentumController};
use crate::error::SetupError;
use crate::intent::MovementInput;
use crate::motor::{MotorFrame, MotorOutput};
use crate::sensor::{ControllerSensor, GroundSensor, SensorReport};
use crate::stance::Stance;
use crate::state::{Airborne, Crouching, Grounded, MovementState};

/// Set up newly added controllers.
///
/// Validates the config, checks for the backend's move primitive, sizes the
/// body, spawns the ground sensor child and attaches (or generates) the
/// camera. Any failure is returned to Bevy's error handler.
pub fn attach_controllers<B: MomentumPhysicsBackend>(
    mut commands: Commands,
    q_new: Query<
        (
            Entity,
            &MomentumConfig,
            &MovementState,
            Has<B::MoveComponent>,
            Option<&ControllerCamera>,
        ),
        Added<MomentumController>,
    >,
) -> Result {
    for (entity, config, state, has_mover, camera) in &q_new {
        config
            .validate()
            .map_err(|e| SetupError::InvalidConfig(entity, e))?;

        if !has_mover {
            return Err(SetupError::MissingMovePrimitive(entity).into());
        }

        let stance = state.stance();
        let camera_offset = config.stance.camera_offset(stance);

        let camera = match camera {
            Some(camera) => {
                let camera = camera.0;
                // Parent it so the body's yaw and movement carry the view
                commands.entity(entity).add_child(camera);
                commands.queue(move |world: &mut World| {
                    if let Some(mut transform) = world.get_mut::<Transform>(camera) {
                        transform.translation = camera_offset;
                    }
                });
                camera
            }
            None if config.generate_camera => {
                let camera = commands
                    .spawn((
                        Name::new("Controller Camera"),
                        Camera3d::default(),
                        Transform::from_translation(camera_offset),
                    ))
                    .id();
                commands
                    .entity(entity)
                    .add_child(camera)
                    .insert(ControllerCamera(camera));
                camera
            }
            None => return Err(SetupError::MissingCamera(entity).into()),
        };

        let sensor = commands
            .spawn((
                Name::new("Ground Sensor"),
                GroundSensor::new(entity),
                Transform::from_translation(config.ground_sensor.offset(&config.stance, stance)),
                B::ground_sensor_collider(&config.ground_sensor),
            ))
            .id();
        commands
            .entity(entity)
            .add_child(sensor)
            .insert(ControllerSensor(sensor));

        let height = config.stance.body_height(stance);
        let radius = config.stance.radius;
        commands.queue(move |world: &mut World| B::resize_body(world, entity, height, radius));

        info!("Attached momentum controller to {entity} (camera {camera}, ground sensor {sensor})");
    }

    Ok(())
}

/// Clear last tick's probe results before the backend sensors run.
pub fn reset_contacts(mut q_controllers: Query<&mut MomentumController>) {
    for mut controller in &mut q_controllers {
        controller.reset_contacts();
    }
}

/// Replay every ground sensor's persistent overlaps into its owner.
pub fn replay_ground_sensors(
    mut q_sensors: Query<&mut GroundSensor>,
    mut q_states: Query<&mut MovementState>,
) {
    for mut sensor in &mut q_sensors {
        let owner = sensor.owner();
        let Ok(mut state) = q_states.get_mut(owner) else {
            warn_once!("Ground sensor reports for {owner}, which has no MovementState");
            continue;
        };

        let was_grounded = state.is_grounded();
        let was_jumping = state.is_jumping();

        let report = sensor.replay(&mut *state);

        if report == SensorReport::Ground && (!was_grounded || was_jumping) {
            debug!("{owner} landed");
        } else if report == SensorReport::Cleared && was_grounded {
            debug!("{owner} left the ground");
        }
    }
}

/// Run the motor for every controller and hand the result to the backend.
pub fn apply_momentum<B: MomentumPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(Entity, MomentumConfig, MotorFrame)> = world
        .query::<(
            Entity,
            &MomentumConfig,
            &MomentumController,
            &Transform,
            &mut MovementInput,
        )>()
        .iter_mut(world)
        .map(|(e, config, controller, transform, mut input)| {
            let frame = MotorFrame {
                input: input.take_frame(),
                body_rotation: transform.rotation,
                floor: controller.floor,
                head_blocked: controller.head_blocked(),
                dt,
            };
            (e, *config, frame)
        })
        .collect();

    for (entity, config, frame) in entities {
        let Some(mut state) = world.get_mut::<MovementState>(entity) else {
            continue;
        };
        let output = state.tick(&frame, &config);

        apply_output::<B>(world, entity, &config, &output);
    }
}

fn apply_output<B: MomentumPhysicsBackend>(
    world: &mut World,
    entity: Entity,
    config: &MomentumConfig,
    output: &MotorOutput,
) {
    if output.jumped {
        debug!("{entity} jumped");
    }
    if output.stand_blocked {
        warn!("{entity} cannot stand up: head clearance blocked");
    }

    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.rotation = output.body_rotation;
    }

    B::move_and_slide(world, entity, output.displacement);

    let camera = world.get::<ControllerCamera>(entity).map(|c| c.0);
    if let Some(mut transform) = camera.and_then(|c| world.get_mut::<Transform>(c)) {
        transform.rotation = output.camera_rotation;
    }

    if let Some(stance) = output.stance_changed {
        apply_stance::<B>(world, entity, config, stance);
    }
}

/// Resize the body for a new stance while keeping the feet in place, then
/// move the camera and the ground sensor to match.
fn apply_stance<B: MomentumPhysicsBackend>(
    world: &mut World,
    entity: Entity,
    config: &MomentumConfig,
    stance: Stance,
) {
    let previous = match stance {
        Stance::Standing => Stance::Crouched,
        Stance::Crouched => Stance::Standing,
    };
    let stance_config = &config.stance;
    let height = stance_config.body_height(stance);
    let delta = height - stance_config.body_height(previous);

    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation.y += delta * 0.5;
    }
    B::resize_body(world, entity, height, stance_config.radius);

    let camera = world.get::<ControllerCamera>(entity).map(|c| c.0);
    if let Some(mut transform) = camera.and_then(|c| world.get_mut::<Transform>(c)) {
        transform.translation = stance_config.camera_offset(stance);
    }

    let sensor = world.get::<ControllerSensor>(entity).map(|s| s.0);
    if let Some(mut transform) = sensor.and_then(|s| world.get_mut::<Transform>(s)) {
        transform.translation = config.ground_sensor.offset(stance_config, stance);
    }

    debug!("{entity} is now {stance:?}");
}

/// Sync state marker components based on the movement state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(
        Entity,
        &MovementState,
        Has<Grounded>,
        Has<Airborne>,
        Has<Crouching>,
    )>,
) {
    for (entity, state, has_grounded, has_airborne, has_crouching) in &q_controllers {
        let grounded = state.is_grounded();

        // Sync Grounded/Airborne
        if grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !grounded && has_grounded {
            commands.entity(entity).remove::<Grounded>().insert(Airborne);
        } else if !grounded && !has_airborne && !has_grounded {
            commands.entity(entity).insert(Airborne);
        }

        // Sync Crouching
        let crouched = state.stance().is_crouched();
        if crouched && !has_crouching {
            commands.entity(entity).insert(Crouching);
        } else if !crouched && has_crouching {
            commands.entity(entity).remove::<Crouching>();
        }
    }
}
