//! Integration tests for the momentum controller.
//!
//! These tests drive the full plugin through a headless app with a
//! recording backend: moves are applied straight to the transform, and the
//! tests play the physics engine by feeding ground sensor overlaps and
//! ceiling hits by hand. Each test produces PROOF through explicit
//! transform/state checks.

use bevy::prelude::*;
use momentum_controller::backend::MomentumPhysicsBackend;
use momentum_controller::config::GroundSensorConfig;
use momentum_controller::prelude::*;

// ==================== Test Backend ====================

/// Records every displacement handed to the backend.
#[derive(Component, Default)]
struct TestMover {
    moves: Vec<Vec3>,
}

/// Last body size the backend was asked for.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
struct TestBody {
    height: f32,
    radius: f32,
}

/// Sensor volume shape, as the backend received it.
#[derive(Component)]
struct TestSensorShape(GroundSensorConfig);

/// Puts a ceiling right above the head of the entity carrying it.
#[derive(Component)]
struct TestCeiling;

struct TestBackend;

impl MomentumPhysicsBackend for TestBackend {
    type MoveComponent = TestMover;

    fn plugin() -> impl Plugin {
        TestBackendPlugin
    }

    fn move_and_slide(world: &mut World, entity: Entity, displacement: Vec3) {
        if let Some(mut mover) = world.get_mut::<TestMover>(entity) {
            mover.moves.push(displacement);
        }
        if let Some(mut transform) = world.get_mut::<Transform>(entity) {
            transform.translation += displacement;
        }
    }

    fn ground_sensor_collider(config: &GroundSensorConfig) -> impl Bundle {
        TestSensorShape(*config)
    }

    fn resize_body(world: &mut World, entity: Entity, height: f32, radius: f32) {
        if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
            entity_mut.insert(TestBody { height, radius });
        }
    }
}

struct TestBackendPlugin;

impl Plugin for TestBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            test_ceiling_probe.in_set(MomentumControllerSet::Sensors),
        );
    }
}

fn test_ceiling_probe(mut q: Query<&mut MomentumController, With<TestCeiling>>) {
    for mut controller in &mut q {
        controller.ceiling = Some(CollisionData::new(0.2, Vec3::NEG_Y, Vec3::ZERO, None));
    }
}

// ==================== Helpers ====================

/// Create a minimal test app with the momentum controller.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(MomentumControllerPlugin::<TestBackend>::default());
    app.insert_resource(Time::<Fixed>::from_hz(60.0));

    app.finish();
    app.cleanup();
    app
}

/// Spawn a player controller with a generated camera.
fn spawn_player(app: &mut App) -> Entity {
    spawn_with_config(app, MomentumConfig::player())
}

fn spawn_with_config(app: &mut App, config: MomentumConfig) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_xyz(0.0, 1.0, 0.0),
            MomentumController::new(),
            config,
            TestMover::default(),
        ))
        .id()
}

/// Run one fixed physics step.
fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

/// Run the app for N physics steps.
fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        tick(app);
    }
}

fn sensor_of(app: &App, entity: Entity) -> Entity {
    app.world()
        .get::<ControllerSensor>(entity)
        .map(|s| s.0)
        .expect("controller should have a ground sensor")
}

fn camera_of(app: &App, entity: Entity) -> Entity {
    app.world()
        .get::<ControllerCamera>(entity)
        .map(|c| c.0)
        .expect("controller should have a camera")
}

fn state(app: &App, entity: Entity) -> &MovementState {
    app.world().get::<MovementState>(entity).unwrap()
}

fn translation(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).unwrap().translation
}

fn input(app: &mut App, entity: Entity) -> Mut<'_, MovementInput> {
    app.world_mut().get_mut::<MovementInput>(entity).unwrap()
}

/// Spawn a ground entity and report it inside the controller's sensor.
fn touch_ground(app: &mut App, entity: Entity) -> Entity {
    let ground = app.world_mut().spawn(Name::new("Ground")).id();
    let sensor = sensor_of(app, entity);
    app.world_mut()
        .get_mut::<GroundSensor>(sensor)
        .unwrap()
        .begin_overlap(ground);
    ground
}

fn leave_ground(app: &mut App, entity: Entity, ground: Entity) {
    let sensor = sensor_of(app, entity);
    app.world_mut()
        .get_mut::<GroundSensor>(sensor)
        .unwrap()
        .end_overlap(ground);
}

// ==================== Setup Tests ====================

mod setup {
    use super::*;

    #[test]
    fn attach_spawns_sensor_child() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);

        tick(&mut app);

        let sensor = sensor_of(&app, player);
        let world = app.world();

        // PROOF: sensor reports to the controller and hangs off it
        assert_eq!(world.get::<GroundSensor>(sensor).map(|s| s.owner()), Some(player));
        assert_eq!(world.get::<ChildOf>(sensor).map(|c| c.parent()), Some(player));
        assert!(world.get::<TestSensorShape>(sensor).is_some());

        // PROOF: sensor sits just below the feet
        let config = MomentumConfig::player();
        let expected = config.ground_sensor.offset(&config.stance, Stance::Standing);
        assert_eq!(world.get::<Transform>(sensor).map(|t| t.translation), Some(expected));
    }

    #[test]
    fn attach_generates_camera_at_eye_height() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);

        tick(&mut app);

        let camera = camera_of(&app, player);
        let world = app.world();

        assert!(world.get::<Camera3d>(camera).is_some());
        assert_eq!(world.get::<ChildOf>(camera).map(|c| c.parent()), Some(player));

        // 1.5 eye height on a 2.0 body centered on the origin
        let offset = world.get::<Transform>(camera).map(|t| t.translation).unwrap();
        assert!((offset - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn attach_keeps_user_camera() {
        let mut app = create_test_app();
        let camera = app.world_mut().spawn(Transform::default()).id();
        let player = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 1.0, 0.0),
                MomentumController::new(),
                MomentumConfig::default(),
                ControllerCamera(camera),
                TestMover::default(),
            ))
            .id();

        tick(&mut app);

        assert_eq!(camera_of(&app, player), camera);
        assert!(translation(&app, camera).y > 0.0);
        // PROOF: a free-standing camera is adopted by the body
        assert_eq!(
            app.world().get::<ChildOf>(camera).map(|c| c.parent()),
            Some(player)
        );
    }

    #[test]
    fn user_camera_follows_body_yaw() {
        let mut app = create_test_app();
        let camera = app.world_mut().spawn(Transform::default()).id();
        let player = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 1.0, 0.0),
                MomentumController::new(),
                MomentumConfig::default(),
                ControllerCamera(camera),
                TestMover::default(),
            ))
            .id();
        tick(&mut app);

        // 36 * 2.5 = 90 degrees right
        input(&mut app, player).add_look_delta(Vec2::new(36.0, 0.0));
        tick(&mut app);

        // Local camera rotation stays pure pitch, the parent carries the yaw
        let local = app.world().get::<Transform>(camera).unwrap().rotation;
        assert!(local.angle_between(Quat::IDENTITY) < 1e-4);
        let body = app.world().get::<Transform>(player).unwrap().forward();
        assert!((*body - Vec3::X).length() < 1e-4);
        assert_eq!(
            app.world().get::<ChildOf>(camera).map(|c| c.parent()),
            Some(player)
        );
    }

    #[test]
    fn attach_sizes_body() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);

        tick(&mut app);

        assert_eq!(
            app.world().get::<TestBody>(player).copied(),
            Some(TestBody {
                height: 2.0,
                radius: 0.5
            })
        );
    }

    #[test]
    #[should_panic]
    fn missing_camera_fails_setup() {
        let mut app = create_test_app();
        // Camera generation disabled and no camera given
        spawn_with_config(&mut app, MomentumConfig::default());

        tick(&mut app);
    }

    #[test]
    #[should_panic]
    fn missing_move_primitive_fails_setup() {
        let mut app = create_test_app();
        app.world_mut().spawn((
            Transform::default(),
            MomentumController::new(),
            MomentumConfig::player(),
        ));

        tick(&mut app);
    }

    #[test]
    #[should_panic]
    fn invalid_config_fails_setup() {
        let mut app = create_test_app();
        spawn_with_config(&mut app, MomentumConfig::player().with_walk_speed(0.0));

        tick(&mut app);
    }

    #[test]
    fn despawn_removes_sensor_and_camera() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);
        let sensor = sensor_of(&app, player);
        let camera = camera_of(&app, player);

        app.world_mut().despawn(player);

        assert!(app.world().get_entity(sensor).is_err());
        assert!(app.world().get_entity(camera).is_err());
    }
}

// ==================== Movement Tests ====================

mod movement {
    use super::*;

    #[test]
    fn forward_moves_along_negative_z() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);
        touch_ground(&mut app, player);
        tick(&mut app);
        let start = translation(&app, player);
        input(&mut app, player).forward = true;

        run_frames(&mut app, 60);

        let position = translation(&app, player);
        // PROOF: moved forward, stayed on the ground plane
        assert!(position.z < start.z - 0.5, "z = {}", position.z);
        assert!((position.x - start.x).abs() < 1e-4);
        assert!((position.y - start.y).abs() < 1e-4);
        assert!(app.world().get::<Grounded>(player).is_some());
    }

    #[test]
    fn releasing_keys_glides_to_a_stop() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);
        touch_ground(&mut app, player);
        input(&mut app, player).forward = true;
        run_frames(&mut app, 60);

        input(&mut app, player).forward = false;
        let released_at = translation(&app, player);
        run_frames(&mut app, 120);
        let stopped_at = translation(&app, player);

        // PROOF: kept sliding forward after release, then stopped
        assert!(stopped_at.z < released_at.z);
        assert_eq!(state(&app, player).force(), 0.0);
        let last_move = app
            .world()
            .get::<TestMover>(player)
            .and_then(|m| m.moves.last().copied());
        assert_eq!(last_move, Some(Vec3::ZERO));
    }

    #[test]
    fn airborne_body_falls() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);

        run_frames(&mut app, 30);

        // PROOF: never touched ground, so gravity built up
        assert!(translation(&app, player).y < 1.0);
        assert!(state(&app, player).gravity().gravity_force() > 0.0);
        assert!(app.world().get::<Airborne>(player).is_some());
        assert!(app.world().get::<Grounded>(player).is_none());
    }

    #[test]
    fn landing_resets_fall_speed() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        run_frames(&mut app, 30);

        touch_ground(&mut app, player);
        tick(&mut app);

        assert!(state(&app, player).is_grounded());
        assert_eq!(state(&app, player).gravity().gravity_force(), 0.0);
        assert!(app.world().get::<Grounded>(player).is_some());
        assert!(app.world().get::<Airborne>(player).is_none());
    }

    #[test]
    fn markers_follow_ground_contact() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);
        assert!(app.world().get::<Airborne>(player).is_some());

        let ground = touch_ground(&mut app, player);
        tick(&mut app);
        // PROOF: Grounded replaces Airborne on landing
        assert!(app.world().get::<Grounded>(player).is_some());
        assert!(app.world().get::<Airborne>(player).is_none());

        leave_ground(&mut app, player, ground);
        tick(&mut app);
        // PROOF: and Airborne comes back when the last overlap ends
        assert!(app.world().get::<Grounded>(player).is_none());
        assert!(app.world().get::<Airborne>(player).is_some());
        assert!(app.world().get::<Crouching>(player).is_none());
    }

    #[test]
    fn jump_latches_until_sensor_lands() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);
        let ground = touch_ground(&mut app, player);
        tick(&mut app);
        assert!(state(&app, player).is_grounded());

        let before = translation(&app, player).y;
        input(&mut app, player).jump = true;
        tick(&mut app);

        // PROOF: jump started and grounded cleared on the same tick
        assert!(state(&app, player).is_jumping());
        assert!(!state(&app, player).is_grounded());
        assert!(translation(&app, player).y > before);

        leave_ground(&mut app, player, ground);
        for _ in 0..120 {
            tick(&mut app);
            // PROOF: still latched no matter how long, even with jump held
            assert!(state(&app, player).is_jumping());
        }

        touch_ground(&mut app, player);
        input(&mut app, player).jump = false;
        tick(&mut app);

        assert!(!state(&app, player).is_jumping());
        assert!(state(&app, player).is_grounded());
    }

    #[test]
    fn mouse_look_turns_body_and_pitches_camera() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);

        // 36 * 2.5 = 90 degrees right, 12 * 2.5 = 30 degrees up
        input(&mut app, player).add_look_delta(Vec2::new(36.0, 12.0));
        tick(&mut app);

        let forward = app.world().get::<Transform>(player).unwrap().forward();
        assert!((*forward - Vec3::X).length() < 1e-4);

        let camera = camera_of(&app, player);
        let view = app.world().get::<Transform>(camera).unwrap().forward();
        assert!(view.y > 0.4);
        assert!((state(&app, player).look().pitch() - 30.0).abs() < 1e-4);

        // PROOF: look motion is consumed, not replayed
        tick(&mut app);
        assert!((state(&app, player).look().pitch() - 30.0).abs() < 1e-4);
    }
}

// ==================== Crouch Tests ====================

mod crouch {
    use super::*;

    #[test]
    fn crouch_shrinks_body_and_keeps_feet() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);
        touch_ground(&mut app, player);
        tick(&mut app);
        let standing_y = translation(&app, player).y;

        input(&mut app, player).request_crouch_toggle();
        tick(&mut app);

        assert_eq!(state(&app, player).stance(), Stance::Crouched);
        assert_eq!(
            app.world().get::<TestBody>(player).map(|b| b.height),
            Some(1.0)
        );
        // PROOF: center dropped by half the height change, feet stayed put
        assert!((translation(&app, player).y - (standing_y - 0.5)).abs() < 1e-5);

        let camera = camera_of(&app, player);
        assert!((translation(&app, camera) - Vec3::new(0.0, 0.25, 0.0)).length() < 1e-5);

        let sensor = sensor_of(&app, player);
        let config = MomentumConfig::player();
        let expected = config.ground_sensor.offset(&config.stance, Stance::Crouched);
        assert!((translation(&app, sensor) - expected).length() < 1e-5);

        assert!(app.world().get::<Crouching>(player).is_some());
    }

    #[test]
    fn blocked_head_keeps_crouch() {
        let mut app = create_test_app();
        let player = spawn_player(&mut app);
        tick(&mut app);
        touch_ground(&mut app, player);
        tick(&mut app);
        let standing_y = translation(&app, player).y;

        input(&mut app, player).request_crouch_toggle();
        tick(&mut app);
        assert_eq!(state(&app, player).stance(), Stance::Crouched);

        app.world_mut().entity_mut(player).insert(TestCeiling);
        input(&mut app, player).request_crouch_toggle();
        tick(&mut app);

        // PROOF: stand-up refused under a ceiling
        assert_eq!(state(&app, player).stance(), Stance::Crouched);
        assert_eq!(
            app.world().get::<TestBody>(player).map(|b| b.height),
            Some(1.0)
        );

        app.world_mut().entity_mut(player).remove::<TestCeiling>();
        input(&mut app, player).request_crouch_toggle();
        tick(&mut app);

        assert_eq!(state(&app, player).stance(), Stance::Standing);
        assert!((translation(&app, player).y - standing_y).abs() < 1e-5);
        assert!(app.world().get::<Crouching>(player).is_none());
    }
}
