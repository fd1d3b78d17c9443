//! Playground Example
//!
//! A first-person scene for trying the controller:
//! - A large floor
//! - A ramp to walk up
//! - A low tunnel you can only pass crouched
//! - A few crates to jump on
//!
//! ## Controls
//! - **WASD**: Move
//! - **Mouse**: Look
//! - **Space**: Jump
//! - **Left Ctrl**: Toggle crouch
//! - **Escape**: Release / grab the cursor

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use momentum_controller::prelude::*;

// ==================== Constants ====================

const FLOOR_HALF_SIZE: f32 = 30.0;
const RAMP_ANGLE_DEGREES: f32 = 20.0;
const TUNNEL_CLEARANCE: f32 = 1.4;

// ==================== Main ====================

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Playground - Momentum Controller Example".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics, stepped alongside the controller
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        // Character controller
        .add_plugins(MomentumControllerPlugin::<Rapier3dBackend>::default())
        .add_plugins(MomentumInputPlugin::default())
        .add_plugins(MomentumDebugPlugin)
        .add_systems(Startup, setup)
        .run();
}

// ==================== Setup ====================

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let ground_material = materials.add(Color::srgb(0.35, 0.45, 0.35));
    let prop_material = materials.add(Color::srgb(0.6, 0.5, 0.4));

    // Floor
    spawn_block(
        &mut commands,
        &mut meshes,
        ground_material.clone(),
        Transform::from_xyz(0.0, -0.5, 0.0),
        Vec3::new(FLOOR_HALF_SIZE, 0.5, FLOOR_HALF_SIZE),
    );

    // Ramp rising toward -Z
    spawn_block(
        &mut commands,
        &mut meshes,
        ground_material,
        Transform::from_xyz(6.0, 0.8, -8.0)
            .with_rotation(Quat::from_rotation_x(RAMP_ANGLE_DEGREES.to_radians())),
        Vec3::new(2.0, 0.2, 5.0),
    );

    // Tunnel: two walls and a low roof
    for x in [-7.0, -4.0] {
        spawn_block(
            &mut commands,
            &mut meshes,
            prop_material.clone(),
            Transform::from_xyz(x, TUNNEL_CLEARANCE * 0.5, -6.0),
            Vec3::new(0.25, TUNNEL_CLEARANCE * 0.5, 4.0),
        );
    }
    spawn_block(
        &mut commands,
        &mut meshes,
        prop_material.clone(),
        Transform::from_xyz(-5.5, TUNNEL_CLEARANCE + 0.25, -6.0),
        Vec3::new(1.75, 0.25, 4.0),
    );

    // Crates
    for (i, height) in [0.5_f32, 0.9, 1.3].into_iter().enumerate() {
        let x = -2.0 + i as f32 * 2.5;
        spawn_block(
            &mut commands,
            &mut meshes,
            prop_material.clone(),
            Transform::from_xyz(x, height * 0.5, 6.0),
            Vec3::new(0.75, height * 0.5, 0.75),
        );
    }

    spawn_player(&mut commands);

    commands.spawn((
        Text::new("WASD: Move | Mouse: Look | Space: Jump | Ctrl: Crouch | Esc: Cursor"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    transform: Transform,
    half_extents: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(half_extents * 2.0))),
        MeshMaterial3d(material),
        transform,
        RigidBody::Fixed,
        Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
    ));
}

fn spawn_player(commands: &mut Commands) {
    let config = MomentumConfig::player();

    commands.spawn((
        Name::new("Player"),
        Transform::from_xyz(0.0, 2.0, 0.0),
        Visibility::default(),
        MomentumController::new(),
        config,
        LocalPlayer,
        Rapier3dCharacterBundle::new(&config.stance).with_autostep(CharacterAutostep {
            max_height: CharacterLength::Absolute(0.3),
            min_width: CharacterLength::Absolute(0.2),
            include_dynamic_bodies: false,
        }),
    ));
}
