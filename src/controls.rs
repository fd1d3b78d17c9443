//! Keyboard and mouse input.
//!
//! Optional plugin that fills [`MovementInput`] for entities marked
//! [`LocalPlayer`]. Anything else (AI, replays, network) can write
//! `MovementInput` directly and skip this plugin.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::intent::{Action, MovementInput};

/// Marks the controller driven by the local keyboard and mouse.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct LocalPlayer;

/// Key bindings for the local player.
#[derive(Resource, Reflect, Debug, Clone, PartialEq)]
#[reflect(Resource)]
pub struct InputBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub crouch: KeyCode,
    /// Toggles the cursor lock.
    pub release_cursor: KeyCode,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
            crouch: KeyCode::ControlLeft,
            release_cursor: KeyCode::Escape,
        }
    }
}

impl InputBindings {
    /// The key bound to an action.
    pub fn key(&self, action: Action) -> KeyCode {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Jump => self.jump,
            Action::Crouch => self.crouch,
        }
    }
}

/// Plugin mapping keyboard and mouse onto [`MovementInput`].
pub struct MomentumInputPlugin {
    /// Lock and hide the cursor on startup.
    pub lock_cursor: bool,
}

impl Default for MomentumInputPlugin {
    fn default() -> Self {
        Self { lock_cursor: true }
    }
}

impl Plugin for MomentumInputPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<LocalPlayer>();
        app.register_type::<InputBindings>();
        app.init_resource::<InputBindings>();

        // Input is gathered every frame and consumed by the next fixed tick
        app.add_systems(PreUpdate, read_player_input.after(bevy::input::InputSystem));

        if self.lock_cursor {
            app.add_systems(Startup, lock_cursor);
            app.add_systems(Update, toggle_cursor_lock);
        }
    }
}

/// Copy key states into an input component.
///
/// Held actions are levels. Crouch is latched on the press edge only.
pub fn apply_key_states(
    keys: &ButtonInput<KeyCode>,
    bindings: &InputBindings,
    input: &mut MovementInput,
) {
    for action in Action::MOVEMENT.into_iter().chain([Action::Jump]) {
        input.set_action(action, keys.pressed(bindings.key(action)));
    }

    input.crouch = keys.pressed(bindings.crouch);
    if keys.just_pressed(bindings.crouch) {
        input.request_crouch_toggle();
    }
}

fn read_player_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    mut mouse_events: EventReader<MouseMotion>,
    mut q_players: Query<&mut MovementInput, With<LocalPlayer>>,
) {
    let mut mouse_delta = Vec2::ZERO;
    for mouse_event in mouse_events.read() {
        mouse_delta += mouse_event.delta;
    }
    // Screen y grows downward, look delta y looks up
    let look_delta = Vec2::new(mouse_delta.x, -mouse_delta.y);

    for mut input in &mut q_players {
        apply_key_states(&keys, &bindings, &mut input);
        if look_delta != Vec2::ZERO {
            input.add_look_delta(look_delta);
        }
    }
}

fn set_cursor_lock(window: &mut Window, locked: bool) {
    window.cursor_options.grab_mode = if locked {
        CursorGrabMode::Locked
    } else {
        CursorGrabMode::None
    };
    window.cursor_options.visible = !locked;
}

fn lock_cursor(mut q_windows: Query<&mut Window, With<PrimaryWindow>>) {
    let Ok(mut window) = q_windows.single_mut() else {
        return;
    };
    set_cursor_lock(&mut window, true);
}

fn toggle_cursor_lock(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    mut q_windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !keys.just_pressed(bindings.release_cursor) {
        return;
    }
    let Ok(mut window) = q_windows.single_mut() else {
        return;
    };
    let locked = window.cursor_options.grab_mode != CursorGrabMode::None;
    set_cursor_lock(&mut window, !locked);
}
