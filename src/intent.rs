//! Movement input components.
//!
//! Input arrives as plain boolean "action held" signals plus accumulated
//! mouse deltas. Any source can write them: the bundled keyboard/mouse
//! plugin, AI, replays, or tests. The controller consumes one
//! [`InputFrame`] per tick.

use bevy::prelude::*;

/// The actions the controller reacts to.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Crouch,
}

impl Action {
    /// The four directional actions.
    pub const MOVEMENT: [Action; 4] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
    ];
}

/// Current input state for one controller.
///
/// Held flags are levels: set them every frame with the current state.
/// Crouch is edge-triggered; call [`MovementInput::request_crouch_toggle`]
/// on the press and the request stays latched until a tick consumes it.
/// Mouse motion accumulates between ticks.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use momentum_controller::prelude::*;
///
/// let mut input = MovementInput::new();
/// input.set_action(Action::Forward, true);
/// assert!(input.is_moving());
///
/// input.add_look_delta(Vec2::new(1.0, 0.0));
/// let frame = input.take_frame();
/// assert_eq!(frame.look_delta, Vec2::new(1.0, 0.0));
/// assert_eq!(input.look_delta(), Vec2::ZERO);
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch: bool,
    /// Latched crouch press, consumed by the next tick.
    pub(crate) crouch_toggle: bool,
    /// Mouse motion since the last tick (x = turn right, y = look up).
    pub(crate) look_delta: Vec2,
}

impl MovementInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether an action is held.
    pub fn set_action(&mut self, action: Action, held: bool) {
        match action {
            Action::Forward => self.forward = held,
            Action::Backward => self.backward = held,
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            Action::Jump => self.jump = held,
            Action::Crouch => self.crouch = held,
        }
    }

    /// Check whether an action is held.
    pub fn is_action_held(&self, action: Action) -> bool {
        match action {
            Action::Forward => self.forward,
            Action::Backward => self.backward,
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Jump => self.jump,
            Action::Crouch => self.crouch,
        }
    }

    /// Check if any directional action is held.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Latch a crouch press for the next tick.
    pub fn request_crouch_toggle(&mut self) {
        self.crouch_toggle = true;
    }

    /// Check if a crouch press is waiting to be consumed.
    pub fn crouch_toggle_pending(&self) -> bool {
        self.crouch_toggle
    }

    /// Accumulate mouse motion (x = turn right, y = look up).
    pub fn add_look_delta(&mut self, delta: Vec2) {
        self.look_delta += delta;
    }

    /// Mouse motion accumulated since the last tick.
    pub fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    /// Release every action and drop pending edges and motion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot the input for one tick, consuming the crouch edge and the
    /// accumulated mouse motion.
    pub fn take_frame(&mut self) -> InputFrame {
        let frame = InputFrame {
            forward: self.forward,
            backward: self.backward,
            left: self.left,
            right: self.right,
            jump: self.jump,
            crouch: self.crouch,
            crouch_pressed: self.crouch_toggle,
            look_delta: self.look_delta,
        };
        self.crouch_toggle = false;
        self.look_delta = Vec2::ZERO;
        frame
    }
}

/// The input seen by a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Crouch is held. Informational; stance only reacts to the press.
    pub crouch: bool,
    /// Crouch went down since the previous tick.
    pub crouch_pressed: bool,
    /// Mouse motion since the previous tick.
    pub look_delta: Vec2,
}

impl InputFrame {
    /// Check if any directional action is held.
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Builder: hold an action.
    pub fn holding(mut self, action: Action) -> Self {
        match action {
            Action::Forward => self.forward = true,
            Action::Backward => self.backward = true,
            Action::Left => self.left = true,
            Action::Right => self.right = true,
            Action::Jump => self.jump = true,
            Action::Crouch => self.crouch = true,
        }
        self
    }

    /// Builder: press crouch this tick, which requests a stance toggle.
    pub fn pressing_crouch(mut self) -> Self {
        self.crouch = true;
        self.crouch_pressed = true;
        self
    }
}
