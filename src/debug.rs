//! Debug drawing.
//!
//! Gizmo overlay for tuning: movement direction, the slope probe, the
//! surface normal under the feet and the projected slope vector.

use bevy::prelude::*;

use crate::config::{MomentumConfig, MomentumController};
use crate::slope::SLOPE_PROBE_DISTANCE;
use crate::state::MovementState;

const DIRECTION_COLOR: Color = Color::srgb(0.2, 0.4, 1.0);
const PROBE_COLOR: Color = Color::srgb(0.2, 0.8, 0.2);
const NORMAL_COLOR: Color = Color::srgb(0.2, 0.9, 0.9);
const SLOPE_COLOR: Color = Color::srgb(0.9, 0.2, 0.2);

/// Plugin drawing controller gizmos. Needs Bevy's gizmo plugin.
#[derive(Default)]
pub struct MomentumDebugPlugin;

impl Plugin for MomentumDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_controller_gizmos);
    }
}

fn draw_controller_gizmos(
    mut gizmos: Gizmos,
    q_controllers: Query<(
        &GlobalTransform,
        &MomentumController,
        &MovementState,
        &MomentumConfig,
    )>,
) {
    for (transform, controller, state, config) in &q_controllers {
        let feet = transform.translation() + config.stance.feet_offset(state.stance());

        let direction = state.current_direction();
        if direction != Vec3::ZERO {
            gizmos.arrow(feet, feet + direction, DIRECTION_COLOR);
        }

        gizmos.line(feet, feet + Vec3::NEG_Y * SLOPE_PROBE_DISTANCE, PROBE_COLOR);

        if let Some(floor) = &controller.floor {
            gizmos.arrow(floor.point, floor.point + floor.normal, NORMAL_COLOR);
        }

        let slope = state.slope();
        if slope.on_slope() {
            gizmos.arrow(feet, feet + slope.slope_vector(), SLOPE_COLOR);
        }
    }
}
