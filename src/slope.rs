//! Slope projection.

use bevy::prelude::*;

use crate::collision::CollisionData;

/// Length of the downward slope probe, measured from the feet.
pub const SLOPE_PROBE_DISTANCE: f32 = 0.5;

/// Reprojects the movement direction onto the surface under the feet.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct SlopeProjector {
    /// Direction reprojected onto the slope plane. Valid while `on_slope`.
    slope_vector: Vec3,
    on_slope: bool,
    /// Normal of the last slope hit, kept for debug drawing.
    normal: Vec3,
}

impl SlopeProjector {
    /// Update from this tick's downward probe.
    ///
    /// A hit whose normal is exactly world up counts as flat ground; any
    /// other hit is a slope and the direction is projected with
    /// `cross(cross(direction, -up), normal)`.
    pub fn update(&mut self, floor: Option<&CollisionData>, current_direction: Vec3, up: Vec3) {
        match floor {
            Some(hit) if !hit.is_flat(Vec3::Y) => {
                self.normal = hit.normal;
                self.slope_vector = current_direction.cross(-up).cross(hit.normal);
                self.on_slope = true;
            }
            _ => self.on_slope = false,
        }
    }

    /// Whether the body is standing on a non-flat surface.
    #[inline]
    pub fn on_slope(&self) -> bool {
        self.on_slope
    }

    /// Direction projected onto the slope plane (stale while not on a slope).
    #[inline]
    pub fn slope_vector(&self) -> Vec3 {
        self.slope_vector
    }

    /// Normal of the most recent slope.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}
