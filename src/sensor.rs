//! Ground sensor.
//!
//! The sensor is a trigger volume on a child entity just below the feet.
//! The physics backend reports overlaps into [`GroundSensor`], either as
//! begin/end pairs or as the full set seen this step, and every physics
//! step the sensor replays its persistent overlaps into the owner through
//! the [`GroundSignals`] capability. The sensor never touches
//! movement state directly.

use bevy::prelude::*;

/// What a ground sensor may tell its owner.
pub trait GroundSignals {
    /// Set or clear the grounded flag.
    fn set_grounded(&mut self, grounded: bool);

    /// End the current jump cycle.
    fn stop_jumping(&mut self);

    /// Zero the accumulated fall speed.
    fn stop_gravity(&mut self);
}

/// Outcome of one sensor replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorReport {
    /// Overlapping something other than the owner.
    Ground,
    /// Overlapping only the owner's own collider.
    OwnerOnly,
    /// The last overlap ended since the previous replay.
    Cleared,
    /// Nothing overlapped and nothing changed.
    Quiet,
}

/// Link from a controller to its ground sensor child.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct ControllerSensor(pub Entity);

/// Trigger volume that grounds its owner.
///
/// Lives on a child of the controller and is despawned with it.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct GroundSensor {
    owner: Entity,
    overlapping: Vec<Entity>,
    /// Set when the overlap set became empty, consumed by the next replay.
    cleared: bool,
}

impl GroundSensor {
    /// Create a sensor for a controller entity.
    pub fn new(owner: Entity) -> Self {
        Self {
            owner,
            overlapping: Vec::new(),
            cleared: false,
        }
    }

    /// The controller this sensor reports to.
    #[inline]
    pub fn owner(&self) -> Entity {
        self.owner
    }

    /// Entities currently inside the volume.
    pub fn overlapping(&self) -> &[Entity] {
        &self.overlapping
    }

    /// Record that `other` entered the volume.
    pub fn begin_overlap(&mut self, other: Entity) {
        if !self.overlapping.contains(&other) {
            self.overlapping.push(other);
        }
    }

    /// Record that `other` left the volume.
    pub fn end_overlap(&mut self, other: Entity) {
        let before = self.overlapping.len();
        self.overlapping.retain(|e| *e != other);
        if before > 0 && self.overlapping.is_empty() {
            self.cleared = true;
        }
    }

    /// Replace the overlap set with everything the volume touches this step.
    ///
    /// Entities no longer present end their overlap, new ones begin, so
    /// emptying the set arms the same clear as [`Self::end_overlap`].
    pub fn sync_overlaps(&mut self, current: &[Entity]) {
        let ended: Vec<Entity> = self
            .overlapping
            .iter()
            .copied()
            .filter(|e| !current.contains(e))
            .collect();
        for other in ended {
            self.end_overlap(other);
        }
        for &other in current {
            self.begin_overlap(other);
        }
    }

    /// React to a persistent overlap with `other`.
    ///
    /// Anything but the owner lands the body. Touching only the owner means
    /// the volume is resting against its own body, which is not ground.
    pub fn on_overlap<S: GroundSignals>(&self, other: Entity, signals: &mut S) {
        if other != self.owner {
            signals.set_grounded(true);
            signals.stop_jumping();
            signals.stop_gravity();
        } else {
            signals.set_grounded(false);
        }
    }

    /// React to the last overlap ending.
    pub fn on_overlap_end<S: GroundSignals>(&self, signals: &mut S) {
        signals.set_grounded(false);
    }

    /// Replay this step's overlaps into the owner.
    ///
    /// A pending clear fires first, so an exit followed by a new overlap in
    /// the same step still ends grounded. Ground overlaps win over the
    /// owner's own collider regardless of event order.
    pub fn replay<S: GroundSignals>(&mut self, signals: &mut S) -> SensorReport {
        let cleared = std::mem::take(&mut self.cleared);
        if cleared {
            self.on_overlap_end(signals);
        }

        if let Some(ground) = self.overlapping.iter().copied().find(|e| *e != self.owner) {
            self.on_overlap(ground, signals);
            return SensorReport::Ground;
        }

        if !self.overlapping.is_empty() {
            self.on_overlap(self.owner, signals);
            return SensorReport::OwnerOnly;
        }

        if cleared {
            SensorReport::Cleared
        } else {
            SensorReport::Quiet
        }
    }
}
