//! Crouch stance.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Body stance.
///
/// Crouching is always allowed. Standing back up needs a clear head probe;
/// a blocked attempt leaves the body crouched.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    Crouched,
}

impl Stance {
    /// The stance a crouch press leads to.
    pub fn toggled(self, head_blocked: bool) -> Stance {
        match self {
            Stance::Standing => Stance::Crouched,
            Stance::Crouched if head_blocked => Stance::Crouched,
            Stance::Crouched => Stance::Standing,
        }
    }

    #[inline]
    pub fn is_crouched(self) -> bool {
        self == Stance::Crouched
    }
}
