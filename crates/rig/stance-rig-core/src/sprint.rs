//! Compact sprint pose gate.
//!
//! Decides whether the host's sprint animation should use the compact
//! weapon-size marker, with a short linger after sprinting stops.

use serde::{Deserialize, Serialize};

use crate::config::{PoseConfig, SprintConfig};
use crate::host::HeldItem;
use crate::stance::PoseMode;

/// Weapon-size parameter that selects the compact sprint animation.
pub const COMPACT_WEAPON_SIZE: f32 = 2.0;
/// Weapon-size parameter used when nothing sized is held.
pub const NEUTRAL_WEAPON_SIZE: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SprintGateState {
    #[default]
    Inactive,
    Active,
    /// Eligibility was lost; the pose lingers until `remaining` runs out.
    PendingDisable { remaining: f32 },
}

/// Everything the gate reads for one tick.
#[derive(Clone, Copy, Debug)]
pub struct SprintContext<'a> {
    pub mode: PoseMode,
    pub aiming: bool,
    pub sprinting: bool,
    pub held: &'a HeldItem,
}

#[derive(Debug, Default, Clone)]
pub struct SprintGate {
    state: SprintGateState,
}

impl SprintGate {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> SprintGateState {
        self.state
    }

    /// True while the compact pose is shown, including the linger window.
    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, SprintGateState::Inactive)
    }

    /// Pure eligibility check.
    pub fn evaluate(ctx: &SprintContext<'_>, poses: &PoseConfig, limits: &SprintConfig) -> bool {
        let stance_allows = poses
            .stance(ctx.mode)
            .is_some_and(|stance| stance.sprint_pose_enabled);
        if !stance_allows || !ctx.sprinting || ctx.aiming {
            return false;
        }
        let Some(weapon) = ctx.held.weapon() else {
            return false;
        };
        let weight_limit = if weapon.compact {
            limits.compact_weight_limit_kg
        } else {
            limits.weight_limit_kg
        };
        weapon.weight_kg <= weight_limit
            && weapon.length_slots <= limits.length_limit_slots
            && weapon.ergonomics > limits.min_ergonomics
    }

    /// Advance the state machine by `dt`.
    ///
    /// Returns the weapon size to write when the visible pose changes.
    pub fn update(
        &mut self,
        ctx: &SprintContext<'_>,
        poses: &PoseConfig,
        limits: &SprintConfig,
        dt: f32,
    ) -> Option<f32> {
        let eligible = Self::evaluate(ctx, poses, limits);
        let urgent = ctx.aiming || !ctx.held.is_firearm();

        match self.state {
            SprintGateState::Inactive => {
                if eligible {
                    self.state = SprintGateState::Active;
                    return Some(COMPACT_WEAPON_SIZE);
                }
                None
            }
            SprintGateState::Active => {
                if eligible {
                    return None;
                }
                if urgent || limits.disable_delay_s <= 0.0 {
                    return Some(self.collapse(ctx.held));
                }
                self.state = SprintGateState::PendingDisable {
                    remaining: limits.disable_delay_s,
                };
                None
            }
            SprintGateState::PendingDisable { remaining } => {
                if eligible {
                    self.state = SprintGateState::Active;
                    return None;
                }
                let remaining = remaining - dt.max(0.0);
                if urgent || remaining <= 0.0 {
                    return Some(self.collapse(ctx.held));
                }
                self.state = SprintGateState::PendingDisable { remaining };
                None
            }
        }
    }

    fn collapse(&mut self, held: &HeldItem) -> f32 {
        self.state = SprintGateState::Inactive;
        held.weapon()
            .map_or(NEUTRAL_WEAPON_SIZE, |w| w.length_slots as f32)
    }

    pub fn reset(&mut self) {
        self.state = SprintGateState::Inactive;
    }
}
