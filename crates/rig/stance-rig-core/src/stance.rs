//! Discrete pose mode and the cycle that steps through it.

use serde::{Deserialize, Serialize};

use crate::config::CycleConfig;
use crate::inputs::{CycleEvent, CycleSource};

/// Bound on probes per cycle step; the cycle has four modes plus the start.
const MAX_CYCLE_PROBES: usize = 5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoseMode {
    #[default]
    Default,
    Stance1,
    Stance2,
    Stance3,
}

impl PoseMode {
    pub const ALL: [PoseMode; 4] = [
        PoseMode::Default,
        PoseMode::Stance1,
        PoseMode::Stance2,
        PoseMode::Stance3,
    ];

    /// Neighbour in the fixed cycle order, ignoring enabled flags.
    pub fn step(self, direction: CycleDirection) -> PoseMode {
        match (direction, self) {
            (CycleDirection::Forward, PoseMode::Default) => PoseMode::Stance1,
            (CycleDirection::Forward, PoseMode::Stance1) => PoseMode::Stance2,
            (CycleDirection::Forward, PoseMode::Stance2) => PoseMode::Stance3,
            (CycleDirection::Forward, PoseMode::Stance3) => PoseMode::Default,
            (CycleDirection::Backward, PoseMode::Default) => PoseMode::Stance3,
            (CycleDirection::Backward, PoseMode::Stance1) => PoseMode::Default,
            (CycleDirection::Backward, PoseMode::Stance2) => PoseMode::Stance1,
            (CycleDirection::Backward, PoseMode::Stance3) => PoseMode::Stance2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleDirection {
    Forward,
    Backward,
}

/// Next enabled mode from `current` in `direction`, or `current` when no other mode is enabled.
pub fn next_enabled(current: PoseMode, direction: CycleDirection, cfg: &CycleConfig) -> PoseMode {
    let mut probe = current;
    for _ in 0..MAX_CYCLE_PROBES {
        probe = probe.step(direction);
        if probe == current {
            break;
        }
        if cfg.is_enabled(probe) {
            return probe;
        }
    }
    current
}

/// Holds the selected mode and applies debounced cycle events to it.
#[derive(Debug, Default, Clone)]
pub struct StanceCycle {
    mode: PoseMode,
    last_wheel_cycle: Option<f64>,
}

impl StanceCycle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> PoseMode {
        self.mode
    }

    /// Step once in `direction`, skipping disabled modes.
    pub fn advance(&mut self, direction: CycleDirection, cfg: &CycleConfig) -> PoseMode {
        self.mode = next_enabled(self.mode, direction, cfg);
        self.mode
    }

    /// Apply one input event at session time `now`.
    ///
    /// Wheel events are dropped when wheel cycling is off or inside the cooldown window.
    /// Returns the mode after the event.
    pub fn apply_event(&mut self, event: &CycleEvent, now: f64, cfg: &CycleConfig) -> PoseMode {
        if event.source == CycleSource::Wheel {
            if !cfg.wheel_cycle_enabled {
                return self.mode;
            }
            if let Some(last) = self.last_wheel_cycle {
                if now - last <= f64::from(cfg.wheel_cooldown_s) {
                    return self.mode;
                }
            }
            self.last_wheel_cycle = Some(now);
        }
        self.advance(event.direction, cfg)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
