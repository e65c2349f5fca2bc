//! Input contracts for the core driver.
//!
//! Adapters translate their own input layer into these already-debounced
//! events and pass them into `FrameDriver::tick()` once per tick.

use serde::{Deserialize, Serialize};

use crate::stance::CycleDirection;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Inputs {
    /// Cycle requests in the order they were received this tick.
    #[serde(default)]
    pub cycle_events: Vec<CycleEvent>,
}

impl Inputs {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: CycleEvent) -> Self {
        self.cycle_events.push(event);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cycle_events.is_empty()
    }
}

/// Where a cycle request came from. Wheel input is throttled; hotkeys are not.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleSource {
    Hotkey,
    Wheel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEvent {
    pub direction: CycleDirection,
    pub source: CycleSource,
}

impl CycleEvent {
    pub fn hotkey(direction: CycleDirection) -> Self {
        Self {
            direction,
            source: CycleSource::Hotkey,
        }
    }

    pub fn wheel(direction: CycleDirection) -> Self {
        Self {
            direction,
            source: CycleSource::Wheel,
        }
    }
}
