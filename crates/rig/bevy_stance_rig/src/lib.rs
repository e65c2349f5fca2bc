//! Bevy integration for the stance rig.
//!
//! Game systems fill [`RigHostState`] and send [`CycleStanceEvent`]s; the
//! plugin ticks the core driver in `Update` and copies the result onto
//! entities tagged with [`RigPoseTarget`] / [`RigCameraTarget`].

use bevy::log::warn;
use bevy::prelude::*;
use stance_rig_core::{FrameDriver, RigConfig};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{RigCameraTarget, RigPoseTarget};
pub use resources::{
    CycleStanceEvent, PendingInputs, RigDriver, RigEventMessage, RigFixedDt, RigHostState,
    RigSinkState,
};
pub use systems::pose_rotation;

/// System sets for ordering game code around the rig.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum StanceRigSet {
    Compute,
    Apply,
}

#[derive(Default)]
pub struct StanceRigPlugin {
    pub config: RigConfig,
    /// Seconds per tick; `None` follows the frame delta.
    pub fixed_dt: Option<f32>,
}

impl StanceRigPlugin {
    pub fn with_config(config: RigConfig) -> Self {
        Self {
            config,
            fixed_dt: None,
        }
    }
}

impl Plugin for StanceRigPlugin {
    fn build(&self, app: &mut App) {
        let driver = FrameDriver::new(self.config.clone()).unwrap_or_else(|err| {
            warn!("invalid stance rig config ({err}); using defaults");
            FrameDriver::default()
        });

        app.insert_resource(RigDriver(driver))
            .insert_resource(RigHostState::default())
            .insert_resource(PendingInputs::default())
            .insert_resource(RigSinkState::default())
            .insert_resource(RigFixedDt(self.fixed_dt))
            .add_event::<CycleStanceEvent>()
            .add_event::<RigEventMessage>()
            .configure_sets(Update, (StanceRigSet::Compute, StanceRigSet::Apply).chain())
            .add_systems(
                Update,
                (
                    systems::collect_cycle_events_system,
                    systems::tick_rig_system,
                )
                    .chain()
                    .in_set(StanceRigSet::Compute),
            )
            .add_systems(
                Update,
                systems::apply_rig_outputs_system.in_set(StanceRigSet::Apply),
            );
    }
}
