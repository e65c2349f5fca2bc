use bevy::prelude::*;
use stance_rig_core::{
    CycleDirection, CycleSource, FrameDriver, HostSnapshot, Inputs, PoseOffset, PoseSink,
    RigEvent,
};

/// The core driver, owned by the ECS.
#[derive(Resource, Default)]
pub struct RigDriver(pub FrameDriver);

/// Host state gathered by game systems before the rig ticks.
///
/// Game code writes the session token and the player sample here each frame;
/// leaving `player` as `None` makes the rig hold its last output.
#[derive(Resource, Default, Debug, Clone)]
pub struct RigHostState(pub HostSnapshot);

/// Cycle requests collected since the last rig tick.
#[derive(Resource, Default, Debug)]
pub struct PendingInputs(pub Inputs);

/// Latest values written by the driver, staged for the apply system
/// (keeps ordering explicit: Compute -> Apply).
#[derive(Resource, Default, Debug, Clone)]
pub struct RigSinkState {
    pub pose: PoseOffset,
    pub weapon_size: Option<f32>,
    pub camera_offset: Option<stance_rig_core::Vec3>,
    pub pose_dirty: bool,
    pub camera_dirty: bool,
}

impl PoseSink for RigSinkState {
    fn write_pose(&mut self, offset: &PoseOffset) {
        self.pose = *offset;
        self.pose_dirty = true;
    }

    fn write_weapon_size(&mut self, size: f32) {
        self.weapon_size = Some(size);
    }

    fn write_camera_offset(&mut self, offset: stance_rig_core::Vec3) {
        self.camera_offset = Some(offset);
        self.camera_dirty = true;
    }
}

/// Fixed timestep (seconds per tick). `None` uses the frame's `Time` delta.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RigFixedDt(pub Option<f32>);

/// Request to step the stance cycle.
#[derive(Event, Debug, Clone, Copy)]
pub struct CycleStanceEvent {
    pub direction: CycleDirection,
    pub source: CycleSource,
}

impl CycleStanceEvent {
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

/// Core events re-sent into the ECS after each tick.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RigEventMessage(pub RigEvent);
