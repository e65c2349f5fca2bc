use bevy::log::{debug, trace};
use bevy::prelude::*;
use stance_rig_core::{CycleEvent, Inputs, PoseOffset};

use crate::components::{RigCameraTarget, RigPoseTarget};
use crate::resources::{
    CycleStanceEvent, PendingInputs, RigDriver, RigEventMessage, RigFixedDt, RigHostState,
    RigSinkState,
};

fn to_bevy(v: stance_rig_core::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Rig rotation is pitch/yaw/roll in degrees.
pub fn pose_rotation(pose: &PoseOffset) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        pose.rotation.x.to_radians(),
        pose.rotation.y.to_radians(),
        pose.rotation.z.to_radians(),
    )
}

/// Gather cycle requests into the pending input batch, preserving order.
pub fn collect_cycle_events_system(
    mut events: EventReader<CycleStanceEvent>,
    mut pending: ResMut<PendingInputs>,
) {
    for e in events.read() {
        pending.0.cycle_events.push(CycleEvent {
            direction: e.direction,
            source: e.source,
        });
    }
}

/// Compute: advance the driver and stage writes into `RigSinkState`.
pub fn tick_rig_system(
    mut driver: ResMut<RigDriver>,
    host: Res<RigHostState>,
    mut pending: ResMut<PendingInputs>,
    mut sink: ResMut<RigSinkState>,
    fixed: Res<RigFixedDt>,
    time: Res<Time>,
    mut out_events: EventWriter<RigEventMessage>,
) {
    let dt = fixed.0.unwrap_or_else(|| time.delta_seconds());
    let inputs = std::mem::replace(&mut pending.0, Inputs::none());
    let outputs = driver.0.tick(dt, &inputs, &host.0, &mut *sink);
    for event in &outputs.events {
        debug!("rig event {:?}", event);
        out_events.send(RigEventMessage(event.clone()));
    }
}

/// Apply: copy staged values onto marked transforms.
pub fn apply_rig_outputs_system(
    mut sink: ResMut<RigSinkState>,
    mut poses: Query<&mut Transform, (With<RigPoseTarget>, Without<RigCameraTarget>)>,
    mut cameras: Query<&mut Transform, (With<RigCameraTarget>, Without<RigPoseTarget>)>,
) {
    if sink.pose_dirty {
        let translation = to_bevy(sink.pose.position);
        let rotation = pose_rotation(&sink.pose);
        for mut tf in poses.iter_mut() {
            tf.translation = translation;
            tf.rotation = rotation;
        }
        trace!("applied rig pose {:?}", sink.pose);
        sink.pose_dirty = false;
    }
    if sink.camera_dirty {
        if let Some(offset) = sink.camera_offset {
            let translation = to_bevy(offset);
            for mut tf in cameras.iter_mut() {
                tf.translation = translation;
            }
        }
        sink.camera_dirty = false;
    }
}
