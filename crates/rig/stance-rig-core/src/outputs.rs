//! Output contracts from the core driver.
//!
//! Outputs carry only the writes that changed this tick plus a separate list
//! of semantic events. Adapters either pass a [`PoseSink`] to
//! `FrameDriver::tick()` or replay `writes` themselves via [`Outputs::apply_to`].

use serde::{Deserialize, Serialize};

use crate::host::{PoseOffset, PoseSink};
use crate::math::Vec3;
use crate::overlay::OverlayTrigger;
use crate::stance::PoseMode;

/// One value handed to the host this tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SinkWrite {
    Pose(PoseOffset),
    WeaponSize(f32),
    CameraOffset(Vec3),
}

impl SinkWrite {
    pub fn apply_to(&self, sink: &mut dyn PoseSink) {
        match self {
            SinkWrite::Pose(offset) => sink.write_pose(offset),
            SinkWrite::WeaponSize(size) => sink.write_weapon_size(*size),
            SinkWrite::CameraOffset(offset) => sink.write_camera_offset(*offset),
        }
    }
}

/// Discrete signals emitted during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RigEvent {
    /// The host session changed and all state was cleared.
    SessionReset,
    StanceChanged {
        from: PoseMode,
        to: PoseMode,
    },
    AimChanged {
        aiming: bool,
    },
    SprintPoseChanged {
        active: bool,
        weapon_size: f32,
    },
    OverlayStarted {
        trigger: OverlayTrigger,
    },
    OverlaySettled,
}

/// Outputs returned by `FrameDriver::update()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub writes: Vec<SinkWrite>,
    #[serde(default)]
    pub events: Vec<RigEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.writes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_write(&mut self, write: SinkWrite) {
        self.writes.push(write);
    }

    #[inline]
    pub fn push_event(&mut self, event: RigEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }

    /// Replay this tick's writes into `sink` in order.
    pub fn apply_to(&self, sink: &mut dyn PoseSink) {
        for write in &self.writes {
            write.apply_to(sink);
        }
    }

    /// Last pose written this tick, if any.
    pub fn pose(&self) -> Option<&PoseOffset> {
        self.writes.iter().rev().find_map(|w| match w {
            SinkWrite::Pose(p) => Some(p),
            _ => None,
        })
    }

    pub fn weapon_size(&self) -> Option<f32> {
        self.writes.iter().rev().find_map(|w| match w {
            SinkWrite::WeaponSize(s) => Some(*s),
            _ => None,
        })
    }

    pub fn camera_offset(&self) -> Option<Vec3> {
        self.writes.iter().rev().find_map(|w| match w {
            SinkWrite::CameraOffset(c) => Some(*c),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LatestValues;

    #[test]
    fn apply_to_replays_in_order() {
        let mut out = Outputs::default();
        out.push_write(SinkWrite::WeaponSize(2.0));
        out.push_write(SinkWrite::Pose(PoseOffset {
            position: Vec3::new(0.0, 0.0, -0.1),
            rotation: Vec3::ZERO,
        }));
        out.push_write(SinkWrite::WeaponSize(4.0));

        let mut sink = LatestValues::default();
        out.apply_to(&mut sink);
        assert_eq!(sink.weapon_size, Some(4.0));
        assert_eq!(sink.pose_writes, 1);
        assert_eq!(out.weapon_size(), Some(4.0));
        assert!(out.camera_offset().is_none());
    }

    #[test]
    fn events_serialize_with_tags() {
        let ev = RigEvent::StanceChanged {
            from: PoseMode::Default,
            to: PoseMode::Stance1,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["StanceChanged"]["to"], "Stance1");
    }
}
