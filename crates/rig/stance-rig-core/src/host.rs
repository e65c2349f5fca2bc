//! Host-facing traits and per-tick samples.
//!
//! The core never inspects host objects directly. An adapter implements
//! [`RigHost`] to expose what it knows this tick and [`PoseSink`] to receive
//! results. Every read is optional: `None` means "not available right now"
//! and the driver holds its previous output.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Identity of the host world/scene. A different token means a new session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub u64);

/// Read-only weapon stats sampled from the host.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSample {
    pub weight_kg: f32,
    pub ergonomics: f32,
    /// Horizontal inventory footprint.
    pub length_slots: u32,
    /// Bullpup-style form factor; gets its own weight limit.
    pub compact: bool,
    /// Host handling scalar. Higher means the weapon comes up faster.
    pub aiming_speed: f32,
}

impl Default for WeaponSample {
    fn default() -> Self {
        Self {
            weight_kg: 3.5,
            ergonomics: 50.0,
            length_slots: 4,
            compact: false,
            aiming_speed: 1.0,
        }
    }
}

/// What the player has in their hands, as classified by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum HeldItem {
    #[default]
    Empty,
    Firearm(WeaponSample),
    Melee,
    Consumable,
    Throwable,
    Other,
}

impl HeldItem {
    #[inline]
    pub fn weapon(&self) -> Option<&WeaponSample> {
        match self {
            HeldItem::Firearm(w) => Some(w),
            _ => None,
        }
    }

    #[inline]
    pub fn is_firearm(&self) -> bool {
        matches!(self, HeldItem::Firearm(_))
    }
}

/// Player state sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSample {
    pub aiming: bool,
    pub sprinting: bool,
    pub held: HeldItem,
}

/// Read side of the host.
pub trait RigHost {
    fn session(&self) -> Option<SessionToken>;
    fn player(&self) -> Option<PlayerSample>;
}

/// Combined rig offset handed to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseOffset {
    pub position: Vec3,
    /// Degrees: pitch, yaw, roll.
    pub rotation: Vec3,
}

/// Write side of the host.
pub trait PoseSink {
    fn write_pose(&mut self, offset: &PoseOffset);
    /// Animator "weapon size" parameter used by the host's sprint animation.
    fn write_weapon_size(&mut self, size: f32);
    fn write_camera_offset(&mut self, offset: Vec3);
}

/// Snapshot-backed host, handy for adapters that gather state up front.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub session: Option<SessionToken>,
    pub player: Option<PlayerSample>,
}

impl RigHost for HostSnapshot {
    fn session(&self) -> Option<SessionToken> {
        self.session
    }

    fn player(&self) -> Option<PlayerSample> {
        self.player
    }
}

/// Sink that just remembers the latest values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LatestValues {
    pub pose: Option<PoseOffset>,
    pub weapon_size: Option<f32>,
    pub camera_offset: Option<Vec3>,
    pub pose_writes: usize,
}

impl PoseSink for LatestValues {
    fn write_pose(&mut self, offset: &PoseOffset) {
        self.pose = Some(*offset);
        self.pose_writes += 1;
    }

    fn write_weapon_size(&mut self, size: f32) {
        self.weapon_size = Some(size);
    }

    fn write_camera_offset(&mut self, offset: Vec3) {
        self.camera_offset = Some(offset);
    }
}
