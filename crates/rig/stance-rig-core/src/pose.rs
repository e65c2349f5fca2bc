//! Steady-state target poses per (mode, aim) and their cached table.

use serde::{Deserialize, Serialize};

use crate::config::PoseConfig;
use crate::math::Vec3;
use crate::stance::PoseMode;

/// Position/rotation the rig converges to for one (mode, aim) combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetPose {
    pub position: Vec3,
    /// Degrees: pitch, yaw, roll.
    pub rotation: Vec3,
}

impl TargetPose {
    pub const ZERO: TargetPose = TargetPose {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
    };

    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }
}

/// Poses built once from a [`PoseConfig`] snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseTable {
    reset_on_aim: bool,
    aim: TargetPose,
    /// Indexed by mode: Default, Stance1, Stance2, Stance3.
    modes: [TargetPose; 4],
}

impl PoseTable {
    pub fn build(cfg: &PoseConfig) -> Self {
        let default_position = if cfg.default_position_enabled {
            cfg.default_position
        } else {
            Vec3::ZERO
        };
        Self {
            reset_on_aim: cfg.reset_on_aim,
            aim: TargetPose::new(cfg.aim.position, cfg.aim.rotation),
            modes: [
                TargetPose::new(default_position, Vec3::ZERO),
                TargetPose::new(cfg.stance1.position, cfg.stance1.rotation),
                TargetPose::new(cfg.stance2.position, cfg.stance2.rotation),
                TargetPose::new(cfg.stance3.position, cfg.stance3.rotation),
            ],
        }
    }

    /// Pose for `mode`, replaced by the aim pose while aiming with reset-on-aim.
    pub fn resolve(&self, mode: PoseMode, aiming: bool) -> TargetPose {
        if aiming && self.reset_on_aim {
            return self.aim;
        }
        self.modes[mode_index(mode)]
    }

    /// Whether aiming currently overrides the stance pose.
    #[inline]
    pub fn aim_overrides(&self, aiming: bool) -> bool {
        aiming && self.reset_on_aim
    }
}

#[inline]
fn mode_index(mode: PoseMode) -> usize {
    match mode {
        PoseMode::Default => 0,
        PoseMode::Stance1 => 1,
        PoseMode::Stance2 => 2,
        PoseMode::Stance3 => 3,
    }
}

/// Lazily rebuilds the [`PoseTable`] when configuration is marked dirty.
#[derive(Debug, Default)]
pub struct PoseResolver {
    table: Option<PoseTable>,
    rebuilds: u64,
}

impl PoseResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached table; the next access rebuilds it.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.table = None;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.table.is_none()
    }

    /// Cached table, rebuilt first if dirty.
    pub fn table(&mut self, cfg: &PoseConfig) -> &PoseTable {
        if self.table.is_none() {
            self.rebuilds += 1;
        }
        self.table.get_or_insert_with(|| PoseTable::build(cfg))
    }

    pub fn resolve(&mut self, cfg: &PoseConfig, mode: PoseMode, aiming: bool) -> TargetPose {
        self.table(cfg).resolve(mode, aiming)
    }

    /// Number of rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}
