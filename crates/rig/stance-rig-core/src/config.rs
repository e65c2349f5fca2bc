//! Rig configuration.
//!
//! Values are owned by the host's settings layer and handed to the
//! [`FrameDriver`](crate::driver::FrameDriver) as a whole. `validate()` is the
//! range check performed at that boundary; the per-tick pipeline trusts the
//! values it is given.
//!
//! Every section is `#[serde(default)]`, so a JSON file only needs the fields
//! it overrides. Defaults match the stock preset shipped to players.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Vec3;
use crate::stance::PoseMode;

/// Camera offset the host applies when no override is configured.
pub const HOST_DEFAULT_CAMERA_OFFSET: Vec3 = Vec3::splat(0.04);

/// Accepted range of every transition speed slider.
pub const SPEED_RANGE: (f32, f32) = (0.5, 20.0);
const OFFSET_RANGE: (f32, f32) = (-0.5, 0.5);
const ROTATION_RANGE: (f32, f32) = (-45.0, 45.0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub cycle: CycleConfig,
    pub poses: PoseConfig,
    pub transitions: TransitionConfig,
    pub overlay: OverlayConfig,
    pub sprint: SprintConfig,
    pub camera: CameraConfig,
    /// Largest step (seconds) integrated in one tick; longer stalls are clipped.
    pub max_dt: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            cycle: CycleConfig::default(),
            poses: PoseConfig::default(),
            transitions: TransitionConfig::default(),
            overlay: OverlayConfig::default(),
            sprint: SprintConfig::default(),
            camera: CameraConfig::default(),
            max_dt: 0.05,
        }
    }
}

/// Which modes take part in the cycle and how alternate input is throttled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// Skip `Default` while cycling.
    pub use_only_stances: bool,
    pub stance1_enabled: bool,
    pub stance2_enabled: bool,
    pub stance3_enabled: bool,
    /// Accept cycle events coming from the scroll wheel.
    pub wheel_cycle_enabled: bool,
    /// Minimum spacing between two wheel-driven cycles.
    pub wheel_cooldown_s: f32,
    /// Ignore all cycle events while the player is sprinting.
    pub block_while_sprinting: bool,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            use_only_stances: false,
            stance1_enabled: true,
            stance2_enabled: true,
            stance3_enabled: false,
            wheel_cycle_enabled: false,
            wheel_cooldown_s: 0.15,
            block_while_sprinting: true,
        }
    }
}

impl CycleConfig {
    /// Whether `mode` is part of the cycle.
    pub fn is_enabled(&self, mode: PoseMode) -> bool {
        match mode {
            PoseMode::Default => !self.use_only_stances,
            PoseMode::Stance1 => self.stance1_enabled,
            PoseMode::Stance2 => self.stance2_enabled,
            PoseMode::Stance3 => self.stance3_enabled,
        }
    }
}

/// A position/rotation pair as configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseValues {
    pub position: Vec3,
    /// Degrees: pitch, yaw, roll.
    pub rotation: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StancePose {
    pub position: Vec3,
    pub rotation: Vec3,
    /// Allow the compact sprint pose while in this stance.
    pub sprint_pose_enabled: bool,
}

impl Default for StancePose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            sprint_pose_enabled: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// While aiming, use `aim` regardless of the selected stance.
    pub reset_on_aim: bool,
    pub aim: PoseValues,
    /// Apply `default_position` while in `Default` mode.
    pub default_position_enabled: bool,
    pub default_position: Vec3,
    pub stance1: StancePose,
    pub stance2: StancePose,
    pub stance3: StancePose,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            reset_on_aim: true,
            aim: PoseValues::default(),
            default_position_enabled: false,
            default_position: Vec3::ZERO,
            stance1: StancePose {
                position: Vec3::new(0.0, 0.0, -0.15),
                rotation: Vec3::new(-15.0, -15.0, 0.0),
                sprint_pose_enabled: true,
            },
            stance2: StancePose {
                position: Vec3::ZERO,
                rotation: Vec3::new(0.0, -30.0, 0.0),
                sprint_pose_enabled: false,
            },
            stance3: StancePose {
                position: Vec3::new(0.04, 0.0, 0.03),
                rotation: Vec3::new(30.0, 0.0, 15.0),
                sprint_pose_enabled: false,
            },
        }
    }
}

impl PoseConfig {
    /// Stance section for a non-default mode.
    pub fn stance(&self, mode: PoseMode) -> Option<&StancePose> {
        match mode {
            PoseMode::Default => None,
            PoseMode::Stance1 => Some(&self.stance1),
            PoseMode::Stance2 => Some(&self.stance2),
            PoseMode::Stance3 => Some(&self.stance3),
        }
    }
}

/// User speed sliders. Converted to a smoothing time of `0.25 / speed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub stance_speed: f32,
    pub aim_speed: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            stance_speed: 2.0,
            aim_speed: 2.0,
        }
    }
}

/// Shape of one throw-and-settle motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayProfile {
    /// Length of the throw phase before the overlay target collapses to zero.
    pub duration_s: f32,
    /// Additive position while throwing (x sideways, y up, z forward).
    pub position: Vec3,
    /// Additive rotation while throwing, degrees.
    pub rotation: Vec3,
    /// Speed the overlay rotation channel moves toward the throw.
    pub throw_speed: f32,
    /// Speed the overlay rotation channel returns to rest.
    pub settle_speed: f32,
}

impl Default for OverlayProfile {
    fn default() -> Self {
        Self {
            duration_s: 0.18,
            position: Vec3::new(0.0, -0.012, -0.025),
            rotation: Vec3::new(3.0, -2.0, 6.0),
            throw_speed: 12.0,
            settle_speed: 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    pub aim: OverlayProfile,
    pub aim_intensity: f32,
    /// Also shoulder on stance changes made while not aiming.
    pub stance_enabled: bool,
    pub stance: OverlayProfile,
    pub stance_intensity: f32,
    /// How strongly weapon heft bends duration, magnitude and speed. 0 uses raw values.
    pub scaling_strength: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            aim: OverlayProfile::default(),
            aim_intensity: 1.0,
            stance_enabled: true,
            stance: OverlayProfile {
                duration_s: 0.14,
                position: Vec3::new(0.0, -0.008, -0.015),
                rotation: Vec3::new(2.0, -1.5, 4.0),
                throw_speed: 12.0,
                settle_speed: 5.0,
            },
            stance_intensity: 0.6,
            scaling_strength: 0.75,
        }
    }
}

/// Eligibility thresholds for the compact sprint pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintConfig {
    pub weight_limit_kg: f32,
    /// Limit used for compact (bullpup) weapons.
    pub compact_weight_limit_kg: f32,
    pub length_limit_slots: u32,
    /// Ergonomics must be strictly above this.
    pub min_ergonomics: f32,
    /// How long the pose lingers after sprinting stops. 0 disables the delay.
    pub disable_delay_s: f32,
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            weight_limit_kg: 5.1,
            compact_weight_limit_kg: 5.75,
            length_limit_slots: 6,
            min_ergonomics: 35.0,
            disable_delay_s: 0.35,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub enabled: bool,
    pub offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            offset: Vec3::new(0.0, 0.02, 0.0),
        }
    }
}

impl CameraConfig {
    /// Offset to hand to the host this tick.
    pub fn effective_offset(&self) -> Vec3 {
        if self.enabled {
            self.offset
        } else {
            HOST_DEFAULT_CAMERA_OFFSET
        }
    }
}

fn check(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_vec(field: &'static str, v: Vec3, range: (f32, f32)) -> Result<(), ConfigError> {
    check(field, v.x, range)?;
    check(field, v.y, range)?;
    check(field, v.z, range)
}

impl OverlayProfile {
    fn validate(&self, fields: [&'static str; 5]) -> Result<(), ConfigError> {
        let [duration, position, rotation, throw, settle] = fields;
        check(duration, self.duration_s, (0.0, 2.0))?;
        check_vec(position, self.position, OFFSET_RANGE)?;
        check_vec(rotation, self.rotation, ROTATION_RANGE)?;
        check(throw, self.throw_speed, SPEED_RANGE)?;
        check(settle, self.settle_speed, SPEED_RANGE)
    }
}

impl RigConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: RigConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Range-check every numeric field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check("cycle.wheel_cooldown_s", self.cycle.wheel_cooldown_s, (0.0, 2.0))?;

        let p = &self.poses;
        check_vec("poses.aim.position", p.aim.position, OFFSET_RANGE)?;
        check_vec("poses.aim.rotation", p.aim.rotation, ROTATION_RANGE)?;
        check_vec("poses.default_position", p.default_position, OFFSET_RANGE)?;
        check_vec("poses.stance1.position", p.stance1.position, OFFSET_RANGE)?;
        check_vec("poses.stance1.rotation", p.stance1.rotation, ROTATION_RANGE)?;
        check_vec("poses.stance2.position", p.stance2.position, OFFSET_RANGE)?;
        check_vec("poses.stance2.rotation", p.stance2.rotation, ROTATION_RANGE)?;
        check_vec("poses.stance3.position", p.stance3.position, OFFSET_RANGE)?;
        check_vec("poses.stance3.rotation", p.stance3.rotation, ROTATION_RANGE)?;

        check("transitions.stance_speed", self.transitions.stance_speed, SPEED_RANGE)?;
        check("transitions.aim_speed", self.transitions.aim_speed, SPEED_RANGE)?;

        let o = &self.overlay;
        o.aim.validate([
            "overlay.aim.duration_s",
            "overlay.aim.position",
            "overlay.aim.rotation",
            "overlay.aim.throw_speed",
            "overlay.aim.settle_speed",
        ])?;
        o.stance.validate([
            "overlay.stance.duration_s",
            "overlay.stance.position",
            "overlay.stance.rotation",
            "overlay.stance.throw_speed",
            "overlay.stance.settle_speed",
        ])?;
        check("overlay.aim_intensity", o.aim_intensity, (0.0, 3.0))?;
        check("overlay.stance_intensity", o.stance_intensity, (0.0, 3.0))?;
        check("overlay.scaling_strength", o.scaling_strength, (0.0, 1.0))?;

        let s = &self.sprint;
        check("sprint.weight_limit_kg", s.weight_limit_kg, (1.0, 15.0))?;
        check("sprint.compact_weight_limit_kg", s.compact_weight_limit_kg, (1.0, 15.0))?;
        check("sprint.length_limit_slots", s.length_limit_slots as f32, (1.0, 10.0))?;
        check("sprint.min_ergonomics", s.min_ergonomics, (0.0, 100.0))?;
        check("sprint.disable_delay_s", s.disable_delay_s, (0.0, 5.0))?;

        check_vec("camera.offset", self.camera.offset, OFFSET_RANGE)?;
        check("max_dt", self.max_dt, (0.001, 0.25))
    }
}
