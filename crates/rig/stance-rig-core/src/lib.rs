//! Stance Rig Core (engine-agnostic)
//!
//! Procedural first-person weapon posing: a cycle of user-defined stances,
//! an aim override, critically-damped transitions, a short weapon-scaled
//! "shoulder" overlay and a gate for the compact sprint pose.
//!
//! Hosts implement [`RigHost`] and [`PoseSink`], then call
//! [`FrameDriver::tick`] once per frame.

pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod inputs;
pub mod math;
pub mod outputs;
pub mod overlay;
pub mod pose;
pub mod smoothing;
pub mod sprint;
pub mod stance;

// Re-exports for consumers (adapters)
pub use config::{
    CameraConfig, CycleConfig, OverlayConfig, OverlayProfile, PoseConfig, PoseValues, RigConfig,
    SprintConfig, StancePose, TransitionConfig, HOST_DEFAULT_CAMERA_OFFSET,
};
pub use driver::FrameDriver;
pub use error::ConfigError;
pub use host::{
    HeldItem, HostSnapshot, LatestValues, PlayerSample, PoseOffset, PoseSink, RigHost,
    SessionToken, WeaponSample,
};
pub use inputs::{CycleEvent, CycleSource, Inputs};
pub use math::Vec3;
pub use outputs::{Outputs, RigEvent, SinkWrite};
pub use overlay::{weapon_factor, OverlayGenerator, OverlayPhase, OverlayTrigger};
pub use pose::{PoseResolver, PoseTable, TargetPose};
pub use smoothing::{smoothing_time_for_speed, SmoothingChannel, SmoothingEngine};
pub use sprint::{SprintGate, SprintGateState, COMPACT_WEAPON_SIZE, NEUTRAL_WEAPON_SIZE};
pub use stance::{next_enabled, CycleDirection, PoseMode, StanceCycle};
