//! Critically-damped smoothing for the rig's position and rotation channels.
//!
//! Every channel uses the same smooth-damp step: an exponential
//! approximation of a critically damped spring that stays stable for large
//! `dt` and never overshoots its target.

use crate::config::SPEED_RANGE;
use crate::math::Vec3;
use crate::pose::TargetPose;

/// Squared distance (deg²) below which an angular channel snaps onto its target.
pub const ANGULAR_SNAP_EPSILON_SQ: f32 = 1e-4;
/// Squared distance (m²) below which a linear channel snaps onto its target.
pub const LINEAR_SNAP_EPSILON_SQ: f32 = 1e-4;

/// Smoothing time reached at speed 1.0.
const BASE_SMOOTHING_TIME: f32 = 0.25;
/// Floor on smoothing time to keep `omega` finite.
const MIN_SMOOTHING_TIME: f32 = 1e-4;

/// Convert a user speed slider into a smoothing time (`0.25 / speed`).
///
/// The speed is clamped into the slider range first, so out-of-range or
/// non-finite values still produce a usable time.
pub fn smoothing_time_for_speed(speed: f32) -> f32 {
    let speed = if speed.is_finite() { speed } else { SPEED_RANGE.0 };
    BASE_SMOOTHING_TIME / speed.clamp(SPEED_RANGE.0, SPEED_RANGE.1)
}

/// One smoothed 3-vector with its own velocity.
///
/// A fresh (or reset) channel adopts its first target outright instead of
/// travelling from the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothingChannel {
    pub current: Vec3,
    pub velocity: Vec3,
    pub target: Vec3,
    initialized: bool,
    snap_epsilon_sq: f32,
}

impl SmoothingChannel {
    pub const fn new(snap_epsilon_sq: f32) -> Self {
        Self {
            current: Vec3::ZERO,
            velocity: Vec3::ZERO,
            target: Vec3::ZERO,
            initialized: false,
            snap_epsilon_sq,
        }
    }

    /// Channel in metres.
    pub const fn linear() -> Self {
        Self::new(LINEAR_SNAP_EPSILON_SQ)
    }

    /// Channel in degrees.
    pub const fn angular() -> Self {
        Self::new(ANGULAR_SNAP_EPSILON_SQ)
    }

    #[inline]
    pub fn snap_epsilon_sq(&self) -> f32 {
        self.snap_epsilon_sq
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Place the channel at rest on `value`.
    pub fn seed(&mut self, value: Vec3) {
        self.current = value;
        self.target = value;
        self.velocity = Vec3::ZERO;
        self.initialized = true;
    }

    /// Exactly on target with no residual motion.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target && self.velocity == Vec3::ZERO
    }

    /// Move toward `target` by one step of `dt` seconds.
    pub fn advance(&mut self, target: Vec3, smoothing_time: f32, dt: f32) -> Vec3 {
        if !self.initialized {
            self.seed(target);
            return target;
        }
        self.target = target;
        if dt <= 0.0 || !dt.is_finite() {
            return self.current;
        }

        let smoothing_time = smoothing_time.max(MIN_SMOOTHING_TIME);
        let omega = 2.0 / smoothing_time;
        let x = omega * dt;
        let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = self.current - target;
        let temp = (self.velocity + change * omega) * dt;
        self.velocity = (self.velocity - temp * omega) * exp;
        let mut out = target + (change + temp) * exp;

        // Passed the target this step.
        if (target - self.current).dot(out - target) > 0.0 {
            out = target;
            self.velocity = Vec3::ZERO;
        }

        if out.distance_squared(target) < self.snap_epsilon_sq {
            out = target;
            self.velocity = Vec3::ZERO;
        }

        self.current = out;
        out
    }

    /// Zero the velocity, keeping the current value.
    #[inline]
    pub fn reset_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Back to neutral; the next `advance` adopts its target.
    pub fn reset(&mut self) {
        *self = Self::new(self.snap_epsilon_sq);
    }
}

/// The three channels the rig composes into a pose offset.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingEngine {
    pub position: SmoothingChannel,
    pub rotation: SmoothingChannel,
    /// Additive rotation driven by the transient overlay.
    pub overlay_rotation: SmoothingChannel,
}

impl Default for SmoothingEngine {
    fn default() -> Self {
        Self {
            position: SmoothingChannel::linear(),
            rotation: SmoothingChannel::angular(),
            overlay_rotation: SmoothingChannel::angular(),
        }
    }
}

impl SmoothingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the base position and rotation channels at `speed`.
    pub fn advance_base(&mut self, target: &TargetPose, speed: f32, dt: f32) -> TargetPose {
        let time = smoothing_time_for_speed(speed);
        TargetPose {
            position: self.position.advance(target.position, time, dt),
            rotation: self.rotation.advance(target.rotation, time, dt),
        }
    }

    /// Advance the overlay rotation channel at `speed`.
    pub fn advance_overlay(&mut self, target: Vec3, speed: f32, dt: f32) -> Vec3 {
        self.overlay_rotation
            .advance(target, smoothing_time_for_speed(speed), dt)
    }

    /// Clear all velocities. Called on discrete state edges so a new
    /// transition starts from rest.
    pub fn reset_velocities(&mut self) {
        self.position.reset_velocity();
        self.rotation.reset_velocity();
        self.overlay_rotation.reset_velocity();
    }

    pub fn reset(&mut self) {
        self.position.reset();
        self.rotation.reset();
        self.overlay_rotation.reset();
    }

    /// Every channel rests exactly on its target.
    pub fn is_settled(&self) -> bool {
        self.position.is_settled()
            && self.rotation.is_settled()
            && self.overlay_rotation.is_settled()
    }
}
