//! Transient "shoulder" overlay layered on top of the base pose.
//!
//! A throw pushes an additive offset in for a short, weapon-scaled window and
//! then lets the overlay rotation channel settle back to rest.

use serde::{Deserialize, Serialize};

use crate::config::{OverlayConfig, OverlayProfile};
use crate::host::WeaponSample;
use crate::math::Vec3;

/// Reference weapon the overlay profiles are tuned for.
const REFERENCE_WEIGHT_KG: f32 = 3.5;
const REFERENCE_ERGONOMICS: f32 = 50.0;
const HEFT_RANGE: (f32, f32) = (0.5, 2.0);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayTrigger {
    Aim,
    Stance,
}

/// Scaled parameters of a running throw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throw {
    pub trigger: OverlayTrigger,
    pub started_at: f64,
    pub duration_s: f32,
    pub position: Vec3,
    pub rotation: Vec3,
    pub throw_speed: f32,
    pub settle_speed: f32,
}

impl Throw {
    fn from_profile(
        trigger: OverlayTrigger,
        profile: &OverlayProfile,
        intensity: f32,
        factor: f32,
        now: f64,
    ) -> Self {
        let magnitude = intensity * factor;
        Self {
            trigger,
            started_at: now,
            duration_s: profile.duration_s * factor,
            position: profile.position * magnitude,
            rotation: profile.rotation * magnitude,
            throw_speed: profile.throw_speed / factor,
            settle_speed: profile.settle_speed / factor,
        }
    }

    fn finished(&self, now: f64, aiming: bool) -> bool {
        now - self.started_at >= f64::from(self.duration_s)
            || (self.trigger == OverlayTrigger::Aim && !aiming)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OverlayPhase {
    #[default]
    Inactive,
    Throwing(Throw),
    /// Overlay target is zero; waiting for the channel to come to rest.
    Settling { settle_speed: f32 },
}

/// What the overlay contributes this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlaySample {
    /// Added to the base position target.
    pub position: Vec3,
    /// Target for the overlay rotation channel.
    pub rotation_target: Vec3,
    /// Speed for the overlay rotation channel.
    pub speed: f32,
}

/// Heft-based scale applied to duration, magnitude and (inverted) speed.
///
/// Returns 1.0 when no weapon is held or `strength` is zero.
pub fn weapon_factor(weapon: Option<&WeaponSample>, strength: f32) -> f32 {
    let Some(w) = weapon else {
        return 1.0;
    };
    let heft = (w.weight_kg / REFERENCE_WEIGHT_KG)
        * (REFERENCE_ERGONOMICS / w.ergonomics.max(1.0)).sqrt()
        / w.aiming_speed.max(0.1);
    let heft = if heft.is_finite() {
        heft.clamp(HEFT_RANGE.0, HEFT_RANGE.1)
    } else {
        1.0
    };
    1.0 + (heft - 1.0) * strength.clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct OverlayGenerator {
    phase: OverlayPhase,
    rest_speed: f32,
}

impl Default for OverlayGenerator {
    fn default() -> Self {
        Self {
            phase: OverlayPhase::Inactive,
            rest_speed: OverlayProfile::default().settle_speed,
        }
    }
}

impl OverlayGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> &OverlayPhase {
        &self.phase
    }

    #[inline]
    pub fn is_throwing(&self) -> bool {
        matches!(self.phase, OverlayPhase::Throwing(_))
    }

    /// Pick a trigger from this tick's edges. The aim edge wins over a stance edge.
    pub fn trigger_for(
        cfg: &OverlayConfig,
        aim_rising: bool,
        mode_changed: bool,
        aiming: bool,
        holding_firearm: bool,
    ) -> Option<OverlayTrigger> {
        if !cfg.enabled || !holding_firearm {
            return None;
        }
        if aim_rising {
            Some(OverlayTrigger::Aim)
        } else if mode_changed && !aiming && cfg.stance_enabled {
            Some(OverlayTrigger::Stance)
        } else {
            None
        }
    }

    /// Start a throw, replacing any running one.
    pub fn start(
        &mut self,
        trigger: OverlayTrigger,
        cfg: &OverlayConfig,
        weapon: Option<&WeaponSample>,
        now: f64,
    ) {
        let factor = weapon_factor(weapon, cfg.scaling_strength);
        let (profile, intensity) = match trigger {
            OverlayTrigger::Aim => (&cfg.aim, cfg.aim_intensity),
            OverlayTrigger::Stance => (&cfg.stance, cfg.stance_intensity),
        };
        self.phase = OverlayPhase::Throwing(Throw::from_profile(
            trigger, profile, intensity, factor, now,
        ));
    }

    /// Contribution for this tick. Ends the throw phase when it has run out.
    pub fn sample(&mut self, now: f64, aiming: bool) -> OverlaySample {
        if let OverlayPhase::Throwing(throw) = self.phase {
            if throw.finished(now, aiming) {
                self.rest_speed = throw.settle_speed;
                self.phase = OverlayPhase::Settling {
                    settle_speed: throw.settle_speed,
                };
            } else {
                return OverlaySample {
                    position: throw.position,
                    rotation_target: throw.rotation,
                    speed: throw.throw_speed,
                };
            }
        }
        OverlaySample {
            position: Vec3::ZERO,
            rotation_target: Vec3::ZERO,
            speed: self.rest_speed,
        }
    }

    /// Leave `Settling` once the overlay channel is at rest. Returns true on that edge.
    pub fn finish_settle(&mut self, channel_at_rest: bool) -> bool {
        if channel_at_rest && matches!(self.phase, OverlayPhase::Settling { .. }) {
            self.phase = OverlayPhase::Inactive;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(weight_kg: f32, ergonomics: f32) -> WeaponSample {
        WeaponSample {
            weight_kg,
            ergonomics,
            ..WeaponSample::default()
        }
    }

    #[test]
    fn reference_weapon_is_neutral() {
        let w = weapon(3.5, 50.0);
        assert!((weapon_factor(Some(&w), 1.0) - 1.0).abs() < 1e-6);
        assert_eq!(weapon_factor(None, 1.0), 1.0);
    }

    #[test]
    fn heft_is_clamped_and_blended() {
        let heavy = weapon(14.0, 10.0);
        assert!((weapon_factor(Some(&heavy), 1.0) - 2.0).abs() < 1e-6);
        assert!((weapon_factor(Some(&heavy), 0.5) - 1.5).abs() < 1e-6);
        assert_eq!(weapon_factor(Some(&heavy), 0.0), 1.0);

        let feather = weapon(0.5, 100.0);
        assert!((weapon_factor(Some(&feather), 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn aim_edge_wins_over_stance_edge() {
        let cfg = OverlayConfig::default();
        assert_eq!(
            OverlayGenerator::trigger_for(&cfg, true, true, true, true),
            Some(OverlayTrigger::Aim)
        );
        assert_eq!(
            OverlayGenerator::trigger_for(&cfg, false, true, false, true),
            Some(OverlayTrigger::Stance)
        );
        assert_eq!(OverlayGenerator::trigger_for(&cfg, false, true, true, true), None);
        assert_eq!(OverlayGenerator::trigger_for(&cfg, true, false, true, false), None);

        let off = OverlayConfig {
            enabled: false,
            ..OverlayConfig::default()
        };
        assert_eq!(OverlayGenerator::trigger_for(&off, true, false, true, true), None);
    }

    #[test]
    fn throw_runs_for_duration_then_settles() {
        let cfg = OverlayConfig {
            scaling_strength: 0.0,
            ..OverlayConfig::default()
        };
        let mut generator = OverlayGenerator::new();
        generator.start(OverlayTrigger::Stance, &cfg, None, 1.0);

        let s = generator.sample(1.05, false);
        assert_eq!(s.position, cfg.stance.position * cfg.stance_intensity);
        assert_eq!(s.speed, cfg.stance.throw_speed);

        let s = generator.sample(1.2, false);
        assert_eq!(s.rotation_target, Vec3::ZERO);
        assert_eq!(s.speed, cfg.stance.settle_speed);
        assert!(matches!(generator.phase(), OverlayPhase::Settling { .. }));

        assert!(!generator.finish_settle(false));
        assert!(generator.finish_settle(true));
        assert_eq!(*generator.phase(), OverlayPhase::Inactive);
    }

    #[test]
    fn aim_throw_ends_when_aim_released() {
        let cfg = OverlayConfig::default();
        let mut generator = OverlayGenerator::new();
        generator.start(OverlayTrigger::Aim, &cfg, None, 0.0);
        assert!(generator.sample(0.01, true).rotation_target != Vec3::ZERO);
        assert_eq!(generator.sample(0.02, false).rotation_target, Vec3::ZERO);
        assert!(!generator.is_throwing());
    }

    #[test]
    fn heavier_weapon_throws_longer_and_slower() {
        let cfg = OverlayConfig::default();
        let heavy = weapon(7.0, 50.0);
        let mut generator = OverlayGenerator::new();
        generator.start(OverlayTrigger::Aim, &cfg, Some(&heavy), 0.0);
        let OverlayPhase::Throwing(throw) = *generator.phase() else {
            panic!("expected a running throw");
        };
        assert!(throw.duration_s > cfg.aim.duration_s);
        assert!(throw.throw_speed < cfg.aim.throw_speed);
        assert!(throw.rotation.z > cfg.aim.rotation.z);
    }
}
