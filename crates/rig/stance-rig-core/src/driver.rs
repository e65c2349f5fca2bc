//! Per-tick orchestration of the rig.
//!
//! `FrameDriver` owns every stateful component and runs them in a fixed
//! order once per host tick: session check, player sample, clock, stance
//! events, sprint gate, target resolution, overlay, smoothing, composition
//! and finally the deduplicated writes.

use log::{debug, info, trace};

use crate::config::RigConfig;
use crate::error::ConfigError;
use crate::host::{PlayerSample, PoseOffset, PoseSink, RigHost, SessionToken};
use crate::inputs::Inputs;
use crate::math::Vec3;
use crate::outputs::{Outputs, RigEvent, SinkWrite};
use crate::overlay::{OverlayGenerator, OverlayPhase};
use crate::pose::{PoseResolver, TargetPose};
use crate::smoothing::SmoothingEngine;
use crate::sprint::{SprintContext, SprintGate, SprintGateState};
use crate::stance::{PoseMode, StanceCycle};

/// Discrete state seen on the previous processed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeMemory {
    mode: PoseMode,
    aiming: bool,
    holding_firearm: bool,
}

/// Last values handed to the host, used to skip redundant writes.
#[derive(Clone, Copy, Debug, Default)]
struct WriteCache {
    pose: Option<PoseOffset>,
    camera_offset: Option<Vec3>,
}

#[derive(Debug)]
pub struct FrameDriver {
    config: RigConfig,
    stance: StanceCycle,
    resolver: PoseResolver,
    smoothing: SmoothingEngine,
    overlay: OverlayGenerator,
    sprint: SprintGate,
    session: Option<SessionToken>,
    clock: f64,
    /// `None` until the first tick of a session has been processed.
    edges: Option<EdgeMemory>,
    cache: WriteCache,
    pose: PoseOffset,
    outputs: Outputs,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::from_parts(RigConfig::default())
    }
}

impl FrameDriver {
    /// Build a driver after range-checking `config`.
    pub fn new(config: RigConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: RigConfig) -> Self {
        Self {
            config,
            stance: StanceCycle::new(),
            resolver: PoseResolver::new(),
            smoothing: SmoothingEngine::new(),
            overlay: OverlayGenerator::new(),
            sprint: SprintGate::new(),
            session: None,
            clock: 0.0,
            edges: None,
            cache: WriteCache::default(),
            pose: PoseOffset::default(),
            outputs: Outputs::default(),
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn mode(&self) -> PoseMode {
        self.stance.mode()
    }

    pub fn session(&self) -> Option<SessionToken> {
        self.session
    }

    /// Seconds accumulated in the current session.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn sprint_state(&self) -> SprintGateState {
        self.sprint.state()
    }

    pub fn overlay_phase(&self) -> &OverlayPhase {
        self.overlay.phase()
    }

    pub fn smoothing(&self) -> &SmoothingEngine {
        &self.smoothing
    }

    /// Composed pose from the last processed tick.
    pub fn pose(&self) -> &PoseOffset {
        &self.pose
    }

    /// Outputs of the last tick.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    // --- Configuration ---

    /// Replace the whole configuration.
    pub fn set_config(&mut self, config: RigConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.resolver.mark_dirty();
        debug!("rig config replaced");
        Ok(())
    }

    /// Edit the configuration in place. The edit is discarded if it fails validation.
    pub fn update_config<F>(&mut self, edit: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut RigConfig),
    {
        let mut next = self.config.clone();
        edit(&mut next);
        self.set_config(next)
    }

    // --- Ticking ---

    /// Run one tick and push its writes into `sink`.
    pub fn tick(
        &mut self,
        dt: f32,
        inputs: &Inputs,
        host: &dyn RigHost,
        sink: &mut dyn PoseSink,
    ) -> &Outputs {
        self.step(dt, inputs, host);
        self.outputs.apply_to(sink);
        &self.outputs
    }

    /// Run one tick without a sink; the caller applies `Outputs::writes`.
    pub fn update(&mut self, dt: f32, inputs: &Inputs, host: &dyn RigHost) -> &Outputs {
        self.step(dt, inputs, host);
        &self.outputs
    }

    fn step(&mut self, dt: f32, inputs: &Inputs, host: &dyn RigHost) {
        self.outputs.clear();

        let Some(token) = host.session() else {
            return;
        };
        if self.session != Some(token) {
            self.begin_session(token);
        }

        let Some(player) = host.player() else {
            return;
        };

        let dt = sanitize_dt(dt, self.config.max_dt);
        self.clock += f64::from(dt);

        let mode_before = self.stance.mode();
        self.apply_cycle_events(inputs, &player);
        let mode = self.stance.mode();
        let holding_firearm = player.held.is_firearm();

        // The first tick of a session is its own baseline; channels adopt its target.
        let prev = self.edges.unwrap_or(EdgeMemory {
            mode,
            aiming: player.aiming,
            holding_firearm,
        });
        let mode_changed = mode != prev.mode;
        let aim_changed = player.aiming != prev.aiming;
        let aim_rising = aim_changed && player.aiming;
        if mode != mode_before {
            debug!("stance {:?} -> {:?}", mode_before, mode);
            self.outputs.push_event(RigEvent::StanceChanged {
                from: mode_before,
                to: mode,
            });
        }
        if aim_changed {
            self.outputs.push_event(RigEvent::AimChanged {
                aiming: player.aiming,
            });
        }

        self.update_sprint(&player, mode, dt);

        let target = if holding_firearm {
            self.resolver.resolve(&self.config.poses, mode, player.aiming)
        } else {
            TargetPose::ZERO
        };

        if let Some(trigger) = OverlayGenerator::trigger_for(
            &self.config.overlay,
            aim_rising,
            mode_changed,
            player.aiming,
            holding_firearm,
        ) {
            self.overlay
                .start(trigger, &self.config.overlay, player.held.weapon(), self.clock);
            debug!("overlay started by {:?}", trigger);
            self.outputs.push_event(RigEvent::OverlayStarted { trigger });
        }

        if mode_changed || aim_changed || holding_firearm != prev.holding_firearm {
            self.smoothing.reset_velocities();
        }

        let overlay = self.overlay.sample(self.clock, player.aiming);
        let base_target = TargetPose {
            position: target.position + overlay.position,
            rotation: target.rotation,
        };
        let speed = if self.resolver.table(&self.config.poses).aim_overrides(player.aiming) {
            self.config.transitions.aim_speed
        } else {
            self.config.transitions.stance_speed
        };
        let base = self.smoothing.advance_base(&base_target, speed, dt);
        let overlay_rotation =
            self.smoothing
                .advance_overlay(overlay.rotation_target, overlay.speed, dt);

        let at_rest = self.smoothing.overlay_rotation.is_settled()
            && overlay.rotation_target == Vec3::ZERO;
        if self.overlay.finish_settle(at_rest) {
            self.outputs.push_event(RigEvent::OverlaySettled);
        }

        self.pose = PoseOffset {
            position: base.position,
            rotation: base.rotation + overlay_rotation,
        };
        self.emit_writes();

        self.edges = Some(EdgeMemory {
            mode,
            aiming: player.aiming,
            holding_firearm,
        });
    }

    fn begin_session(&mut self, token: SessionToken) {
        info!("rig session {:?} started; state reset", token.0);
        self.stance.reset();
        self.smoothing.reset();
        self.overlay.reset();
        self.sprint.reset();
        self.edges = None;
        self.cache = WriteCache::default();
        self.pose = PoseOffset::default();
        self.clock = 0.0;
        self.session = Some(token);
        self.outputs.push_event(RigEvent::SessionReset);
    }

    fn apply_cycle_events(&mut self, inputs: &Inputs, player: &PlayerSample) {
        if inputs.is_empty() {
            return;
        }
        if player.sprinting && self.config.cycle.block_while_sprinting {
            trace!("{} cycle events ignored while sprinting", inputs.cycle_events.len());
            return;
        }
        for event in &inputs.cycle_events {
            self.stance.apply_event(event, self.clock, &self.config.cycle);
        }
    }

    fn update_sprint(&mut self, player: &PlayerSample, mode: PoseMode, dt: f32) {
        let ctx = SprintContext {
            mode,
            aiming: player.aiming,
            sprinting: player.sprinting,
            held: &player.held,
        };
        if let Some(size) = self
            .sprint
            .update(&ctx, &self.config.poses, &self.config.sprint, dt)
        {
            let active = self.sprint.is_active();
            debug!("sprint pose {} (weapon size {size})", if active { "on" } else { "off" });
            self.outputs.push_write(SinkWrite::WeaponSize(size));
            self.outputs.push_event(RigEvent::SprintPoseChanged {
                active,
                weapon_size: size,
            });
        }
    }

    fn emit_writes(&mut self) {
        if self.cache.pose != Some(self.pose) {
            trace!("pose {:?}", self.pose);
            self.cache.pose = Some(self.pose);
            self.outputs.push_write(SinkWrite::Pose(self.pose));
        }
        let camera = self.config.camera.effective_offset();
        if self.cache.camera_offset != Some(camera) {
            self.cache.camera_offset = Some(camera);
            self.outputs.push_write(SinkWrite::CameraOffset(camera));
        }
    }
}

/// Non-finite or negative steps become zero; long stalls are clipped to `max_dt`.
fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(max_dt)
    } else {
        0.0
    }
}
