//! Runs the scripted scenarios under `fixtures/scenarios` against the driver.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use stance_rig_core::{
    CycleEvent, FrameDriver, HeldItem, HostSnapshot, Inputs, LatestValues, PlayerSample, PoseMode,
    RigConfig, RigEvent, SessionToken, SinkWrite, Vec3,
};

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    description: String,
    dt: f32,
    steps: Vec<Step>,
}

/// Player fields are sticky: a step only lists what changes.
#[derive(Debug, Deserialize)]
struct Step {
    #[serde(default = "one")]
    ticks: usize,
    aiming: Option<bool>,
    sprinting: Option<bool>,
    held: Option<HeldItem>,
    #[serde(default)]
    cycle: Vec<CycleEvent>,
    #[serde(default)]
    expect: Expect,
}

fn one() -> usize {
    1
}

#[derive(Debug, Default, Deserialize)]
struct Expect {
    mode: Option<PoseMode>,
    sprint_active: Option<bool>,
    weapon_size: Option<f32>,
    weapon_size_written: Option<bool>,
    camera_offset: Option<Vec3>,
    pose_rotation: Option<Vec3>,
    pose_position: Option<Vec3>,
    #[serde(default)]
    events: Vec<String>,
}

fn event_name(event: &RigEvent) -> &'static str {
    match event {
        RigEvent::SessionReset => "SessionReset",
        RigEvent::StanceChanged { .. } => "StanceChanged",
        RigEvent::AimChanged { .. } => "AimChanged",
        RigEvent::SprintPoseChanged { .. } => "SprintPoseChanged",
        RigEvent::OverlayStarted { .. } => "OverlayStarted",
        RigEvent::OverlaySettled => "OverlaySettled",
        _ => "Other",
    }
}

fn run(name: &str) -> Result<()> {
    let (scenario, config): (Scenario, RigConfig) =
        stance_test_fixtures::scenarios::load_with_config(name)?;
    let mut driver = FrameDriver::new(config).context("scenario config validates")?;
    let mut sink = LatestValues::default();
    let mut host = HostSnapshot {
        session: Some(SessionToken(1)),
        player: Some(PlayerSample::default()),
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        let ctx = || format!("{name} step {index}: {}", scenario.description);
        let player = host.player.get_or_insert_with(PlayerSample::default);
        if let Some(aiming) = step.aiming {
            player.aiming = aiming;
        }
        if let Some(sprinting) = step.sprinting {
            player.sprinting = sprinting;
        }
        if let Some(held) = step.held {
            player.held = held;
        }

        let mut events = Vec::new();
        let mut size_written = false;
        for tick in 0..step.ticks {
            let inputs = if tick == 0 {
                Inputs {
                    cycle_events: step.cycle.clone(),
                }
            } else {
                Inputs::none()
            };
            let out = driver.tick(scenario.dt, &inputs, &host, &mut sink);
            events.extend(out.events.iter().map(event_name));
            size_written |= out
                .writes
                .iter()
                .any(|w| matches!(w, SinkWrite::WeaponSize(_)));
        }

        let e = &step.expect;
        if let Some(mode) = e.mode {
            ensure!(driver.mode() == mode, "{}: mode {:?}", ctx(), driver.mode());
        }
        if let Some(active) = e.sprint_active {
            ensure!(
                active == !matches!(driver.sprint_state(), stance_rig_core::SprintGateState::Inactive),
                "{}: sprint state {:?}",
                ctx(),
                driver.sprint_state()
            );
        }
        if let Some(size) = e.weapon_size {
            ensure!(sink.weapon_size == Some(size), "{}: weapon size {:?}", ctx(), sink.weapon_size);
        }
        if let Some(written) = e.weapon_size_written {
            ensure!(size_written == written, "{}: weapon size written = {size_written}", ctx());
        }
        if let Some(offset) = e.camera_offset {
            ensure!(sink.camera_offset == Some(offset), "{}: camera {:?}", ctx(), sink.camera_offset);
        }
        if let Some(rotation) = e.pose_rotation {
            ensure!(driver.pose().rotation == rotation, "{}: rotation {:?}", ctx(), driver.pose());
        }
        if let Some(position) = e.pose_position {
            ensure!(driver.pose().position == position, "{}: position {:?}", ctx(), driver.pose());
        }
        for wanted in &e.events {
            ensure!(
                events.iter().any(|seen| seen == wanted),
                "{}: expected event {wanted}, saw {events:?}",
                ctx()
            );
        }
        if let Some(pose) = sink.pose {
            ensure!(pose == *driver.pose(), "{}: sink lags driver", ctx());
        }
    }
    Ok(())
}

#[test]
fn sprint_aim() -> Result<()> {
    run("sprint_aim")
}

#[test]
fn heavy_weapon() -> Result<()> {
    run("heavy_weapon")
}

#[test]
fn stance_cycle() -> Result<()> {
    run("stance_cycle")
}

#[test]
fn wheel_cooldown() -> Result<()> {
    run("wheel_cooldown")
}

#[test]
fn holster() -> Result<()> {
    run("holster")
}

#[test]
fn every_manifest_scenario_runs() -> Result<()> {
    for name in stance_test_fixtures::scenarios::keys()? {
        run(&name).with_context(|| format!("scenario {name}"))?;
    }
    Ok(())
}
