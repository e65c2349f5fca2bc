use bevy::prelude::*;
use bevy_stance_rig::{
    pose_rotation, CycleStanceEvent, RigCameraTarget, RigDriver, RigEventMessage, RigHostState,
    RigPoseTarget, RigSinkState, StanceRigPlugin,
};
use stance_rig_core::{
    CycleDirection, HeldItem, HostSnapshot, PlayerSample, PoseMode, RigConfig, RigEvent,
    SessionToken, WeaponSample,
};

fn app_with(config: RigConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(StanceRigPlugin {
        config,
        fixed_dt: Some(1.0 / 60.0),
    });
    app
}

fn armed_host() -> HostSnapshot {
    HostSnapshot {
        session: Some(SessionToken(1)),
        player: Some(PlayerSample {
            aiming: false,
            sprinting: false,
            held: HeldItem::Firearm(WeaponSample::default()),
        }),
    }
}

fn spawn_targets(app: &mut App) -> (Entity, Entity) {
    let hands = app
        .world_mut()
        .spawn((RigPoseTarget, Transform::default(), GlobalTransform::default()))
        .id();
    let camera = app
        .world_mut()
        .spawn((RigCameraTarget, Transform::default(), GlobalTransform::default()))
        .id();
    (hands, camera)
}

#[test]
fn plugin_inserts_rig_resources() {
    let app = app_with(RigConfig::default());
    assert!(app.world().get_resource::<RigDriver>().is_some());
    assert!(app.world().get_resource::<RigHostState>().is_some());
    assert!(app.world().get_resource::<RigSinkState>().is_some());
}

/// it should leave transforms alone until the host reports a session and player
#[test]
fn no_session_means_no_writes() {
    let mut app = app_with(RigConfig::default());
    let (hands, _) = spawn_targets(&mut app);
    app.world_mut()
        .send_event(CycleStanceEvent::hotkey(CycleDirection::Forward));
    for _ in 0..5 {
        app.update();
    }
    let tf = app.world().get::<Transform>(hands).expect("Transform exists");
    assert_eq!(*tf, Transform::default());
    assert_eq!(app.world().resource::<RigDriver>().0.mode(), PoseMode::Default);
}

/// it should cycle into Stance1 and converge the tagged transforms onto its pose
#[test]
fn cycle_event_drives_transforms() {
    let mut app = app_with(RigConfig::default());
    let (hands, camera) = spawn_targets(&mut app);
    app.world_mut().resource_mut::<RigHostState>().0 = armed_host();

    app.world_mut()
        .send_event(CycleStanceEvent::hotkey(CycleDirection::Forward));
    app.update();

    let seen: Vec<RigEvent> = app
        .world()
        .resource::<Events<RigEventMessage>>()
        .iter_current_update_events()
        .map(|m| m.0.clone())
        .collect();
    assert!(seen.contains(&RigEvent::StanceChanged {
        from: PoseMode::Default,
        to: PoseMode::Stance1,
    }));

    for _ in 0..240 {
        app.update();
    }

    let driver = &app.world().resource::<RigDriver>().0;
    assert_eq!(driver.mode(), PoseMode::Stance1);
    let expected_pose = *driver.pose();
    assert_eq!(expected_pose.rotation, driver.config().poses.stance1.rotation);

    let tf = app.world().get::<Transform>(hands).expect("Transform exists");
    let expected_rot = pose_rotation(&expected_pose);
    assert!(tf.rotation.angle_between(expected_rot) < 1e-4);
    assert!((tf.translation - Vec3::new(0.0, 0.0, -0.15)).length() < 1e-5);

    let cam = app.world().get::<Transform>(camera).expect("Transform exists");
    assert!((cam.translation - Vec3::new(0.0, 0.02, 0.0)).length() < 1e-6);
}

/// it should pick up a config preset from the shared fixtures
#[test]
fn config_preset_from_fixtures() {
    let json = stance_test_fixtures::configs::json("stances_only").expect("load preset");
    let config = RigConfig::from_json_str(&json).expect("preset validates");
    let mut app = app_with(config);
    app.world_mut().resource_mut::<RigHostState>().0 = armed_host();

    for direction in [CycleDirection::Forward, CycleDirection::Forward, CycleDirection::Forward] {
        app.world_mut().send_event(CycleStanceEvent::hotkey(direction));
        app.update();
    }
    // Stance1 -> Stance2 -> Stance1; Default and Stance3 are out of the cycle.
    assert_eq!(app.world().resource::<RigDriver>().0.mode(), PoseMode::Stance1);
}

/// it should stage the compact weapon size while sprinting in Stance1
#[test]
fn sprint_pose_sets_weapon_size() {
    let mut app = app_with(RigConfig::default());
    app.world_mut().resource_mut::<RigHostState>().0 = armed_host();
    app.world_mut()
        .send_event(CycleStanceEvent::hotkey(CycleDirection::Forward));
    app.update();

    if let Some(player) = app.world_mut().resource_mut::<RigHostState>().0.player.as_mut() {
        player.sprinting = true;
    }
    app.update();
    assert_eq!(app.world().resource::<RigSinkState>().weapon_size, Some(2.0));
}
