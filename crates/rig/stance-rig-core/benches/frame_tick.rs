use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stance_rig_core::{
    CycleDirection, CycleEvent, FrameDriver, HeldItem, HostSnapshot, Inputs, LatestValues,
    PlayerSample, RigConfig, SessionToken, WeaponSample,
};

fn host(aiming: bool, sprinting: bool) -> HostSnapshot {
    HostSnapshot {
        session: Some(SessionToken(1)),
        player: Some(PlayerSample {
            aiming,
            sprinting,
            held: HeldItem::Firearm(WeaponSample::default()),
        }),
    }
}

fn bench_frame_tick(c: &mut Criterion) {
    let config: RigConfig = stance_test_fixtures::configs::load("default").unwrap_or_default();
    let dt = 1.0 / 60.0;

    c.bench_function("frame_tick_steady", |b| {
        let mut driver = FrameDriver::new(config.clone()).expect("valid config");
        let mut sink = LatestValues::default();
        let h = host(false, false);
        let none = Inputs::none();
        b.iter(|| {
            driver.tick(black_box(dt), &none, &h, &mut sink);
        });
    });

    // Cycle stance and toggle aim/sprint so every component stays busy.
    c.bench_function("frame_tick_churn", |b| {
        let mut driver = FrameDriver::new(config.clone()).expect("valid config");
        let mut sink = LatestValues::default();
        let hosts = [host(false, false), host(false, true), host(true, false)];
        let cycle = Inputs::none().with_event(CycleEvent::hotkey(CycleDirection::Forward));
        let none = Inputs::none();
        let mut i = 0usize;
        b.iter(|| {
            i = i.wrapping_add(1);
            let inputs = if i % 30 == 0 { &cycle } else { &none };
            driver.tick(black_box(dt), inputs, &hosts[(i / 45) % hosts.len()], &mut sink);
        });
    });
}

criterion_group!(benches, bench_frame_tick);
criterion_main!(benches);
