use glam::Vec2;
use subway_scene::config::{StationColor, StationConfig};
use subway_scene::core::InputState;
use subway_scene::{AnimationDriver, SceneConfig, SceneGraph, SceneGraphBuilder};

/// Flat four-point loop with stations on opposite sides
fn square_loop() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.map.image = Default::default();
    config.track.points = vec![
        [-100.0, 20.0, 0.0],
        [0.0, 20.0, -100.0],
        [100.0, 20.0, 0.0],
        [0.0, 20.0, 100.0],
    ];
    config.stations.0 = vec![
        StationConfig::new("NORTH", StationColor::Red, 0.25),
        StationConfig::new("SOUTH", StationColor::Blue, 0.75),
    ];
    config.train.speed = 0.5;
    config
}

fn setup(config: &SceneConfig) -> (SceneGraph, AnimationDriver) {
    (SceneGraphBuilder::new(config).build(), AnimationDriver::new(config))
}

#[test]
fn full_loop_arrives_once_per_station() {
    let config = square_loop();
    let (mut graph, mut driver) = setup(&config);
    let input = InputState::default();

    // 0.5 * 1/128 = 1/256 per tick, exact in binary
    let delta = 1.0 / 128.0;
    let start = graph.train().unwrap().progress;
    let mut arrivals = vec![0u32; 2];
    for n in 1..=256 {
        let report = driver.tick(&mut graph, &input, delta, n as f32 * delta);
        for index in report.arrivals {
            arrivals[index] += 1;
        }
    }

    assert_eq!(arrivals, vec![1, 1]);
    assert_eq!(graph.train().unwrap().progress, start);
}

#[test]
fn progress_stays_in_unit_interval() {
    let config = square_loop();
    let (mut graph, mut driver) = setup(&config);
    let input = InputState::default();

    let deltas = [0.016, 0.1, 0.033, 0.0, 0.25, 0.007];
    let mut elapsed = 0.0;
    for i in 0..2000 {
        let delta = deltas[i % deltas.len()];
        elapsed += delta;
        let report = driver.tick(&mut graph, &input, delta, elapsed);
        let progress = report.progress.unwrap();
        assert!((0.0..1.0).contains(&progress), "progress {progress} at tick {i}");
    }
}

#[test]
fn progress_tracks_speed_times_time() {
    let mut config = square_loop();
    config.train.speed = 0.025;
    let (mut graph, mut driver) = setup(&config);
    let input = InputState::default();

    let delta = 1.0 / 60.0;
    let ticks = 1000;
    for n in 1..=ticks {
        driver.tick(&mut graph, &input, delta, n as f32 * delta);
    }

    let expected = (ticks as f32 * 0.025 * delta).rem_euclid(1.0);
    let progress = graph.train().unwrap().progress;
    assert!((progress - expected).abs() < 1e-3, "{progress} vs {expected}");
}

#[test]
fn pulse_decays_between_arrivals() {
    let config = square_loop();
    let (mut graph, mut driver) = setup(&config);
    let input = InputState::default();

    let delta = 1.0 / 128.0;
    let mut previous = 0.0f32;
    let mut saw_pulse = false;
    for n in 1..=256 {
        let report = driver.tick(&mut graph, &input, delta, n as f32 * delta);
        let pulse = graph.station(0).unwrap().pulse;
        assert!((0.0..=1.0).contains(&pulse));
        if report.arrivals.contains(&0) {
            assert_eq!(pulse, 1.0);
            saw_pulse = true;
        } else {
            assert!(pulse <= previous, "pulse rose from {previous} to {pulse}");
        }
        previous = pulse;
    }
    assert!(saw_pulse);
}

#[test]
fn last_arrived_clears_after_delay() {
    let mut config = square_loop();
    config.arrival.clear_delay = 0.2;
    let (mut graph, mut driver) = setup(&config);
    let input = InputState::default();

    let delta = 1.0 / 128.0;
    let mut elapsed = 0.0;
    loop {
        elapsed += delta;
        if !driver.tick(&mut graph, &input, delta, elapsed).arrivals.is_empty() {
            break;
        }
        assert!(elapsed < 2.0, "no arrival within a loop");
    }
    assert_eq!(driver.last_arrived(), Some(0));

    // 0.4 s more covers a fifth of the loop, well short of the next station
    for _ in 0..4 {
        elapsed += 0.1;
        let report = driver.tick(&mut graph, &input, 0.1, elapsed);
        assert!(report.arrivals.is_empty());
    }
    assert_eq!(driver.last_arrived(), None);
}

#[test]
fn arrival_sparks_burst_from_station() {
    let config = square_loop();
    let (mut graph, mut driver) = setup(&config);
    let input = InputState::default();
    assert_eq!(graph.sparks().unwrap().alive().count(), 0);

    let delta = 1.0 / 128.0;
    for n in 1..=256 {
        let report = driver.tick(&mut graph, &input, delta, n as f32 * delta);
        if !report.arrivals.is_empty() {
            assert_eq!(graph.sparks().unwrap().alive().count(), config.arrival.burst_sparks);
            return;
        }
    }
    panic!("train never reached a station");
}

#[test]
fn camera_step_is_bounded() {
    let config = SceneConfig::default();
    let (mut graph, mut driver) = setup(&config);
    let input = InputState {
        pointer: Vec2::new(1.0, -1.0),
        ..Default::default()
    };

    for delta in [0.5, 0.1, 1.0 / 60.0, 2.0] {
        let before = graph.camera.position();
        driver.tick(&mut graph, &input, delta, 0.0);
        let target = graph.camera.target();
        let moved = graph.camera.position().distance(before);
        let remaining = target.distance(before);
        assert!(moved <= config.camera.max_step_fraction * remaining + 1e-4);
    }
}

#[test]
fn reduced_motion_slows_the_train() {
    let config = square_loop();
    let (mut graph, mut driver) = setup(&config);
    let input = InputState {
        reduced_motion: true,
        ..Default::default()
    };

    let expected = config.train.speed * config.motion.reduced_speed_scale;
    assert_eq!(driver.effective_speed(&input), expected);

    let report = driver.tick(&mut graph, &input, 0.1, 0.1);
    assert!((report.progress.unwrap() - expected * 0.1).abs() < 1e-6);
}

#[test]
fn missing_track_skips_dependent_updates() {
    let mut config = square_loop();
    config.track.points = vec![[0.0, 0.0, 0.0]];
    let (mut graph, mut driver) = setup(&config);
    assert!(graph.track.is_none());

    let input = InputState::default();
    for n in 1..=60 {
        let report = driver.tick(&mut graph, &input, 1.0 / 60.0, n as f32 / 60.0);
        assert!(report.arrivals.is_empty());
        assert!(report.progress.is_none());
    }
    assert_eq!(graph.train().unwrap().progress, 0.0);
    assert!(graph.stations().all(|s| s.pulse == 0.0));
    // Map float still runs
    assert_ne!(graph.map().unwrap().y, config.map.base_y);
}
