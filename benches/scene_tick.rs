use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use subway_scene::core::{DisplayContext, InputState};
use subway_scene::math::{CurveKind, TrackCurve};
use subway_scene::render::SceneRenderer;
use subway_scene::{AnimationDriver, SceneConfig, SceneGraphBuilder};

fn offline_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.map.image = Default::default();
    config
}

/// Benchmark: one driver tick over the default scene
fn bench_driver_tick(c: &mut Criterion) {
    let config = offline_config();
    let mut graph = SceneGraphBuilder::new(&config).build();
    let mut driver = AnimationDriver::new(&config);
    let input = InputState {
        pointer: Vec2::new(0.3, -0.2),
        ..Default::default()
    };

    let mut elapsed = 0.0;
    c.bench_function("driver_tick", |b| {
        b.iter(|| {
            elapsed += 1.0 / 60.0;
            black_box(driver.tick(&mut graph, &input, 1.0 / 60.0, elapsed))
        })
    });
}

/// Benchmark: arc-length curve sampling
fn bench_curve_sampling(c: &mut Criterion) {
    let config = offline_config();
    let mut group = c.benchmark_group("curve_point_at");

    for (name, kind) in [("catmull_rom", CurveKind::default()), ("centripetal", CurveKind::Centripetal)] {
        let curve = TrackCurve::new(config.track.control_points(), kind).unwrap();
        group.bench_with_input(BenchmarkId::new(name, 1000), &curve, |b, curve| {
            b.iter(|| {
                let mut sum = Vec2::ZERO;
                for i in 0..1000 {
                    let p = curve.point_at(i as f32 / 1000.0);
                    sum += Vec2::new(p.x, p.z);
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

/// Benchmark: full software render at common output sizes
fn bench_render(c: &mut Criterion) {
    let config = offline_config();
    let graph = SceneGraphBuilder::new(&config).build();
    let mut renderer = SceneRenderer::new();
    let mut group = c.benchmark_group("scene_render");
    group.sample_size(20);

    for (width, height) in [(640, 360), (1280, 720)] {
        let context = DisplayContext::new(width, height);
        group.bench_with_input(BenchmarkId::new("frame", format!("{width}x{height}")), &context, |b, context| {
            b.iter(|| black_box(renderer.render(&graph, context).pixels.len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_driver_tick, bench_curve_sampling, bench_render);

criterion_main!(benches);
