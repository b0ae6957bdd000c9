use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtree_physics::SceneConfig;

// --- Helper for stepping a seeded scene ---
fn run_scene(num_bodies: usize, use_quadtree: bool) {
    let config = SceneConfig {
        num_objects: num_bodies,
        use_quadtree,
        seed: Some(1234),
        ..SceneConfig::default()
    };
    let mut world = config.build_world().expect("benchmark config is valid");

    let dt = 1.0 / 60.0;
    let steps = 30;
    for _ in 0..steps {
        world.step(black_box(dt));
    }
}

// Benchmark for index-accelerated detection and resolution
fn bench_indexed_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_step");

    for num_bodies in [10, 100, 500].iter() {
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(num_bodies),
            num_bodies,
            |b, &n| {
                b.iter(|| run_scene(black_box(n), true));
            },
        );
    }
    group.finish();
}

// Benchmark for the brute-force reference path
fn bench_brute_force_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("brute_force_step");

    for num_bodies in [10, 100, 500].iter() {
        group.bench_with_input(
            criterion::BenchmarkId::from_parameter(num_bodies),
            num_bodies,
            |b, &n| {
                b.iter(|| run_scene(black_box(n), false));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_indexed_step, bench_brute_force_step);
criterion_main!(benches);
