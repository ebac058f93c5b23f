use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use scene_gallery::animation::{ForceLink, ForceSimulation};
use scene_gallery::graph::{Geometry, Material, Node};
use scene_gallery::math::intersect_aabb;
use scene_gallery::overlay::project_to_screen;
use scene_gallery::picking::pick;
use scene_gallery::render::Preview;
use scene_gallery::{Stage, Viewport};

/// Grid of `side * side` unit cubes centred on the origin
fn cube_field(side: usize) -> Stage {
    let mut stage = Stage::new(Viewport::new(640, 480));
    let offset = side as f32 * 0.5;
    for x in 0..side {
        for z in 0..side {
            let at = Vec3::new(x as f32 * 1.5 - offset, 0.0, -(z as f32) * 1.5);
            let node = Node::mesh("cube", Geometry::cube(1.0), Material::default()).at(at);
            if stage.add(node).is_err() {
                break;
            }
        }
    }
    stage
}

/// Benchmark: slab test against a single box (hit case)
fn bench_aabb_intersection_hit(c: &mut Criterion) {
    let min = Vec3::new(-1.0, -1.0, -6.0);
    let max = Vec3::new(1.0, 1.0, -4.0);

    c.bench_function("aabb_intersection_hit", |b| {
        b.iter(|| {
            black_box(intersect_aabb(
                black_box(Vec3::ZERO),
                black_box(Vec3::NEG_Z),
                black_box(min),
                black_box(max),
            ))
        })
    });
}

/// Benchmark: projecting label anchors to the screen
fn bench_project_to_screen(c: &mut Criterion) {
    let stage = Stage::new(Viewport::new(1280, 720));
    let points: Vec<Vec3> = (0..1000)
        .map(|i| Vec3::new((i % 32) as f32 - 16.0, (i / 32) as f32 * 0.5, -(i as f32) * 0.01))
        .collect();

    c.bench_function("project_1000_labels", |b| {
        b.iter(|| {
            for point in &points {
                black_box(project_to_screen(*point, &stage.camera, stage.viewport));
            }
        })
    });
}

/// Benchmark: picking through growing cube fields
fn bench_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick");
    for side in [8, 16, 32] {
        let stage = cube_field(side);
        let center = stage.viewport.center();
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &stage, |b, stage| {
            b.iter(|| {
                black_box(pick(
                    &stage.graph,
                    &stage.camera,
                    stage.viewport,
                    center.x,
                    center.y,
                    |_, _| true,
                ))
            })
        });
    }
    group.finish();
}

/// Benchmark: CPU preview of a populated stage
fn bench_preview(c: &mut Criterion) {
    let stage = cube_field(16);
    let mut preview = Preview::new(stage.viewport);

    c.bench_function("preview_256_cubes", |b| {
        b.iter(|| {
            black_box(preview.render(&stage).len());
        })
    });
}

/// Benchmark: force layout ticks on a ring graph
fn bench_force_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_tick");
    for nodes in [50, 200] {
        let links: Vec<ForceLink> = (0..nodes)
            .map(|i| ForceLink { source: i, target: (i + 1) % nodes })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &links, |b, links| {
            let mut simulation = ForceSimulation::new(nodes, links.clone());
            b.iter(|| {
                simulation.reheat();
                black_box(simulation.tick())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_aabb_intersection_hit,
    bench_project_to_screen,
    bench_pick,
    bench_preview,
    bench_force_tick,
);

criterion_main!(benches);
