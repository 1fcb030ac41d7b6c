use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use travelmap_core::coordinates::Coordinate;
use travelmap_core::journey_manager::JourneyManager;
use travelmap_core::renderer::{JourneyRenderer, PixmapSurface};

fn journeys_with_points(count: usize, points: usize) -> JourneyManager {
    let mut rng = StdRng::seed_from_u64(1);
    let mut manager = JourneyManager::new();
    for _ in 0..count {
        manager.create_journey_with_rng(&mut rng);
        for _ in 0..points {
            manager.add_to_current(Coordinate::new(
                rng.random_range(0.0..1024.0),
                rng.random_range(0.0..768.0),
            ));
        }
    }
    manager
}

fn overlay_redraw_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay_redraw");
    group.sample_size(10); // full redraws of a supersampled overlay are slow

    let manager = journeys_with_points(7, 50);
    let renderer = JourneyRenderer::default();

    for supersample in [1u32, 2, 4] {
        let mut surface = PixmapSurface::new(1024, 768, supersample).unwrap();
        group.bench_with_input(
            BenchmarkId::new("render", format!("ss{}", supersample)),
            &supersample,
            |b, _| {
                b.iter(|| {
                    renderer.render(manager.journeys(), &mut surface);
                    std::hint::black_box(surface.pixmap().data().len());
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, overlay_redraw_benchmarks);
criterion_main!(benches);
