//! Compare single-thread vs all-core matchup projection.
//!
//! Run with: `cargo bench --bench series_projection`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use buzzer::data::catalog::PlayerCatalog;
use buzzer::data::roster::Matchup;
use buzzer::parallel::WorkerPool;
use buzzer::projection::project_matchup;
use buzzer::sim::rng::Rng;

fn bench_projection_sequential_vs_parallel(c: &mut Criterion) {
    let catalog = PlayerCatalog::builtin();
    let teams = Matchup::random(&catalog, &mut Rng::new(42))
        .to_teams(&catalog)
        .expect("builtin catalog fills every slot");
    let seed = 42u64;
    let series = 64;

    let mut group = c.benchmark_group("series_projection");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("one_worker", |b| {
        let pool = WorkerPool::with_workers(1);
        b.iter(|| black_box(project_matchup(&teams, &catalog, series, seed, &pool)));
    });

    group.bench_function("all_cores", |b| {
        let pool = WorkerPool::default_workers();
        b.iter(|| black_box(project_matchup(&teams, &catalog, series, seed, &pool)));
    });

    group.finish();
}

criterion_group!(benches, bench_projection_sequential_vs_parallel);
criterion_main!(benches);
