//! Performance benchmarks for relaxation runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hopfield::{
    utils, weights, BipolarVector, CancelToken, NetworkRun, NullObserver, RelaxationEngine,
    RunMode,
};
use rand::SeedableRng;
use std::sync::Arc;

fn setup(n: usize, count: usize) -> (Arc<hopfield::TrainedModel>, BipolarVector) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let patterns: Vec<BipolarVector> = (0..count).map(|_| utils::random_pattern(n, &mut rng)).collect();
    let model = Arc::new(weights::train(&patterns).unwrap());
    let probe = utils::corrupt_pct(&patterns[0], 0.1, &mut rng).unwrap();
    (model, probe)
}

fn bench_step(c: &mut Criterion) {
    let (model, probe) = setup(1024, 4);

    c.bench_function("step_1024", |b| {
        b.iter_batched(
            || NetworkRun::new(Arc::clone(&model), &probe).unwrap(),
            |mut run| {
                for _ in 0..64 {
                    black_box(run.step());
                }
                run
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_recall(c: &mut Criterion) {
    let mut group = c.benchmark_group("recall");
    group.sample_size(20);

    for n in [256, 1024].iter() {
        let (model, probe) = setup(*n, 4);

        for mode in [RunMode::Visual, RunMode::Instant] {
            let engine = RelaxationEngine::new(mode);
            let id = BenchmarkId::new(format!("{:?}", mode).to_lowercase(), n);

            group.bench_with_input(id, n, |b, _| {
                b.iter(|| {
                    let run = NetworkRun::new(Arc::clone(&model), black_box(&probe)).unwrap();
                    black_box(engine.run(run, &mut NullObserver, &CancelToken::new()))
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_step, bench_recall);

criterion_main!(benches);
