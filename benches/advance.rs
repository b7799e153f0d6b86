use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glicko_processor::{
    model::{rating_engine::RatingEngine, structures::model_config::ModelConfig},
    utils::test_utils::generate_dataset
};

fn group_call(c: &mut Criterion) {
    let dataset = generate_dataset(2000, 10, 4000, 1);
    let config = ModelConfig::default();

    let mut group = c.benchmark_group("advance");
    group.sample_size(20);
    for shard_size in [64, 500, 5000] {
        let engine = RatingEngine::new(&dataset, shard_size, None).unwrap();

        group.bench_with_input(BenchmarkId::new("shard_size", shard_size), &engine, |b, engine| {
            b.iter(|| {
                let mut ratings = dataset.initial_ratings(&config);
                engine
                    .advance(0..dataset.round_count(), &mut ratings, config.tau, None)
                    .unwrap();
                ratings
            })
        });
    }
    group.finish();
}

criterion_group!(benches, group_call);
criterion_main!(benches);
