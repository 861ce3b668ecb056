// Performance benchmarks for profile vectorization and ranking
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rapport_core::{similarity, AttrValue, UserRecord};
use rapport_encoding::ProfileVectorizer;
use rapport_storage::SnapshotStore;

const STYLES: &[&str] = &["direct", "async", "verbose", "concise"];
const ZONES: &[&str] = &["UTC-8", "UTC-5", "UTC", "UTC+1", "UTC+5", "UTC+9"];
const CHRONOTYPES: &[&str] = &["lark", "owl", "flexible"];
const SLOTS: &[&str] = &["early_morning", "morning", "afternoon", "evening", "night"];

fn generate_profiles(count: usize) -> Vec<UserRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let slots: Vec<String> = SLOTS
                .iter()
                .filter(|_| rng.random_bool(0.4))
                .map(|s| s.to_string())
                .collect();
            UserRecord::new(format!("user-{i}"))
                .with_attribute(
                    "communication_style",
                    AttrValue::Scalar(STYLES.choose(&mut rng).unwrap().to_string()),
                )
                .with_attribute(
                    "time_zone",
                    AttrValue::Scalar(ZONES.choose(&mut rng).unwrap().to_string()),
                )
                .with_attribute(
                    "chronotype",
                    AttrValue::Scalar(CHRONOTYPES.choose(&mut rng).unwrap().to_string()),
                )
                .with_attribute("availability", AttrValue::List(slots))
        })
        .collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorize");

    for size in [100, 1000, 10000].iter() {
        let records = generate_profiles(*size);
        let vectorizer = ProfileVectorizer::new();

        group.bench_with_input(BenchmarkId::new("build", size), size, |b, _| {
            b.iter(|| {
                let state = vectorizer.build(black_box(&records));
                black_box(state);
            });
        });
    }

    group.finish();
}

fn benchmark_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    // Setup: derive vectors for 10k profiles
    let records = generate_profiles(10000);
    let state = ProfileVectorizer::new().build(&records).unwrap();

    let ids: Vec<&str> = state.user_ids().collect();
    let target = state.vector_of(ids[0]).unwrap().as_slice();
    let candidates: Vec<&[f32]> = ids[1..]
        .iter()
        .filter_map(|id| state.vector_of(id))
        .map(|v| v.as_slice())
        .collect();

    group.bench_function("one_to_many_10k", |b| {
        b.iter(|| {
            let scores =
                similarity::cosine_one_to_many(black_box(target), candidates.iter().copied());
            black_box(scores);
        });
    });

    group.finish();
}

fn benchmark_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    let records = generate_profiles(1000);
    let state = ProfileVectorizer::new().build(&records).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("similarity.snapshot"));

    group.bench_function("save_1k_users", |b| {
        b.iter(|| store.save(black_box(&state)).unwrap());
    });

    store.save(&state).unwrap();
    group.bench_function("load_1k_users", |b| {
        b.iter(|| {
            let restored = store.load().unwrap();
            black_box(restored);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_ranking, benchmark_snapshot);
criterion_main!(benches);
