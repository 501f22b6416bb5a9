use asset_vault::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_repository_get(c: &mut Criterion) {
    let (tx, rx) = lifecycle_channel();
    let registry = AssetRegistry::new(tx);
    let repo = registry.repository::<Material>();

    let handles: Vec<_> = (0..1000).map(|i| repo.create(format!("mat_{i}"))).collect();
    rx.drain_all();
    let target = handles[500].id();

    c.bench_function("repository_get_hit", |b| {
        b.iter(|| {
            let handle = repo.get(black_box(target));
            black_box(&handle);
        });
    });

    c.bench_function("repository_get_miss", |b| {
        let missing = AssetId::generate();
        b.iter(|| {
            let handle = repo.get(black_box(missing));
            black_box(&handle);
        });
    });
}

fn bench_handle_clone(c: &mut Criterion) {
    let (tx, rx) = lifecycle_channel();
    let registry = AssetRegistry::new(tx);
    let handle = registry.repository::<Material>().create("mat");
    rx.drain_all();

    c.bench_function("handle_clone_drop", |b| {
        b.iter(|| {
            let clone = black_box(&handle).clone();
            black_box(&clone);
        });
    });
}

fn bench_id_parse(c: &mut Criterion) {
    let text = AssetId::generate().to_string();
    c.bench_function("asset_id_parse", |b| {
        b.iter(|| AssetId::parse(black_box(&text)));
    });
}

criterion_group!(
    benches,
    bench_repository_get,
    bench_handle_clone,
    bench_id_parse
);
criterion_main!(benches);
