use avl_store::{AvlIndex, Entry, IndexedStore};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn index_of(keys: &[i64]) -> AvlIndex {
    keys.iter().map(|&k| Entry::new("bench", k)).collect()
}

// ─── Index Benchmarks ───────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion) {
    for (name, keys) in [("index_insert_ordered", ordered_keys(N)), ("index_insert_random", random_keys(N))] {
        let mut group = c.benchmark_group(name);

        group.bench_function(BenchmarkId::new("AvlIndex", N), |b| {
            b.iter(|| index_of(&keys));
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.entry(k).or_insert("bench");
                }
                map
            });
        });

        group.finish();
    }
}

fn bench_search(c: &mut Criterion) {
    let keys = random_keys(N);
    let index = index_of(&keys);
    let mut group = c.benchmark_group("index_search_random");

    group.bench_function(BenchmarkId::new("AvlIndex", N), |b| {
        b.iter(|| {
            let mut comparisons = 0usize;
            for &k in &keys {
                comparisons += index.search("bench", k).comparisons;
            }
            comparisons
        });
    });

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("index_remove_random");

    group.bench_function(BenchmarkId::new("AvlIndex", N), |b| {
        b.iter_batched(
            || index_of(&keys),
            |mut index| {
                for &k in &keys {
                    let _ = index.remove("bench", k);
                }
                index
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Store Benchmarks ───────────────────────────────────────────────────────

fn bench_range_query(c: &mut Criterion) {
    let store: IndexedStore = ordered_keys(N).into_iter().map(|k| Entry::new("bench", k)).collect();
    let mut group = c.benchmark_group("store_range_query");

    for width in [10i64, 100, 1_000] {
        group.bench_function(BenchmarkId::new("IndexedStore", width), |b| {
            b.iter(|| store.range_query(N as i64 / 2, N as i64 / 2 + width).len());
        });
    }

    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let store: IndexedStore = random_keys(N).into_iter().map(|k| Entry::new("bench", k)).collect();
    let mut group = c.benchmark_group("store_find_k_nearest_keys");

    group.bench_function(BenchmarkId::new("IndexedStore", 16), |b| {
        b.iter(|| store.find_k_nearest_keys(1 << 30, 16).len());
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(index_benches, bench_insert, bench_search, bench_remove,);

criterion_group!(store_benches, bench_range_query, bench_nearest,);

criterion_main!(index_benches, store_benches);
