//! Micro benchmarks for the storage engine's hot paths.
#![allow(missing_docs)]

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use canopy::{BPlusTree, OrderedTable};

const RECORD_COUNT: usize = 32_768;
const LOOKUP_SAMPLES: usize = 4_096;
const ORDER: usize = 16;
const CAPACITY: usize = 64;
const BUFFER_CAPACITY: usize = 32;

/// Loads `records` through the buffer-routing policy callers use in front
/// of the tree.
fn load(tree: &mut BPlusTree<i64, i64>, records: &[(i64, i64)]) {
    let mut buffer = OrderedTable::new();
    for &(key, value) in records {
        let buffered = match tree.index_range() {
            None => true,
            Some(range) => key > range.right,
        };
        if buffered {
            buffer.put(key, value);
            if buffer.len() == BUFFER_CAPACITY {
                tree.write(std::mem::take(&mut buffer)).unwrap();
            }
        } else {
            tree.insert(key, value).unwrap();
        }
    }
    if !buffer.is_empty() {
        tree.write(std::mem::take(&mut buffer)).unwrap();
    }
}

fn record_set(seed: u64) -> Vec<(i64, i64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..RECORD_COUNT)
        .map(|_| (rng.gen_range(-1_000_000..1_000_000), rng.gen()))
        .collect()
}

fn engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.sample_size(30);

    let records = record_set(0xBEEF);

    group.throughput(Throughput::Elements(RECORD_COUNT as u64));
    group.bench_function("buffered_load", |b| {
        b.iter_batched(
            || BPlusTree::new(ORDER, CAPACITY).unwrap(),
            |mut tree| {
                load(&mut tree, &records);
                black_box(tree.size());
            },
            BatchSize::SmallInput,
        );
    });

    let mut loaded = BPlusTree::new(ORDER, CAPACITY).unwrap();
    load(&mut loaded, &records);
    let mut probes: Vec<i64> = records.iter().map(|&(key, _)| key).collect();
    probes.shuffle(&mut ChaCha8Rng::seed_from_u64(0xD1CE));
    probes.truncate(LOOKUP_SAMPLES);

    group.throughput(Throughput::Elements(LOOKUP_SAMPLES as u64));
    group.bench_function("point_get", |b| {
        b.iter(|| {
            for key in &probes {
                black_box(loaded.get(key));
            }
        });
    });

    group.throughput(Throughput::Elements(LOOKUP_SAMPLES as u64));
    group.bench_function("delete_reload", |b| {
        b.iter_batched(
            || {
                let mut tree = BPlusTree::new(ORDER, CAPACITY).unwrap();
                load(&mut tree, &records);
                tree
            },
            |mut tree| {
                for key in &probes {
                    black_box(tree.delete(key));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("table");
    group.sample_size(50);

    let mut keys: Vec<i64> = (0..CAPACITY as i64 * 16).collect();
    keys.shuffle(&mut ChaCha8Rng::seed_from_u64(0xACE));

    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("random_put", |b| {
        b.iter_batched(
            OrderedTable::new,
            |mut table| {
                for &key in &keys {
                    table.put(key, key);
                }
                black_box(table.len());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("split", |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<OrderedTable<i64, i64>>(),
            |mut table| {
                let right = table.split().unwrap();
                black_box((table.len(), right.len()));
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, engine, tables);
criterion_main!(benches);
