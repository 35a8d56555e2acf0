use std::{collections::HashMap, hint::black_box, thread};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{distributions::Alphanumeric, rngs::SmallRng, Rng, SeedableRng};
use sipdict::{Dict, DictHasher, SharedDict, Sip24Hasher};

const SIZES: &[usize] = &[100, 1_000, 10_000, 100_000];
const KEY_LEN: usize = 16;

fn random_keys(n: usize) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    (0..n)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(KEY_LEN)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops/set");

    for &n in SIZES {
        let keys = random_keys(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("Dict", n), &keys, |b, keys| {
            b.iter(|| {
                let mut d = Dict::new();
                for (i, k) in keys.iter().enumerate() {
                    d.set(black_box(k.clone()), black_box(i)).unwrap();
                }
                black_box(d)
            });
        });

        group.bench_with_input(BenchmarkId::new("HashMap", n), &keys, |b, keys| {
            b.iter(|| {
                let mut d = HashMap::new();
                for (i, k) in keys.iter().enumerate() {
                    d.insert(black_box(k.clone()), black_box(i));
                }
                black_box(d)
            });
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops/get");

    for &n in SIZES {
        let keys = random_keys(n);
        group.throughput(Throughput::Elements(n as u64));

        let mut dict = Dict::new();
        let mut hashmap = HashMap::new();
        for (i, k) in keys.iter().enumerate() {
            dict.set(k.clone(), i).unwrap();
            hashmap.insert(k.clone(), i);
        }

        group.bench_with_input(BenchmarkId::new("Dict", n), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(dict.get(black_box(k.as_str())));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("HashMap", n), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(hashmap.get(black_box(k.as_str())));
                }
            });
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops/set_then_delete");

    for &n in &SIZES[..3] {
        let keys = random_keys(n);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("Dict", n), &keys, |b, keys| {
            b.iter(|| {
                let mut d = Dict::new();
                for (i, k) in keys.iter().enumerate() {
                    d.set(k.clone(), i).unwrap();
                }
                for k in keys {
                    black_box(d.delete(black_box(k.as_str())));
                }
            });
        });
    }

    group.finish();
}

fn bench_shared_get(c: &mut Criterion) {
    let keys = random_keys(10_000);
    let dict = SharedDict::new();
    for (i, k) in keys.iter().enumerate() {
        dict.set(k.clone(), i).unwrap();
    }

    c.bench_function("ops/shared_get 10_000", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(dict.get(black_box(k.as_str())));
            }
        });
    });
}

fn bench_hasher(c: &mut Criterion) {
    let mut group = c.benchmark_group("hasher/sip24_digest");
    let hasher = Sip24Hasher::from_key([7; 16]);

    for len in [8usize, 16, 64, 256, 1024] {
        let message = vec![0xab; len];
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &message, |b, m| {
            b.iter(|| black_box(hasher.digest(black_box(m))));
        });
    }

    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 2_500;

    let keys = random_keys(THREADS * PER_THREAD);
    let mut group = c.benchmark_group("ops/parallel");
    group.throughput(Throughput::Elements((THREADS * PER_THREAD) as u64));

    group.bench_function("set_get_delete", |b| {
        b.iter(|| {
            let dict = SharedDict::new();
            thread::scope(|s| {
                for chunk in keys.chunks(PER_THREAD) {
                    let dict = dict.clone();
                    s.spawn(move || {
                        for (i, k) in chunk.iter().enumerate() {
                            dict.set(k.clone(), i).unwrap();
                        }
                        for k in chunk {
                            black_box(dict.get(k.as_str()));
                        }
                        for k in chunk.iter().step_by(2) {
                            black_box(dict.delete(k.as_str()));
                        }
                    });
                }
            });
            black_box(dict.len())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_delete,
    bench_shared_get,
    bench_hasher,
    bench_parallel
);
criterion_main!(benches);
