use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sipdict::{Dict, DictConfig};

const SIZES: &[usize] = &[256, 1_024, 8_192, 65_536];
const REHASH_STEPS: &[usize] = &[1, 4, 16, 64];
const STEPS_N: usize = 65_536;
const CHURN_N: usize = 8_192;

fn bench_insert_with_rehash(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/insert_default_initial");

    for &n in SIZES {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut d: Dict<[u8; 8], u64> = Dict::new();
                for i in 0..n as u64 {
                    d.set(black_box(i.to_le_bytes()), black_box(i)).unwrap();
                }
                black_box(d)
            });
        });
    }

    group.finish();
}

fn bench_insert_presized(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/insert_presized");

    for &n in SIZES {
        let config = DictConfig {
            initial_size: n.next_power_of_two(),
            ..DictConfig::default()
        };

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut d: Dict<[u8; 8], u64> = Dict::with_config(config.clone()).unwrap();
                for i in 0..n as u64 {
                    d.set(black_box(i.to_le_bytes()), black_box(i)).unwrap();
                }
                black_box(d)
            });
        });
    }

    group.finish();
}

fn bench_rehash_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/steps_per_call");
    group.throughput(Throughput::Elements(STEPS_N as u64));

    for &steps in REHASH_STEPS {
        let config = DictConfig {
            rehash_steps: steps,
            ..DictConfig::default()
        };

        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, _| {
            b.iter(|| {
                let mut d: Dict<[u8; 8], u64> = Dict::with_config(config.clone()).unwrap();
                for i in 0..STEPS_N as u64 {
                    d.set(black_box(i.to_le_bytes()), black_box(i)).unwrap();
                }
                black_box(d)
            });
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("rehash/set_delete_churn");
    group.throughput(Throughput::Elements(CHURN_N as u64 * 2));

    group.bench_function(BenchmarkId::from_parameter(CHURN_N), |b| {
        b.iter(|| {
            let mut d: Dict<[u8; 8], u64> = Dict::new();
            for i in 0..CHURN_N as u64 {
                d.set(i.to_le_bytes(), i).unwrap();
                if i % 2 == 0 {
                    black_box(d.delete(&(i / 2).to_le_bytes()));
                }
            }
            black_box(d)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_with_rehash,
    bench_insert_presized,
    bench_rehash_steps,
    bench_churn
);
criterion_main!(benches);
