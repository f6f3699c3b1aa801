use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use serializable_collections::{PairEntry, PersistHooks, RawEntry, SerializableDictionary};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (SerializableDictionary<String, u64>, Vec<String>) {
    let mut d = SerializableDictionary::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        d.add(k.clone(), i as u64).unwrap();
    }
    (d, keys)
}

fn bench_add_fresh_100k(c: &mut Criterion) {
    c.bench_function("dictionary::add_fresh_100k", |b| {
        b.iter_batched(
            SerializableDictionary::<String, u64>::new,
            |mut d| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    d.add(key(x), i as u64).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

// Upsert rewrites the raw list and rebuilds, so it is linear per call.
fn bench_upsert_existing_1k_on_10k(c: &mut Criterion) {
    c.bench_function("dictionary::upsert_existing_1k_on_10k", |b| {
        b.iter_batched(
            || {
                let (d, keys) = filled(2, 10_000);
                let mut s = 0x9e3779b97f4a7c15u64;
                let targets: Vec<String> = (0..1_000)
                    .map(|_| {
                        s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                        keys[(s as usize) % keys.len()].clone()
                    })
                    .collect();
                (d, targets)
            },
            |(mut d, targets)| {
                for (i, k) in targets.into_iter().enumerate() {
                    let _ = d.insert(k, i as u64).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_10k(c: &mut Criterion) {
    c.bench_function("dictionary::get_hit_10k_on_100k", |b| {
        let (d, keys) = filled(7, 100_000);
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(d.get(k.as_str()));
            }
        })
    });
}

fn bench_get_miss_10k(c: &mut Criterion) {
    c.bench_function("dictionary::get_miss_10k_on_100k", |b| {
        let (d, _) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(d.get(k.as_str()));
            }
        })
    });
}

// A load: every tenth raw entry repeats an earlier key and a few are null.
fn bench_reconcile_after_load_100k(c: &mut Criterion) {
    c.bench_function("dictionary::reconcile_after_load_100k", |b| {
        let raw: Vec<RawEntry<String, u64>> = lcg(13)
            .take(100_000)
            .enumerate()
            .map(|(i, x)| {
                let k = match i % 1000 {
                    0 => None,
                    n if n % 10 == 9 => Some(key(x % 97)),
                    _ => Some(key(x)),
                };
                PairEntry::new(k, i as u64)
            })
            .collect();
        b.iter_batched(
            || raw.clone(),
            |raw| {
                let mut d = SerializableDictionary::from_raw(raw);
                d.on_after_load();
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_all_100k(c: &mut Criterion) {
    c.bench_function("dictionary::iter_all_100k", |b| {
        let (d, _) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in d.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_mutate;
    config = bench_config();
    targets = bench_add_fresh_100k, bench_upsert_existing_1k_on_10k, bench_reconcile_after_load_100k
}

criterion_group! {
    name = benches_read;
    config = bench_config();
    targets = bench_get_hit_10k, bench_get_miss_10k, bench_iter_all_100k
}

criterion_main!(benches_mutate, benches_read);
