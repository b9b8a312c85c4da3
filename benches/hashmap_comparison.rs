use std::collections::HashMap as StdHashMap;
use std::hash::BuildHasher;
use std::hash::Hash;
use std::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::distr;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use robin_hash::HashContext;
use robin_hash::Options;
use robin_hash::RobinHoodMap;
use siphasher::sip::SipHasher;

#[derive(Clone, Copy, Default)]
struct SipState;

impl BuildHasher for SipState {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

type RobinMap<K> = RobinHoodMap<K, u64, HashContext<SipState>>;

trait BenchKey: Hash + Eq + Clone {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 11),
    (1 << 12),
    (1 << 13),
    (1 << 14),
    (1 << 15),
    (1 << 16),
    (1 << 17),
    (1 << 18),
];

fn robin_map<K: BenchKey>(capacity: usize) -> RobinMap<K> {
    let options = Options::default().with_init_capacity(capacity.next_power_of_two().max(1));
    RobinHoodMap::with_options_and_context(options, HashContext::new(SipState)).unwrap()
}

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn shuffled<K: Clone>(keys: &[K]) -> Vec<K> {
    let mut keys = keys.to_vec();
    keys.shuffle(&mut SmallRng::from_os_rng());
    keys
}

fn bench_insert_random<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_random_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = robin_map::<K>(1);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64).unwrap());
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = HashbrownMap::with_hasher(SipState);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = StdHashMap::with_hasher(SipState);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_insert_reserved<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_reserved_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = robin_map::<K>(1);
                    map.reserve(size).unwrap();
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64).unwrap());
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = HashbrownMap::with_capacity_and_hasher(size, SipState);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as u64));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let lookups = shuffled(&keys);
        group.throughput(Throughput::Elements(size as u64));

        let mut robin = robin_map::<K>(1);
        robin.try_extend(keys.iter().cloned().zip(0..)).unwrap();
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(robin.get(key));
                }
            })
        });

        let hashbrown: HashbrownMap<K, u64, SipState> = keys.iter().cloned().zip(0..).collect();
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(hashbrown.get(key));
                }
            })
        });

        let std: StdHashMap<K, u64, SipState> = keys.iter().cloned().zip(0..).collect();
        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(std.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_find_miss<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let misses = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        let mut robin = robin_map::<K>(1);
        robin.try_extend(keys.iter().cloned().zip(0..)).unwrap();
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(robin.get(key));
                }
            })
        });

        let hashbrown: HashbrownMap<K, u64, SipState> = keys.iter().cloned().zip(0..).collect();
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(hashbrown.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let removals = shuffled(&keys);
        group.throughput(Throughput::Elements(size as u64));

        let mut robin = robin_map::<K>(1);
        robin.try_extend(keys.iter().cloned().zip(0..)).unwrap();
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter_batched(
                || robin.clone(),
                |mut map| {
                    for key in &removals {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        let hashbrown: HashbrownMap<K, u64, SipState> = keys.iter().cloned().zip(0..).collect();
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown.clone(),
                |mut map| {
                    for key in &removals {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        let mut robin = robin_map::<K>(1);
        robin.try_extend(keys.iter().cloned().zip(0..)).unwrap();
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter(|| black_box(robin.values().sum::<u64>()))
        });

        let hashbrown: HashbrownMap<K, u64, SipState> = keys.iter().cloned().zip(0..).collect();
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| black_box(hashbrown.values().sum::<u64>()))
        });
    }

    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

fn bench_mixed_probabilistic<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "mixed_probabilistic_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const KEY_SPACE_MULTIPLIER: u64 = 2;

    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut rng = SmallRng::from_os_rng();
        let key_distr = distr::Uniform::new(0, size as u64 * KEY_SPACE_MULTIPLIER).unwrap();
        let operations = (0..size * 3)
            .map(|_| {
                let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
                let key = K::new(rng.sample(&key_distr));
                if op_choice < 0.5 {
                    (Operation::Find, key)
                } else if op_choice < 0.75 {
                    (Operation::Insert, key)
                } else {
                    (Operation::Remove, key)
                }
            })
            .collect::<Vec<(Operation, K)>>();

        group.throughput(Throughput::Elements(operations.len() as u64));
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter_batched(
                || operations.clone(),
                |operations| {
                    let mut map = robin_map::<K>(1);
                    for (i, (operation, key)) in operations.into_iter().enumerate() {
                        match operation {
                            Operation::Insert => {
                                black_box(map.insert(key, i as u64).unwrap());
                            }
                            Operation::Remove => {
                                black_box(map.remove(&key));
                            }
                            Operation::Find => {
                                black_box(map.get(&key));
                            }
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || operations.clone(),
                |operations| {
                    let mut map = HashbrownMap::with_hasher(SipState);
                    for (i, (operation, key)) in operations.into_iter().enumerate() {
                        match operation {
                            Operation::Insert => {
                                black_box(map.insert(key, i as u64));
                            }
                            Operation::Remove => {
                                black_box(map.remove(&key));
                            }
                            Operation::Find => {
                                black_box(map.get(&key));
                            }
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_churn<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = random_keys::<K>(size);
        let replacements = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64 * 2));

        let mut robin = robin_map::<K>(1);
        robin.try_extend(keys.iter().cloned().zip(0..)).unwrap();
        group.bench_function(format!("robin_hash/{size}"), |b| {
            b.iter_batched(
                || robin.clone(),
                |mut map| {
                    for (old, new) in keys.iter().zip(&replacements) {
                        black_box(map.remove(old));
                        black_box(map.insert(new.clone(), 0).unwrap());
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        let hashbrown: HashbrownMap<K, u64, SipState> = keys.iter().cloned().zip(0..).collect();
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown.clone(),
                |mut map| {
                    for (old, new) in keys.iter().zip(&replacements) {
                        black_box(map.remove(old));
                        black_box(map.insert(new.clone(), 0));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64, 8>,
    bench_insert_random::<String, 8>,
    bench_insert_reserved::<u64, 8>,
    bench_insert_reserved::<String, 8>,
    bench_find_hit::<u64, 8>,
    bench_find_hit::<String, 8>,
    bench_find_miss::<u64, 8>,
    bench_find_miss::<String, 8>,
    bench_remove::<u64, 8>,
    bench_remove::<String, 8>,
    bench_iteration::<u64, 8>,
    bench_iteration::<String, 8>,
    bench_mixed_probabilistic::<u64, 8>,
    bench_mixed_probabilistic::<String, 8>,
    bench_churn::<u64, 8>,
    bench_churn::<String, 8>,
);

criterion_main!(benches);
