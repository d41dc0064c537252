use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use idworker::{
    BusyWait, CUSTOM_EPOCH, Epoch, IdGenStatus, IdWorker, MonotonicClock, NodeId, SystemClock,
    TimeSource, WaitStrategy, YieldWait,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). One full millisecond of sequence space.
const TOTAL_IDS: usize = 4096;

fn node() -> NodeId {
    NodeId::new(1, 1).expect("valid node id")
}

/// Benchmarks the hot path where every ID is issued without waiting.
fn bench_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker/fixed");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let worker = IdWorker::new(
                    Epoch::from_unix_millis(0),
                    node(),
                    FixedMockTime { millis: 1 },
                )
                .expect("worker");
                for _ in 0..TOTAL_IDS {
                    match worker.poll_id() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        _ => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a real clock, where sequence exhaustion forces a wait.
fn bench_clock<T, W>(c: &mut Criterion, group_name: &str, make_worker: impl Fn() -> IdWorker<T, W>)
where
    T: TimeSource,
    W: WaitStrategy,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let worker = make_worker();
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(worker.next_id().expect("id"));
            }
        });
    });

    group.finish();
}

/// Benchmarks contention on one worker shared by every core.
fn bench_contended<W>(c: &mut Criterion, group_name: &str, wait: W)
where
    W: WaitStrategy + Clone + Send + Sync,
{
    let threads = num_cpus::get();
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}"), |b| {
        b.iter_custom(|iters| {
            let worker = Arc::new(
                IdWorker::with_wait(CUSTOM_EPOCH, node(), SystemClock, wait.clone())
                    .expect("worker"),
            );
            let barrier = Arc::new(Barrier::new(threads + 1));

            let start = scope(|s| {
                for _ in 0..threads {
                    let worker = Arc::clone(&worker);
                    let barrier = Arc::clone(&barrier);
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(worker.next_id().expect("id"));
                            }
                        }
                    });
                }
                barrier.wait();
                Instant::now()
            });

            start.elapsed()
        });
    });

    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_hot_path(c);
    bench_clock(c, "worker/system_clock", || {
        IdWorker::new(CUSTOM_EPOCH, node(), SystemClock).expect("worker")
    });
    bench_clock(c, "worker/monotonic_clock", || {
        IdWorker::new(CUSTOM_EPOCH, node(), MonotonicClock::new()).expect("worker")
    });
    bench_contended(c, "worker/contended/busy", BusyWait);
    bench_contended(c, "worker/contended/yield", YieldWait);
}

criterion_group!(bench_group, benches);
criterion_main!(bench_group);
