use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sequencer_core::Sequencer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

const MSG_PER_PRODUCER: u64 = 2_000_000;

fn bench_single_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_writer");
    group.throughput(Throughput::Elements(MSG_PER_PRODUCER));

    group.bench_function("try_write", |b| {
        b.iter(|| {
            let seq: Arc<Sequencer<Vec<u8>>> = Arc::new(Sequencer::with_capacity(
                0,
                0,
                4096,
                sequencer_core::DEFAULT_QUEUE_CAPACITY,
            ));

            let drain_seq = Arc::clone(&seq);
            let drainer = thread::spawn(move || {
                let mut count = 0u64;
                while count < MSG_PER_PRODUCER {
                    if drain_seq.try_read().is_some() {
                        count += 1;
                    } else {
                        std::hint::spin_loop();
                    }
                }
            });

            let mut sent = 0u64;
            while sent < MSG_PER_PRODUCER {
                if seq.try_write(black_box(vec![0u8; 16]), sent as i64) != -1 {
                    sent += 1;
                } else {
                    std::hint::spin_loop();
                }
            }

            drainer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_batch_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_sizes");
    group.throughput(Throughput::Elements(MSG_PER_PRODUCER));

    for batch_size in [64, 256, 1024, 4096].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("batch_{batch_size}")),
            batch_size,
            |b, &batch| {
                b.iter(|| {
                    let seq: Arc<Sequencer<Vec<u8>>> =
                        Arc::new(Sequencer::with_capacity(0, 0, 4096, 256));

                    let drain_seq = Arc::clone(&seq);
                    let drainer = thread::spawn(move || {
                        let mut count = 0u64;
                        while count < MSG_PER_PRODUCER {
                            if let Some(b) = drain_seq.try_read() {
                                count += b.len() as u64;
                            } else {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    let mut sent = 0u64;
                    let mut idx = 0i64;
                    while sent < MSG_PER_PRODUCER {
                        let want = batch.min((MSG_PER_PRODUCER - sent) as usize);
                        let entries: Vec<Vec<u8>> = (0..want).map(|_| vec![0u8; 16]).collect();
                        let assigned = seq.try_write_batch(black_box(entries), idx);
                        if assigned != -1 {
                            sent += want as u64;
                            idx += 1;
                        } else {
                            std::hint::spin_loop();
                        }
                    }

                    drainer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    let msgs = 200_000u64;

    for num_producers in [2, 4, 8].iter() {
        let total = msgs * (*num_producers as u64);
        group.throughput(Throughput::Elements(total));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{num_producers}P_1C")),
            num_producers,
            |b, &n| {
                b.iter(|| {
                    let seq: Arc<Sequencer<Vec<u8>>> =
                        Arc::new(Sequencer::with_capacity(0, 0, 4096, 1024));
                    let target = msgs * (n as u64);

                    let mut producer_handles = vec![];
                    for p in 0..n {
                        let seq = Arc::clone(&seq);
                        producer_handles.push(thread::spawn(move || {
                            let mut sent = 0u64;
                            while sent < msgs {
                                if seq.try_write(black_box(vec![p as u8]), sent as i64) != -1 {
                                    sent += 1;
                                } else {
                                    std::hint::spin_loop();
                                }
                            }
                        }));
                    }

                    let seq_consumer = Arc::clone(&seq);
                    let consumer = thread::spawn(move || {
                        let count = Arc::new(AtomicU64::new(0));
                        while count.load(Ordering::Relaxed) < target {
                            if seq_consumer.try_read().is_some() {
                                count.fetch_add(1, Ordering::Relaxed);
                            } else {
                                std::hint::spin_loop();
                            }
                        }
                    });

                    for h in producer_handles {
                        h.join().unwrap();
                    }
                    consumer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_writer,
    bench_batch_sizes,
    bench_contention
);
criterion_main!(benches);
