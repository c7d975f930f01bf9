use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use membar::system::process::{ProcessSample, SortColumn, rank_processes};
use std::hint::black_box;

const TOTAL: u64 = 32 * 1024 * 1024 * 1024;

fn make_processes(n: usize) -> Vec<ProcessSample> {
    (0..n)
        .map(|i| {
            let resident = ((i * 7919) % 4099 + 1) as u64 * 1024 * 1024;
            ProcessSample {
                pid: i as i32 + 1,
                resident_bytes: resident,
                virtual_bytes: resident * 6,
                memory_percent: ProcessSample::memory_percent_of(resident, TOTAL),
                cpu_percent: (i % 100) as f64,
                display_name: format!("Proc_{}", n - i),
            }
        })
        .collect()
}

fn bench_rank_by_memory(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_memory_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let processes = make_processes(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &processes,
            |b, processes| {
                b.iter(|| {
                    let ranked = rank_processes(
                        black_box(processes.clone()),
                        SortColumn::MemoryPercent,
                        true,
                    );
                    black_box(ranked);
                })
            },
        );
    }

    group.finish();
}

fn bench_rank_by_command(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_command_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let processes = make_processes(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &processes,
            |b, processes| {
                b.iter(|| {
                    let ranked =
                        rank_processes(black_box(processes.clone()), SortColumn::Command, false);
                    black_box(ranked);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_rank_by_memory, bench_rank_by_command);
criterion_main!(benches);
