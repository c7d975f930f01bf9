use std::thread;
use std::time::Duration;

use membar::system::process::{SortColumn, TOP_PROCESS_LIMIT};
use membar::system::sampler::ProcessSampler;

#[test]
fn live_host_snapshot_is_consistent() {
    let mut sampler = ProcessSampler::new();
    sampler.sample(SortColumn::MemoryPercent, true);
    thread::sleep(Duration::from_millis(600));
    let snapshot = sampler.sample(SortColumn::CpuPercent, true);

    assert!(snapshot.process_count > 0, "no processes sampled");
    assert!(!snapshot.top_processes.is_empty());
    assert!(snapshot.top_processes.len() <= TOP_PROCESS_LIMIT);
    assert!(snapshot.memory.total > 0);

    for p in &snapshot.top_processes {
        assert!(p.pid > 0);
        assert!(!p.display_name.is_empty());
        assert!((0.0..=100.0).contains(&p.memory_percent));
        assert!((0.0..=999.9).contains(&p.cpu_percent));
    }
    for pair in snapshot.top_processes.windows(2) {
        assert!(pair[0].cpu_percent >= pair[1].cpu_percent);
    }

    assert!(sampler.cpu_tracker().len() <= 500);
    assert!(snapshot.swap.utilization_percent >= 0.0);
    assert!(snapshot.swap.utilization_percent <= 100.0);
}

#[cfg(target_os = "macos")]
#[test]
fn used_plus_free_accounts_for_total() {
    let mut sampler = ProcessSampler::new();
    let mem = sampler.sample(SortColumn::MemoryPercent, true).memory;
    let accounted = (mem.used + mem.free) as f64;
    let total = mem.total as f64;
    assert!(
        (accounted - total).abs() <= total * 0.05,
        "used {} + free {} vs total {}",
        mem.used,
        mem.free,
        mem.total
    );
}
