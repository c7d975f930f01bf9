use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use super::platform::Timebase;

pub const DEFAULT_CAPACITY: usize = 500;
pub const MAX_CPU_PERCENT: f64 = 999.9;

// Closer samples than this give a noisy rate; report 0 instead.
const MIN_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug)]
struct Observation {
    ticks: u64,
    at: Instant,
}

/// Per-pid CPU time from the previous sample, for delta-based CPU percent.
#[derive(Debug)]
pub struct CpuTracker {
    entries: HashMap<i32, Observation>,
    capacity: usize,
}

impl CpuTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Record `ticks` for `pid` at `now` and return CPU percent since the
    /// previous observation.
    ///
    /// Returns 0.0 on first sight of a pid and when the previous observation
    /// is 0.5s old or less. The stored observation is replaced either way.
    pub fn observe(&mut self, pid: i32, ticks: u64, now: Instant, timebase: Timebase) -> f64 {
        let current = Observation { ticks, at: now };
        let Some(previous) = self.entries.insert(pid, current) else {
            return 0.0;
        };

        let elapsed = now.saturating_duration_since(previous.at);
        if elapsed <= MIN_INTERVAL {
            return 0.0;
        }

        // A counter that went backwards means the pid was reused.
        let delta = ticks.saturating_sub(previous.ticks);
        let cpu_seconds = timebase.ticks_to_seconds(delta);
        (cpu_seconds / elapsed.as_secs_f64() * 100.0).clamp(0.0, MAX_CPU_PERCENT)
    }

    /// Drop pids that are no longer alive, then evict until the tracker is
    /// within capacity: pids outside `keep` go first, oldest observation
    /// first, lowest pid breaking ties.
    pub fn prune(&mut self, alive_pids: &HashSet<i32>, keep: &HashSet<i32>) {
        self.entries.retain(|pid, _| alive_pids.contains(pid));

        if self.entries.len() <= self.capacity {
            return;
        }
        let mut candidates: Vec<(bool, Instant, i32)> = self
            .entries
            .iter()
            .map(|(&pid, obs)| (keep.contains(&pid), obs.at, pid))
            .collect();
        candidates.sort_unstable();
        let excess = self.entries.len() - self.capacity;
        for (_, _, pid) in candidates.into_iter().take(excess) {
            self.entries.remove(&pid);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, pid: i32) -> bool {
        self.entries.contains_key(&pid)
    }

    pub fn pids(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for CpuTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: Timebase = Timebase::NANOSECONDS;

    #[test]
    fn first_observation_is_zero() {
        let mut tracker = CpuTracker::default();
        let now = Instant::now();
        assert_eq!(tracker.observe(7, 5_000_000_000, now, NS), 0.0);
        assert!(tracker.contains(7));
    }

    #[test]
    fn delta_over_wall_time() {
        let mut tracker = CpuTracker::default();
        let t0 = Instant::now();
        tracker.observe(1, 1_000_000_000, t0, NS);
        // 0.5s of CPU over 2s of wall time.
        let pct = tracker.observe(1, 1_500_000_000, t0 + Duration::from_secs(2), NS);
        assert!((pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn too_soon_reports_zero_but_updates_baseline() {
        let mut tracker = CpuTracker::default();
        let t0 = Instant::now();
        tracker.observe(1, 0, t0, NS);
        let soon = t0 + Duration::from_millis(500);
        assert_eq!(tracker.observe(1, 400_000_000, soon, NS), 0.0);
        // Next delta is measured from the 0.5s observation.
        let later = soon + Duration::from_secs(1);
        let pct = tracker.observe(1, 900_000_000, later, NS);
        assert!((pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_to_max() {
        let mut tracker = CpuTracker::default();
        let t0 = Instant::now();
        tracker.observe(1, 0, t0, NS);
        let pct = tracker.observe(1, 100_000_000_000, t0 + Duration::from_secs(1), NS);
        assert_eq!(pct, MAX_CPU_PERCENT);
    }

    #[test]
    fn reused_pid_with_lower_ticks_is_zero() {
        let mut tracker = CpuTracker::default();
        let t0 = Instant::now();
        tracker.observe(1, 9_000_000_000, t0, NS);
        let pct = tracker.observe(1, 10, t0 + Duration::from_secs(1), NS);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn prune_removes_dead_pids() {
        let mut tracker = CpuTracker::default();
        let now = Instant::now();
        tracker.observe(1, 0, now, NS);
        tracker.observe(2, 0, now, NS);
        tracker.observe(3, 0, now, NS);

        let alive: HashSet<i32> = [1, 3].into_iter().collect();
        tracker.prune(&alive, &HashSet::new());

        assert!(tracker.contains(1));
        assert!(!tracker.contains(2));
        assert!(tracker.contains(3));
    }

    #[test]
    fn prune_evicts_oldest_over_capacity() {
        let mut tracker = CpuTracker::new(3);
        let t0 = Instant::now();
        for pid in 1..=5 {
            tracker.observe(pid, 0, t0 + Duration::from_secs(pid as u64), NS);
        }
        let alive: HashSet<i32> = (1..=5).collect();
        tracker.prune(&alive, &HashSet::new());

        assert_eq!(tracker.len(), 3);
        assert!(!tracker.contains(1));
        assert!(!tracker.contains(2));
        assert!(tracker.contains(5));
    }

    #[test]
    fn prune_keeps_protected_pids_when_all_observed_together() {
        let mut tracker = CpuTracker::new(3);
        let now = Instant::now();
        for pid in 1..=6 {
            tracker.observe(pid, 0, now, NS);
        }
        let alive: HashSet<i32> = (1..=6).collect();
        let keep: HashSet<i32> = [1, 2].into_iter().collect();
        tracker.prune(&alive, &keep);

        assert_eq!(tracker.len(), 3);
        assert!(tracker.contains(1));
        assert!(tracker.contains(2));
        assert!(tracker.contains(6));
    }
}
