use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, debug_span, trace};

use super::cpu::CpuTracker;
use super::memory::{HostMemory, MemoryPressure, SwapUsage};
use super::names::{name_from_args, resolve_display_name};
use super::platform::{NativeProvider, ProcessInfoProvider, Timebase};
use super::process::{ProcessSample, SortColumn, rank_processes};
use super::snapshot::MemorySnapshot;

/// Polls the OS and produces ranked [`MemorySnapshot`]s.
///
/// The only state carried between calls is the per-pid CPU tracker. `sample`
/// takes `&mut self`, so one instance never has two samples in flight.
pub struct ProcessSampler<P = NativeProvider> {
    provider: P,
    cpu: CpuTracker,
    timebase: Timebase,
}

impl Default for ProcessSampler<NativeProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSampler<NativeProvider> {
    pub fn new() -> Self {
        Self::with_provider(NativeProvider::new())
    }
}

impl<P: ProcessInfoProvider> ProcessSampler<P> {
    pub fn with_provider(provider: P) -> Self {
        let timebase = provider.timebase();
        ProcessSampler {
            provider,
            cpu: CpuTracker::default(),
            timebase,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cpu_tracker(&self) -> &CpuTracker {
        &self.cpu
    }

    /// Take a snapshot now. Never fails: unreadable data degrades to zeroed
    /// fields or excluded processes.
    pub fn sample(&mut self, sort_by: SortColumn, descending: bool) -> MemorySnapshot {
        self.sample_at(sort_by, descending, Instant::now())
    }

    /// [`sample`](Self::sample) with an explicit wall-clock instant for the
    /// CPU delta computation.
    pub fn sample_at(
        &mut self,
        sort_by: SortColumn,
        descending: bool,
        now: Instant,
    ) -> MemorySnapshot {
        let _span = debug_span!("sampler.sample", ?sort_by, descending).entered();

        self.provider.refresh();

        let counters = self.provider.vm_counters();
        if counters.is_none() {
            debug!("vm counters unavailable; host memory fields zeroed");
        }
        let total = self.provider.total_memory().unwrap_or_else(|| {
            debug!("total memory unavailable");
            0
        });
        let mut memory = HostMemory::from_counters(counters.as_ref(), total);

        let kernel_level = self.provider.pressure_metric();
        if kernel_level.is_none() {
            trace!("no kernel pressure metric; using free-memory heuristic");
        }
        let memory_pressure = MemoryPressure::classify(kernel_level, memory.free, memory.total);

        let swap_totals = self.provider.swap_totals();
        if swap_totals.is_none() {
            debug!("swap usage unavailable; swap totals zeroed");
        }
        let swap = SwapUsage::from_parts(swap_totals, counters.as_ref());

        let listed = self.provider.list_pids();
        if listed.is_none() {
            debug!("process listing failed; cpu history kept");
        }
        let pids = listed.as_deref().unwrap_or_default();

        let processes: Vec<ProcessSample> = pids
            .iter()
            .filter_map(|&pid| self.sample_process(pid, total, now))
            .collect();
        let process_count = processes.len();

        let top_processes = rank_processes(processes, sort_by, descending);
        for process in &top_processes {
            memory.app_physical = memory.app_physical.saturating_add(process.resident_bytes);
            memory.app_virtual = memory.app_virtual.saturating_add(process.virtual_bytes);
        }

        // Without a listing the alive set is unknown.
        if listed.is_some() {
            let alive: HashSet<i32> = pids.iter().copied().collect();
            let ranked: HashSet<i32> = top_processes.iter().map(|p| p.pid).collect();
            self.cpu.prune(&alive, &ranked);
        }

        debug!(
            listed = pids.len(),
            sampled = process_count,
            tracked = self.cpu.len(),
            pressure = memory_pressure.label(),
            "sample complete"
        );

        MemorySnapshot {
            memory,
            memory_pressure,
            swap,
            top_processes,
            process_count,
            sort_column: sort_by,
            descending,
        }
    }

    fn sample_process(&mut self, pid: i32, total_memory: u64, now: Instant) -> Option<ProcessSample> {
        if pid <= 0 {
            return None;
        }
        let Some(info) = self.provider.task_info(pid) else {
            trace!(pid, "task info unavailable; skipping");
            return None;
        };

        // The path lookup only runs when argv yields nothing usable.
        let display_name = match self
            .provider
            .process_args(pid)
            .as_deref()
            .and_then(name_from_args)
        {
            Some(name) => name,
            None => {
                let path = self.provider.process_path(pid);
                resolve_display_name(pid, None, path.as_deref())
            }
        };

        let cpu_percent = self.cpu.observe(pid, info.cpu_ticks, now, self.timebase);

        Some(ProcessSample {
            pid,
            resident_bytes: info.resident_bytes,
            virtual_bytes: info.virtual_bytes,
            memory_percent: ProcessSample::memory_percent_of(info.resident_bytes, total_memory),
            cpu_percent,
            display_name,
        })
    }
}
