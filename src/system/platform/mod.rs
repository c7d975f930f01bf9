//! OS process-info providers.
//!
//! Everything that touches the kernel lives behind [`ProcessInfoProvider`].
//! The sampler above it only sees plain counters, so ranking, pressure
//! classification and CPU math can be tested with fake providers.

pub mod procargs;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "linux")]
pub use linux::LinuxProvider as NativeProvider;
#[cfg(target_os = "macos")]
pub use macos::MacProvider as NativeProvider;

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
compile_error!("membar reads Darwin kernel interfaces; only macOS (and Linux for development) are supported");

/// Host-wide VM page counters.
///
/// Page counts are multiplied by `page_size` to get bytes. `swap_ins` and
/// `swap_outs` are cumulative since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VmCounters {
    pub page_size: u64,
    pub free_pages: u64,
    pub active_pages: u64,
    pub inactive_pages: u64,
    pub wired_pages: u64,
    pub compressed_pages: u64,
    pub swap_ins: u64,
    pub swap_outs: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapTotals {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Per-process resource usage as reported by the kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskInfo {
    pub resident_bytes: u64,
    pub virtual_bytes: u64,
    /// Accumulated user + system CPU time, in kernel ticks.
    pub cpu_ticks: u64,
}

/// Ratio converting kernel CPU ticks to nanoseconds (`ticks * numer / denom`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timebase {
    pub numer: u32,
    pub denom: u32,
}

impl Timebase {
    pub const NANOSECONDS: Timebase = Timebase { numer: 1, denom: 1 };

    pub fn ticks_to_seconds(self, ticks: u64) -> f64 {
        if self.denom == 0 {
            return 0.0;
        }
        ticks as f64 * f64::from(self.numer) / f64::from(self.denom) / 1_000_000_000.0
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::NANOSECONDS
    }
}

/// Read-only view of the OS process table and VM statistics.
///
/// Every query is best effort: `None` means the data could not be read and
/// the caller degrades instead of failing.
pub trait ProcessInfoProvider {
    /// Called once at the start of every sample, before any other query.
    fn refresh(&mut self) {}

    fn vm_counters(&self) -> Option<VmCounters>;

    fn total_memory(&self) -> Option<u64>;

    /// Kernel memory pressure metric on its native integer scale.
    fn pressure_metric(&self) -> Option<i32>;

    fn swap_totals(&self) -> Option<SwapTotals>;

    /// Every live pid. This is the authoritative pid set for one sample.
    fn list_pids(&self) -> Option<Vec<i32>>;

    fn task_info(&self, pid: i32) -> Option<TaskInfo>;

    /// Full argv of the process.
    fn process_args(&self, pid: i32) -> Option<Vec<String>>;

    /// Path of the process executable.
    fn process_path(&self, pid: i32) -> Option<String>;

    fn timebase(&self) -> Timebase;
}

impl<P: ProcessInfoProvider + ?Sized> ProcessInfoProvider for Box<P> {
    fn refresh(&mut self) {
        (**self).refresh()
    }

    fn vm_counters(&self) -> Option<VmCounters> {
        (**self).vm_counters()
    }

    fn total_memory(&self) -> Option<u64> {
        (**self).total_memory()
    }

    fn pressure_metric(&self) -> Option<i32> {
        (**self).pressure_metric()
    }

    fn swap_totals(&self) -> Option<SwapTotals> {
        (**self).swap_totals()
    }

    fn list_pids(&self) -> Option<Vec<i32>> {
        (**self).list_pids()
    }

    fn task_info(&self, pid: i32) -> Option<TaskInfo> {
        (**self).task_info(pid)
    }

    fn process_args(&self, pid: i32) -> Option<Vec<String>> {
        (**self).process_args(pid)
    }

    fn process_path(&self, pid: i32) -> Option<String> {
        (**self).process_path(pid)
    }

    fn timebase(&self) -> Timebase {
        (**self).timebase()
    }
}
