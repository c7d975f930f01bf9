use serde::Serialize;

use super::memory::{HostMemory, MemoryPressure, SwapUsage};
use super::process::{ProcessSample, SortColumn};

/// One sampler pass: host memory, swap and the ranked top processes.
#[derive(Clone, Debug, Serialize)]
pub struct MemorySnapshot {
    pub memory: HostMemory,
    pub memory_pressure: MemoryPressure,
    pub swap: SwapUsage,
    pub top_processes: Vec<ProcessSample>,
    /// Processes sampled successfully, before ranking.
    pub process_count: usize,
    pub sort_column: SortColumn,
    pub descending: bool,
}
