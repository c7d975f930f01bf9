use std::cmp::Ordering;

use serde::Serialize;

/// How many of the largest processes (by resident memory) a snapshot keeps.
pub const TOP_PROCESS_LIMIT: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessSample {
    pub pid: i32,
    pub resident_bytes: u64,
    pub virtual_bytes: u64,
    pub memory_percent: f64,
    pub cpu_percent: f64,
    pub display_name: String,
}

impl ProcessSample {
    pub fn memory_percent_of(resident_bytes: u64, total_memory: u64) -> f64 {
        if total_memory == 0 {
            return 0.0;
        }
        (resident_bytes as f64 / total_memory as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Pid,
    #[default]
    MemoryPercent,
    MemoryBytes,
    VirtualMemory,
    CpuPercent,
    Command,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Pid,
        SortColumn::MemoryPercent,
        SortColumn::MemoryBytes,
        SortColumn::VirtualMemory,
        SortColumn::CpuPercent,
        SortColumn::Command,
    ];

    pub fn next(self) -> Self {
        match self {
            SortColumn::Pid => SortColumn::MemoryPercent,
            SortColumn::MemoryPercent => SortColumn::MemoryBytes,
            SortColumn::MemoryBytes => SortColumn::VirtualMemory,
            SortColumn::VirtualMemory => SortColumn::CpuPercent,
            SortColumn::CpuPercent => SortColumn::Command,
            SortColumn::Command => SortColumn::Pid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Pid => "PID",
            SortColumn::MemoryPercent => "MEM%",
            SortColumn::MemoryBytes => "RSS",
            SortColumn::VirtualMemory => "VIRT",
            SortColumn::CpuPercent => "CPU%",
            SortColumn::Command => "COMMAND",
        }
    }

    pub fn from_str_config(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pid" => Some(SortColumn::Pid),
            "memory" | "mem" | "memory_percent" => Some(SortColumn::MemoryPercent),
            "memory_bytes" | "rss" | "resident" => Some(SortColumn::MemoryBytes),
            "virtual" | "virt" | "virtual_memory" => Some(SortColumn::VirtualMemory),
            "cpu" | "cpu_percent" => Some(SortColumn::CpuPercent),
            "command" | "name" => Some(SortColumn::Command),
            _ => None,
        }
    }

    /// Ascending order of two samples on this column.
    pub fn compare(self, a: &ProcessSample, b: &ProcessSample) -> Ordering {
        match self {
            SortColumn::Pid => a.pid.cmp(&b.pid),
            SortColumn::MemoryPercent => a.memory_percent.total_cmp(&b.memory_percent),
            SortColumn::MemoryBytes => a.resident_bytes.cmp(&b.resident_bytes),
            SortColumn::VirtualMemory => a.virtual_bytes.cmp(&b.virtual_bytes),
            SortColumn::CpuPercent => a.cpu_percent.total_cmp(&b.cpu_percent),
            SortColumn::Command => a
                .display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase()),
        }
    }
}

/// Sort in place by `column`. The sort is stable.
pub fn sort_processes(processes: &mut [ProcessSample], column: SortColumn, descending: bool) {
    if column == SortColumn::Command {
        // Lowercase once per element rather than once per comparison.
        processes.sort_by_cached_key(|p| p.display_name.to_lowercase());
        if descending {
            processes.reverse();
        }
        return;
    }
    if descending {
        processes.sort_by(|a, b| column.compare(b, a));
    } else {
        processes.sort_by(|a, b| column.compare(a, b));
    }
}

/// Keep the [`TOP_PROCESS_LIMIT`] largest processes by memory, then order
/// them as requested.
///
/// Membership never depends on the requested column: sorting only reorders
/// the top memory consumers. Memory ties are broken by lower pid.
pub fn rank_processes(
    mut processes: Vec<ProcessSample>,
    column: SortColumn,
    descending: bool,
) -> Vec<ProcessSample> {
    processes.sort_by(|a, b| {
        b.memory_percent
            .total_cmp(&a.memory_percent)
            .then_with(|| a.pid.cmp(&b.pid))
    });
    processes.truncate(TOP_PROCESS_LIMIT);

    if !(column == SortColumn::MemoryPercent && descending) {
        sort_processes(&mut processes, column, descending);
    }
    processes
}
