//! Development provider: lets the crate build and its tests run on Linux.
//!
//! Process data, total memory, free memory and swap come from sysinfo.
//! The active/inactive/unevictable/zswap split is not exposed there, so
//! `/proc/meminfo` is read once per refresh for those fields. It reports KiB,
//! so the page unit here is 1024 bytes.

use std::collections::HashMap;

use sysinfo::{MemoryRefreshKind, Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use super::{ProcessInfoProvider, SwapTotals, TaskInfo, Timebase, VmCounters};

const KIB: u64 = 1024;

// sysinfo reports accumulated CPU time in milliseconds.
const MILLISECONDS: Timebase = Timebase {
    numer: 1_000_000,
    denom: 1,
};

pub struct LinuxProvider {
    sys: System,
    // `/proc/meminfo` and `/proc/vmstat` as of the last refresh.
    meminfo: HashMap<String, u64>,
    vmstat: HashMap<String, u64>,
}

impl Default for LinuxProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxProvider {
    pub fn new() -> Self {
        LinuxProvider {
            sys: System::new(),
            meminfo: HashMap::new(),
            vmstat: HashMap::new(),
        }
    }

    fn process(&self, pid: i32) -> Option<&sysinfo::Process> {
        let pid = u32::try_from(pid).ok()?;
        self.sys.process(Pid::from_u32(pid))
    }
}

impl ProcessInfoProvider for LinuxProvider {
    fn refresh(&mut self) {
        self.sys
            .refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram().with_swap());
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing()
                .with_memory()
                .with_cpu()
                .with_cmd(UpdateKind::OnlyIfNotSet)
                .with_exe(UpdateKind::OnlyIfNotSet),
        );
        self.meminfo = read_kv_file("/proc/meminfo");
        self.vmstat = read_kv_file("/proc/vmstat");
    }

    fn vm_counters(&self) -> Option<VmCounters> {
        if self.sys.total_memory() == 0 {
            return None;
        }
        counters_from(&self.meminfo, &self.vmstat, self.sys.free_memory())
    }

    fn total_memory(&self) -> Option<u64> {
        Some(self.sys.total_memory()).filter(|&n| n > 0)
    }

    fn pressure_metric(&self) -> Option<i32> {
        // PSI is a stall percentage, not the Darwin pressure scale.
        None
    }

    fn swap_totals(&self) -> Option<SwapTotals> {
        if self.sys.total_memory() == 0 {
            return None;
        }
        Some(swap_from(self.sys.total_swap(), self.sys.free_swap()))
    }

    fn list_pids(&self) -> Option<Vec<i32>> {
        let pids = self
            .sys
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .filter_map(|(pid, _)| i32::try_from(pid.as_u32()).ok())
            .collect();
        Some(pids)
    }

    fn task_info(&self, pid: i32) -> Option<TaskInfo> {
        let process = self.process(pid)?;
        Some(TaskInfo {
            resident_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
            cpu_ticks: process.accumulated_cpu_time(),
        })
    }

    fn process_args(&self, pid: i32) -> Option<Vec<String>> {
        let cmd = self.process(pid)?.cmd();
        if cmd.is_empty() {
            return None;
        }
        Some(
            cmd.iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
        )
    }

    fn process_path(&self, pid: i32) -> Option<String> {
        let exe = self.process(pid)?.exe()?;
        let path = exe.to_string_lossy().into_owned();
        if path.is_empty() { None } else { Some(path) }
    }

    fn timebase(&self) -> Timebase {
        MILLISECONDS
    }
}

fn read_kv_file(path: &str) -> HashMap<String, u64> {
    std::fs::read_to_string(path)
        .map(|contents| parse_kv_file(&contents))
        .unwrap_or_default()
}

/// Parse `Key: value [kB]` or `key value` lines into a map.
fn parse_kv_file(contents: &str) -> HashMap<String, u64> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        if let Ok(value) = value.parse() {
            map.insert(key.trim_end_matches(':').to_string(), value);
        }
    }
    map
}

/// Page counters in KiB pages. `free_bytes` comes from sysinfo; the rest of
/// the breakdown from meminfo, which must at least carry `Active`.
fn counters_from(
    meminfo: &HashMap<String, u64>,
    vmstat: &HashMap<String, u64>,
    free_bytes: u64,
) -> Option<VmCounters> {
    let field = |key: &str| meminfo.get(key).copied().unwrap_or(0);
    if !meminfo.contains_key("Active") {
        return None;
    }
    Some(VmCounters {
        page_size: KIB,
        free_pages: free_bytes / KIB,
        active_pages: field("Active"),
        inactive_pages: field("Inactive"),
        wired_pages: field("Unevictable"),
        compressed_pages: field("Zswap"),
        swap_ins: vmstat.get("pswpin").copied().unwrap_or(0),
        swap_outs: vmstat.get("pswpout").copied().unwrap_or(0),
    })
}

fn swap_from(total: u64, free: u64) -> SwapTotals {
    SwapTotals {
        total,
        used: total.saturating_sub(free),
        free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "\
MemTotal:       16303428 kB
MemFree:         2038112 kB
MemAvailable:    9871344 kB
Active:          6192480 kB
Inactive:        5411904 kB
Unevictable:       40960 kB
SwapTotal:       2097148 kB
SwapFree:        1572860 kB
Zswap:              1024 kB
";

    const VMSTAT: &str = "\
nr_free_pages 509528
pswpin 1200
pswpout 3400
";

    #[test]
    fn counters_use_kib_pages() {
        let meminfo = parse_kv_file(MEMINFO);
        let vmstat = parse_kv_file(VMSTAT);
        let counters = counters_from(&meminfo, &vmstat, 2_038_112 * 1024).unwrap();
        assert_eq!(counters.page_size, 1024);
        assert_eq!(counters.free_pages, 2_038_112);
        assert_eq!(counters.active_pages, 6_192_480);
        assert_eq!(counters.inactive_pages, 5_411_904);
        assert_eq!(counters.wired_pages, 40_960);
        assert_eq!(counters.compressed_pages, 1024);
        assert_eq!(counters.swap_ins, 1200);
        assert_eq!(counters.swap_outs, 3400);
    }

    #[test]
    fn swap_used_is_total_minus_free() {
        let swap = swap_from(2_097_148 * 1024, 1_572_860 * 1024);
        assert_eq!(swap.used, (2_097_148 - 1_572_860) * 1024);
        // Free above total (racy counters) must not underflow.
        assert_eq!(swap_from(10, 20).used, 0);
    }

    #[test]
    fn refresh_populates_host_memory() {
        let mut provider = LinuxProvider::new();
        provider.refresh();
        let total = provider.total_memory().expect("total memory");
        let counters = provider.vm_counters().expect("vm counters");
        assert!(counters.free_pages * KIB <= total);
        assert!(provider.meminfo.contains_key("MemTotal"));
        assert!(provider.swap_totals().is_some());
    }

    #[test]
    fn missing_fields_degrade() {
        let empty = parse_kv_file("garbage line\n");
        assert!(empty.is_empty());
        assert!(counters_from(&empty, &HashMap::new(), 1024).is_none());
        assert!(LinuxProvider::new().vm_counters().is_none());
    }
}
