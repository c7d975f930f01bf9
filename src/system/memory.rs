use serde::Serialize;

use super::platform::{SwapTotals, VmCounters};

// Kernel pressure metric thresholds, on its native integer scale.
const KERNEL_WARNING_LEVEL: i32 = 50;
const KERNEL_CRITICAL_LEVEL: i32 = 200;

// Free-memory percentages used when the kernel metric is unavailable.
const NORMAL_FREE_PERCENT: f64 = 20.0;
const WARNING_FREE_PERCENT: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryPressure {
    Normal,
    Warning,
    Critical,
}

impl MemoryPressure {
    pub fn from_kernel_level(level: i32) -> Self {
        if level >= KERNEL_CRITICAL_LEVEL {
            MemoryPressure::Critical
        } else if level >= KERNEL_WARNING_LEVEL {
            MemoryPressure::Warning
        } else {
            MemoryPressure::Normal
        }
    }

    pub fn from_free_percent(free_percent: f64) -> Self {
        if free_percent > NORMAL_FREE_PERCENT {
            MemoryPressure::Normal
        } else if free_percent > WARNING_FREE_PERCENT {
            MemoryPressure::Warning
        } else {
            MemoryPressure::Critical
        }
    }

    /// Prefer the kernel metric; otherwise judge by the free share of RAM.
    /// With neither a metric nor a known total there is nothing to judge,
    /// and the result is `Normal`.
    pub fn classify(kernel_level: Option<i32>, free_bytes: u64, total_bytes: u64) -> Self {
        match kernel_level {
            Some(level) => Self::from_kernel_level(level),
            None if total_bytes == 0 => MemoryPressure::Normal,
            None => Self::from_free_percent(free_bytes as f64 / total_bytes as f64 * 100.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MemoryPressure::Normal => "Normal",
            MemoryPressure::Warning => "Warning",
            MemoryPressure::Critical => "Critical",
        }
    }
}

/// Host-wide memory in bytes.
///
/// `anonymous` and `file_backed` are approximations: anonymous is taken as
/// active + inactive and file-backed as whatever remains of `used`. The
/// kernel counters used here do not separate the two any better.
/// `app_physical` and `app_virtual` only sum the ranked top processes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HostMemory {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub active: u64,
    pub inactive: u64,
    pub wired: u64,
    pub compressed: u64,
    pub anonymous: u64,
    pub file_backed: u64,
    pub app_physical: u64,
    pub app_virtual: u64,
}

impl HostMemory {
    /// Build from VM counters. Missing counters leave every page-derived
    /// field at zero.
    pub fn from_counters(counters: Option<&VmCounters>, total: u64) -> Self {
        let Some(c) = counters else {
            return HostMemory {
                total,
                ..Default::default()
            };
        };

        let bytes = |pages: u64| pages.saturating_mul(c.page_size);
        let active = bytes(c.active_pages);
        let inactive = bytes(c.inactive_pages);
        let wired = bytes(c.wired_pages);
        let compressed = bytes(c.compressed_pages);
        let used = active
            .saturating_add(inactive)
            .saturating_add(wired)
            .saturating_add(compressed);
        let anonymous = active.saturating_add(inactive);

        HostMemory {
            total,
            used,
            free: bytes(c.free_pages),
            active,
            inactive,
            wired,
            compressed,
            anonymous,
            file_backed: used.saturating_sub(anonymous),
            app_physical: 0,
            app_virtual: 0,
        }
    }

    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.used as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SwapUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub utilization_percent: f64,
    /// Pages swapped in since boot.
    pub swap_ins: u64,
    /// Pages swapped out since boot.
    pub swap_outs: u64,
}

impl SwapUsage {
    pub fn from_parts(totals: Option<SwapTotals>, counters: Option<&VmCounters>) -> Self {
        let totals = totals.unwrap_or_default();
        let utilization_percent = if totals.total > 0 {
            totals.used as f64 / totals.total as f64 * 100.0
        } else {
            0.0
        };
        SwapUsage {
            total: totals.total,
            used: totals.used,
            free: totals.free,
            utilization_percent,
            swap_ins: counters.map_or(0, |c| c.swap_ins),
            swap_outs: counters.map_or(0, |c| c.swap_outs),
        }
    }

    /// Swap-ins per swap-out. Display only: nothing classifies on it.
    pub fn efficiency(&self) -> Option<f64> {
        if self.swap_outs == 0 {
            return None;
        }
        Some(self.swap_ins as f64 / self.swap_outs as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn free_percent_heuristic() {
        assert_eq!(
            MemoryPressure::classify(None, 25 * GIB / 100, GIB),
            MemoryPressure::Normal
        );
        assert_eq!(
            MemoryPressure::classify(None, 15 * GIB / 100, GIB),
            MemoryPressure::Warning
        );
        assert_eq!(
            MemoryPressure::classify(None, 5 * GIB / 100, GIB),
            MemoryPressure::Critical
        );
    }

    #[test]
    fn heuristic_boundaries_are_exclusive() {
        assert_eq!(
            MemoryPressure::from_free_percent(20.0),
            MemoryPressure::Warning
        );
        assert_eq!(
            MemoryPressure::from_free_percent(10.0),
            MemoryPressure::Critical
        );
    }

    #[test]
    fn kernel_metric_wins_over_heuristic() {
        assert_eq!(
            MemoryPressure::classify(Some(0), 0, GIB),
            MemoryPressure::Normal
        );
        assert_eq!(
            MemoryPressure::classify(Some(49), GIB, GIB),
            MemoryPressure::Normal
        );
        assert_eq!(
            MemoryPressure::classify(Some(50), GIB, GIB),
            MemoryPressure::Warning
        );
        assert_eq!(
            MemoryPressure::classify(Some(199), GIB, GIB),
            MemoryPressure::Warning
        );
        assert_eq!(
            MemoryPressure::classify(Some(200), GIB, GIB),
            MemoryPressure::Critical
        );
    }

    #[test]
    fn unknown_total_without_metric_is_normal() {
        assert_eq!(MemoryPressure::classify(None, 0, 0), MemoryPressure::Normal);
    }

    #[test]
    fn host_memory_from_counters() {
        let counters = VmCounters {
            page_size: 16384,
            free_pages: 100,
            active_pages: 200,
            inactive_pages: 50,
            wired_pages: 30,
            compressed_pages: 20,
            swap_ins: 0,
            swap_outs: 0,
        };
        let mem = HostMemory::from_counters(Some(&counters), 400 * 16384);
        assert_eq!(mem.free, 100 * 16384);
        assert_eq!(mem.used, 300 * 16384);
        assert_eq!(mem.anonymous, 250 * 16384);
        assert_eq!(mem.file_backed, 50 * 16384);
        assert!((mem.used_percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn missing_counters_zero_fields() {
        let mem = HostMemory::from_counters(None, GIB);
        assert_eq!(mem.total, GIB);
        assert_eq!(mem.used, 0);
        assert_eq!(mem.free, 0);
        assert_eq!(mem.compressed, 0);
    }

    #[test]
    fn swap_utilization_and_counters() {
        let totals = SwapTotals {
            total: 4 * GIB,
            used: GIB,
            free: 3 * GIB,
        };
        let counters = VmCounters {
            swap_ins: 300,
            swap_outs: 600,
            ..Default::default()
        };
        let swap = SwapUsage::from_parts(Some(totals), Some(&counters));
        assert!((swap.utilization_percent - 25.0).abs() < 1e-9);
        assert_eq!(swap.swap_ins, 300);
        assert_eq!(swap.swap_outs, 600);
        assert_eq!(swap.efficiency(), Some(0.5));
    }

    #[test]
    fn failed_swap_query_zeroes_totals() {
        let swap = SwapUsage::from_parts(None, None);
        assert_eq!(swap, SwapUsage::default());
        assert_eq!(swap.efficiency(), None);
    }
}
