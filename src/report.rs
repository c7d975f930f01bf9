//! Plain-text and JSON renderings of a snapshot, for `--once`.

use std::fmt::Write;

use crate::format::{format_bytes, format_percent};
use crate::system::snapshot::MemorySnapshot;

pub fn render_text(snapshot: &MemorySnapshot) -> String {
    let mem = &snapshot.memory;
    let swap = &snapshot.swap;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Memory: {} used / {} total ({}), {} free, pressure {}",
        format_bytes(mem.used),
        format_bytes(mem.total),
        format_percent(mem.used_percent()),
        format_bytes(mem.free),
        snapshot.memory_pressure.label(),
    );
    let _ = writeln!(
        out,
        "Active {}, inactive {}, wired {}, compressed {}",
        format_bytes(mem.active),
        format_bytes(mem.inactive),
        format_bytes(mem.wired),
        format_bytes(mem.compressed),
    );
    let _ = writeln!(
        out,
        "Swap: {} used / {} total ({}), {} ins, {} outs",
        format_bytes(swap.used),
        format_bytes(swap.total),
        format_percent(swap.utilization_percent),
        swap.swap_ins,
        swap.swap_outs,
    );
    let direction = if snapshot.descending { "desc" } else { "asc" };
    let _ = writeln!(
        out,
        "Top {} of {} processes by {} {}",
        snapshot.top_processes.len(),
        snapshot.process_count,
        snapshot.sort_column.label(),
        direction,
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>7} {:>6} {:>9} {:>9} {:>6}  COMMAND",
        "PID", "MEM%", "RSS", "VIRT", "CPU%"
    );
    for p in &snapshot.top_processes {
        let _ = writeln!(
            out,
            "{:>7} {:>6} {:>9} {:>9} {:>6}  {}",
            p.pid,
            format_percent(p.memory_percent),
            format_bytes(p.resident_bytes),
            format_bytes(p.virtual_bytes),
            format_percent(p.cpu_percent),
            p.display_name,
        );
    }
    out
}

pub fn render_json(snapshot: &MemorySnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}
