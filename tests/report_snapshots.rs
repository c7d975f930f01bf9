use insta::assert_snapshot;
use membar::report::{render_json, render_text};
use membar::system::memory::{HostMemory, MemoryPressure, SwapUsage};
use membar::system::process::{ProcessSample, SortColumn};
use membar::system::snapshot::MemorySnapshot;
use serde_json::Value;

const GB: u64 = 1024 * 1024 * 1024;

fn mock_process(pid: i32, name: &str, resident: u64, cpu: f64) -> ProcessSample {
    ProcessSample {
        pid,
        resident_bytes: resident,
        virtual_bytes: resident * 8,
        memory_percent: ProcessSample::memory_percent_of(resident, 16 * GB),
        cpu_percent: cpu,
        display_name: name.to_string(),
    }
}

fn mock_snapshot() -> MemorySnapshot {
    MemorySnapshot {
        memory: HostMemory {
            total: 16 * GB,
            used: 12 * GB,
            free: 4 * GB,
            active: 6 * GB,
            inactive: 3 * GB,
            wired: 2 * GB,
            compressed: GB,
            anonymous: 9 * GB,
            file_backed: 3 * GB,
            app_physical: 6 * GB,
            app_virtual: 48 * GB,
        },
        memory_pressure: MemoryPressure::Warning,
        swap: SwapUsage {
            total: 4 * GB,
            used: GB,
            free: 3 * GB,
            utilization_percent: 25.0,
            swap_ins: 300,
            swap_outs: 600,
        },
        top_processes: vec![
            mock_process(977, "python3 train.py", 4 * GB, 97.5),
            mock_process(412, "WindowServer", 2 * GB, 14.2),
        ],
        process_count: 412,
        sort_column: SortColumn::MemoryPercent,
        descending: true,
    }
}

#[test]
fn text_report_layout() {
    let output = render_text(&mock_snapshot());
    assert_snapshot!(output.trim_end(), @r"
Memory: 12.0 GB used / 16.0 GB total (75.0%), 4.0 GB free, pressure Warning
Active 6.0 GB, inactive 3.0 GB, wired 2.0 GB, compressed 1.0 GB
Swap: 1.0 GB used / 4.0 GB total (25.0%), 300 ins, 600 outs
Top 2 of 412 processes by MEM% desc

    PID   MEM%       RSS      VIRT   CPU%  COMMAND
    977  25.0%    4.0 GB   32.0 GB  97.5%  python3 train.py
    412  12.5%    2.0 GB   16.0 GB  14.2%  WindowServer
");
}

#[test]
fn text_report_with_no_processes() {
    let mut snapshot = mock_snapshot();
    snapshot.top_processes.clear();
    snapshot.process_count = 0;
    snapshot.sort_column = SortColumn::Command;
    snapshot.descending = false;

    let output = render_text(&snapshot);
    assert!(output.contains("Top 0 of 0 processes by COMMAND asc"));
    assert!(output.ends_with("COMMAND\n"));
}

#[test]
fn json_report_fields() {
    let json = render_json(&mock_snapshot()).expect("serialize snapshot");
    let value: Value = serde_json::from_str(&json).expect("parse snapshot json");

    assert_eq!(value["memory_pressure"], "warning");
    assert_eq!(value["sort_column"], "memory_percent");
    assert_eq!(value["descending"], true);
    assert_eq!(value["process_count"], 412);
    assert_eq!(value["memory"]["total"], 16 * GB);
    assert_eq!(value["swap"]["swap_outs"], 600);

    let top = value["top_processes"].as_array().expect("top_processes array");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["pid"], 977);
    assert_eq!(top[0]["display_name"], "python3 train.py");
    assert_eq!(top[1]["memory_percent"], 12.5);
}
