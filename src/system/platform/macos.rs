use std::cell::RefCell;
use std::ffi::CString;
use std::mem;
use std::ptr;

use libproc::libproc::proc_pid::{pidinfo, pidpath};
use libproc::libproc::task_info::TaskInfo as ProcTaskInfo;
use libproc::processes::{ProcFilter, pids_by_type};

use super::procargs::parse_procargs2;
use super::{ProcessInfoProvider, SwapTotals, TaskInfo, Timebase, VmCounters};

// Used when kern.argmax cannot be read.
const DEFAULT_ARG_MAX: usize = 256 * 1024;

pub struct MacProvider {
    host: libc::mach_port_t,
    page_size: u64,
    timebase: Timebase,
    // Reused across pids; KERN_PROCARGS2 needs an argmax-sized buffer.
    args_buf: RefCell<Vec<u8>>,
}

impl Default for MacProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MacProvider {
    #[allow(deprecated)]
    pub fn new() -> Self {
        let host = unsafe { libc::mach_host_self() };
        let page_size = match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
            n if n > 0 => n as u64,
            _ => 4096,
        };
        let arg_max = sysctl_mib::<libc::c_int>(&mut [libc::CTL_KERN, libc::KERN_ARGMAX])
            .filter(|&n| n > 0)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_ARG_MAX);

        MacProvider {
            host,
            page_size,
            timebase: read_timebase(),
            args_buf: RefCell::new(vec![0; arg_max]),
        }
    }
}

impl ProcessInfoProvider for MacProvider {
    fn vm_counters(&self) -> Option<VmCounters> {
        let mut stats: libc::vm_statistics64 = unsafe { mem::zeroed() };
        let mut count = libc::HOST_VM_INFO64_COUNT;
        let rc = unsafe {
            libc::host_statistics64(
                self.host,
                libc::HOST_VM_INFO64,
                &mut stats as *mut libc::vm_statistics64 as libc::host_info64_t,
                &mut count,
            )
        };
        if rc != libc::KERN_SUCCESS {
            return None;
        }

        Some(VmCounters {
            page_size: self.page_size,
            // free_count excludes speculative pages, which are reclaimable.
            free_pages: u64::from(stats.free_count) + u64::from(stats.speculative_count),
            active_pages: u64::from(stats.active_count),
            inactive_pages: u64::from(stats.inactive_count),
            wired_pages: u64::from(stats.wire_count),
            compressed_pages: u64::from(stats.compressor_page_count),
            swap_ins: stats.swapins,
            swap_outs: stats.swapouts,
        })
    }

    fn total_memory(&self) -> Option<u64> {
        sysctl_by_name::<u64>("hw.memsize").filter(|&n| n > 0)
    }

    fn pressure_metric(&self) -> Option<i32> {
        sysctl_by_name::<libc::c_int>("vm.memory_pressure")
    }

    fn swap_totals(&self) -> Option<SwapTotals> {
        let usage = sysctl_by_name::<libc::xsw_usage>("vm.swapusage")?;
        Some(SwapTotals {
            total: usage.xsu_total,
            used: usage.xsu_used,
            free: usage.xsu_avail,
        })
    }

    fn list_pids(&self) -> Option<Vec<i32>> {
        let pids = pids_by_type(ProcFilter::All).ok()?;
        Some(pids.into_iter().map(|pid| pid as i32).collect())
    }

    fn task_info(&self, pid: i32) -> Option<TaskInfo> {
        let info = pidinfo::<ProcTaskInfo>(pid, 0).ok()?;
        Some(TaskInfo {
            resident_bytes: info.pti_resident_size,
            virtual_bytes: info.pti_virtual_size,
            cpu_ticks: info.pti_total_user.saturating_add(info.pti_total_system),
        })
    }

    fn process_args(&self, pid: i32) -> Option<Vec<String>> {
        let mut buf = self.args_buf.borrow_mut();
        let mut mib = [libc::CTL_KERN, libc::KERN_PROCARGS2, pid];
        let mut len = buf.len();
        let rc = unsafe {
            libc::sysctl(
                mib.as_mut_ptr(),
                mib.len() as libc::c_uint,
                buf.as_mut_ptr() as *mut libc::c_void,
                &mut len,
                ptr::null_mut(),
                0,
            )
        };
        if rc != 0 {
            return None;
        }
        parse_procargs2(&buf[..len.min(buf.len())])
    }

    fn process_path(&self, pid: i32) -> Option<String> {
        pidpath(pid).ok().filter(|path| !path.is_empty())
    }

    fn timebase(&self) -> Timebase {
        self.timebase
    }
}

#[allow(deprecated)]
fn read_timebase() -> Timebase {
    let mut info = libc::mach_timebase_info_data_t { numer: 0, denom: 0 };
    let rc = unsafe { libc::mach_timebase_info(&mut info) };
    if rc != 0 || info.numer == 0 || info.denom == 0 {
        return Timebase::NANOSECONDS;
    }
    Timebase {
        numer: info.numer,
        denom: info.denom,
    }
}

/// Read a fixed-size sysctl value by name. `T` must be plain old data.
fn sysctl_by_name<T: Copy>(name: &str) -> Option<T> {
    let cname = CString::new(name).ok()?;
    let mut value: T = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<T>();
    let rc = unsafe {
        libc::sysctlbyname(
            cname.as_ptr(),
            &mut value as *mut T as *mut libc::c_void,
            &mut len,
            ptr::null_mut(),
            0,
        )
    };
    if rc != 0 || len != mem::size_of::<T>() {
        return None;
    }
    Some(value)
}

fn sysctl_mib<T: Copy>(mib: &mut [libc::c_int]) -> Option<T> {
    let mut value: T = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<T>();
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            &mut value as *mut T as *mut libc::c_void,
            &mut len,
            ptr::null_mut(),
            0,
        )
    };
    if rc != 0 || len != mem::size_of::<T>() {
        return None;
    }
    Some(value)
}
