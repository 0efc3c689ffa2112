//! Process liveness and verified termination.
//!
//! Operating systems reuse PIDs. A `summary.pid` file recorded minutes ago
//! might point at an unrelated process by the time we cancel it, so every
//! recorded PID carries the process start time and a signal is only sent
//! when the start time still matches (±2 seconds tolerance).

use std::cell::RefCell;
use std::time::Instant;

// Thread-local sysinfo cache with per-PID refresh (O(1)) instead of a full
// process table scan.
thread_local! {
    static SYSTEM_CACHE: RefCell<Option<(sysinfo::System, Instant)>> = const { RefCell::new(None) };
}

pub fn is_pid_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        // SAFETY: kill(pid, 0) only performs a permission/existence check.
        #[allow(unsafe_code)]
        unsafe {
            libc::kill(pid as i32, 0) == 0
        }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Get the start time of a process (Unix timestamp).
/// Returns None if the process doesn't exist or can't be queried.
pub fn process_start_time(pid: u32) -> Option<u64> {
    use sysinfo::{Pid, ProcessRefreshKind, System};

    SYSTEM_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        let (sys, _) = cache.get_or_insert_with(|| (System::new(), Instant::now()));

        let sysinfo_pid = Pid::from(pid as usize);
        sys.refresh_process_specifics(sysinfo_pid, ProcessRefreshKind::new());

        sys.process(sysinfo_pid).map(|process| process.start_time())
    })
}

/// Returns true if `pid` is alive and, when `expected_start` is known, still
/// the same process it was when recorded.
pub fn is_pid_alive_verified(pid: u32, expected_start: Option<u64>) -> bool {
    if !is_pid_alive(pid) {
        return false;
    }

    let Some(expected) = expected_start else {
        return true;
    };

    match process_start_time(pid) {
        // ±2s tolerance for clock rounding between record and query.
        Some(actual) => actual.abs_diff(expected) <= 2,
        None => false,
    }
}

/// Sends SIGTERM to `pid` if it is still the recorded process.
/// Returns true if a signal was actually sent.
pub fn terminate_verified(pid: u32, expected_start: Option<u64>) -> bool {
    if !is_pid_alive_verified(pid, expected_start) {
        return false;
    }

    #[cfg(unix)]
    {
        // SAFETY: sending SIGTERM to a verified-live PID.
        #[allow(unsafe_code)]
        unsafe {
            libc::kill(pid as i32, libc::SIGTERM) == 0
        }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
