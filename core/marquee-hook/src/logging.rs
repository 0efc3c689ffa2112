//! File-based tracing for hook invocations.
//!
//! Hook stdout belongs to the host's pass-through pipeline, so nothing may
//! log there. Everything goes to `~/.marquee/logs/marquee-hook.log` through
//! a non-blocking appender; `MARQUEE_DEBUG_LOG=1` raises the filter to
//! debug.

use std::env;

use fs_err as fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub fn init() -> Option<WorkerGuard> {
    let log_dir = dirs::home_dir()?.join(".marquee/logs");
    fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(&log_dir, "marquee-hook.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let debug_enabled = env::var("MARQUEE_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
