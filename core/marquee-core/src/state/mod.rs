//! Per-session state on local disk.
//!
//! Each handler invocation is a short-lived process, so every piece of
//! shared mutable state lives under `~/.marquee/`:
//!
//! ```text
//! ~/.marquee/
//! ├── sessions/{session_id}/
//! │   ├── .lock            # advisory lock guarding this directory
//! │   ├── first_message    # "1" once the first prompt was processed
//! │   ├── events.log       # one line per recent prompt/tool event
//! │   ├── summary.pid      # { pid, proc_started } of the active worker
//! │   └── summary.input    # spool text handed to the worker
//! └── panes.json           # pane id -> active session binding
//! ```
//!
//! Concurrency hazards come from overlapping handler invocations for the
//! same session (two rapid prompts, a Stop racing a prompt). The session
//! lock scopes read-check-write sequences; everything else tolerates
//! last-writer-wins.
//!
//! Session directories are never garbage-collected after a session ends.
//! That matches the behavior this tool replaces; only the pane binding is
//! removed on SessionEnd.

pub(crate) mod lock;
mod panes;
pub(crate) mod proc;
mod session;

pub use lock::SessionLock;
pub use panes::{PaneBinding, PaneMap};
pub use proc::{is_pid_alive, process_start_time, terminate_verified};
pub use session::{PendingWorker, SessionStore};
