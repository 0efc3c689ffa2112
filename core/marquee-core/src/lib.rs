//! # marquee-core
//!
//! Core library for Marquee: derives a short label for "what this terminal
//! session is doing" from Claude Code lifecycle events and renames the
//! enclosing tmux window to it.
//!
//! ## Design Principles
//!
//! - **Synchronous**: each hook invocation is a short-lived process; the
//!   only out-of-band work is a detached summary worker.
//! - **Best effort**: every failure degrades to "leave the window title as
//!   it was"; nothing here may break the host's hook pipeline.
//! - **Single host, single user**: state is plain files under `~/.marquee/`
//!   guarded by advisory locks, not a service.

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod label;
pub mod state;
pub mod summarize;
pub mod tmux;

pub use config::{load_config, marquee_dir, MarqueeConfig};
pub use error::{MarqueeError, Result};
pub use event::{HookEvent, HookInput};
pub use handler::{Handler, WorkerMode, WorkerSpawner};
pub use state::{PaneMap, SessionStore};
pub use summarize::SUMMARY_GEN_ENV;
pub use tmux::{current_pane, CommandTmuxAdapter, TmuxAdapter};
