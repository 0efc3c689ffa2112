//! Detached summary worker.
//!
//! Spawned by the `handle` command when a label needs the summarizer: a
//! long first prompt, or recent activity on Stop. Reads the spooled text
//! from the session directory, runs the external summarization command with
//! a deadline, and renames the target window if it got a usable line back.
//!
//! ## Lifecycle
//!
//! 1. Spawned detached with stdio nulled and `MARQUEE_SUMMARY_GEN=1`
//! 2. The spawning handler records this PID; a newer launch or a Stop may
//!    SIGTERM it at any point, which is fine - the title simply stays
//! 3. On success: rename, optionally clear the event log, drop own PID record

use marquee_core::summarize::run_summarizer;
use marquee_core::tmux::{CommandTmuxAdapter, TmuxAdapter};
use marquee_core::{label, load_config, marquee_dir, SessionStore};

pub fn run(session_id: &str, pane_id: &str, clear_log: bool) {
    let Some(base_dir) = marquee_dir() else {
        tracing::warn!("Cannot determine home directory, worker exiting");
        return;
    };

    let config = load_config();
    let store = SessionStore::open(&base_dir.join("sessions"), session_id);

    let Some(text) = store.read_summary_input() else {
        tracing::debug!(session = %session_id, "No spooled summary input, worker exiting");
        return;
    };

    let Some(summary) = run_summarizer(&config, &text) else {
        tracing::debug!(session = %session_id, "Summarizer produced nothing, title untouched");
        store.clear_worker_if(std::process::id());
        return;
    };

    let title = label::label_from_text(&config, &summary);
    match CommandTmuxAdapter.rename_window(pane_id, &title) {
        Ok(()) => {
            tracing::debug!(session = %session_id, pane = %pane_id, title = %title, "Window renamed");
            if clear_log {
                if let Err(err) = store.clear_events() {
                    tracing::warn!(error = %err, session = %session_id, "Failed to clear event log");
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, pane = %pane_id, "Window rename failed");
        }
    }

    store.clear_worker_if(std::process::id());
}
