//! The session namer: lifecycle events in, at most one window rename out.
//!
//! ## Event → action mapping
//!
//! ```text
//! UserPromptSubmit  → first prompt: rename (short) or spawn worker (long)
//!                     later prompts: append to event log
//! PreToolUse        → append tool description to event log
//! PostToolUse       → ignored
//! Stop              → cancel pending worker, summarize recent events
//! SessionEnd        → reset title if this session owns the pane
//! ```
//!
//! The tmux side and the worker spawn are behind traits so tests can inject
//! recording fakes; the binary wires in the real adapters.

use std::path::{Path, PathBuf};

use crate::config::MarqueeConfig;
use crate::error::Result;
use crate::event::{HookEvent, HookInput};
use crate::label;
use crate::state::{PaneMap, SessionStore};
use crate::tmux::TmuxAdapter;

/// What a spawned summary worker should do after a successful summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerMode {
    /// Summarizing a long first prompt; just rename.
    Prompt,
    /// Summarizing recent activity on Stop; rename and clear the event log.
    Stop,
}

/// Launches detached summary workers. The real implementation re-execs the
/// hook binary with a hidden subcommand; tests record the request.
pub trait WorkerSpawner {
    /// Spawns a detached worker for `session_id` targeting `pane_id`.
    /// Returns the worker's PID. The worker reads its input text from the
    /// session's spool file.
    fn spawn_worker(&self, session_id: &str, pane_id: &str, mode: WorkerMode) -> Result<u32>;
}

/// Everything one hook invocation needs to handle an event.
pub struct Handler<'a, T: TmuxAdapter, W: WorkerSpawner> {
    config: &'a MarqueeConfig,
    base_dir: &'a Path,
    tmux: &'a T,
    spawner: &'a W,
    pane_id: String,
}

impl<'a, T: TmuxAdapter, W: WorkerSpawner> Handler<'a, T, W> {
    pub fn new(
        config: &'a MarqueeConfig,
        base_dir: &'a Path,
        tmux: &'a T,
        spawner: &'a W,
        pane_id: impl Into<String>,
    ) -> Self {
        Handler {
            config,
            base_dir,
            tmux,
            spawner,
            pane_id: pane_id.into(),
        }
    }

    fn sessions_dir(&self) -> PathBuf {
        self.base_dir.join("sessions")
    }

    fn store(&self, session_id: &str) -> SessionStore {
        SessionStore::open(&self.sessions_dir(), session_id)
    }

    fn panes(&self) -> PaneMap {
        PaneMap::new(self.base_dir)
    }

    /// Handles one parsed hook input. Errors are for the caller to log;
    /// nothing here is fatal to the hook pipeline.
    pub fn handle(&self, input: &HookInput) -> Result<()> {
        let Some(session_id) = input
            .session_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        else {
            tracing::debug!(
                event = %input.hook_event_name,
                "Skipping event (missing session_id)"
            );
            return Ok(());
        };

        match input.to_event() {
            HookEvent::UserPromptSubmit { prompt } => self.on_prompt_submit(session_id, &prompt),
            HookEvent::PreToolUse {
                tool_name,
                tool_input,
            } => self.on_pre_tool_use(session_id, &tool_name, &tool_input),
            HookEvent::PostToolUse => Ok(()),
            HookEvent::Stop { stop_hook_active } => self.on_stop(session_id, stop_hook_active),
            HookEvent::SessionEnd => self.on_session_end(session_id),
            HookEvent::Unknown { event_name } => {
                tracing::debug!(event_name = %event_name, "Unhandled event");
                Ok(())
            }
        }
    }

    fn on_prompt_submit(&self, session_id: &str, prompt: &str) -> Result<()> {
        // Guard runs before the pane binding: a prompt we generated must
        // never claim the pane for its session.
        if label::is_self_summary_prompt(prompt) {
            tracing::debug!(session = %session_id, "Skipping our own summarization prompt");
            return Ok(());
        }

        self.panes().bind(&self.pane_id, session_id)?;

        let store = self.store(session_id);
        if !store.mark_first_message()? {
            store.append_event(&format!("prompt: {}", prompt))?;
            return Ok(());
        }

        if label::is_short_prompt(self.config, prompt) {
            let title = label::label_from_text(self.config, prompt);
            if let Err(err) = self.tmux.rename_window(&self.pane_id, &title) {
                tracing::warn!(error = %err, pane = %self.pane_id, "Window rename failed");
            }
            return Ok(());
        }

        // Long first prompt: summarize out-of-band, newest launch wins.
        store.write_summary_input(prompt)?;
        store.cancel_pending_worker();
        match self
            .spawner
            .spawn_worker(session_id, &self.pane_id, WorkerMode::Prompt)
        {
            Ok(pid) => store.record_worker(pid)?,
            Err(err) => {
                tracing::warn!(error = %err, session = %session_id, "Worker spawn failed")
            }
        }
        Ok(())
    }

    fn on_pre_tool_use(
        &self,
        session_id: &str,
        tool_name: &str,
        tool_input: &serde_json::Value,
    ) -> Result<()> {
        let Some(description) = label::describe_tool(tool_name, tool_input) else {
            return Ok(());
        };
        self.store(session_id).append_event(&description)
    }

    fn on_stop(&self, session_id: &str, stop_hook_active: bool) -> Result<()> {
        if stop_hook_active {
            return Ok(());
        }

        let store = self.store(session_id);
        if !store.first_message_set() {
            return Ok(());
        }

        store.cancel_pending_worker();

        let events = store.recent_events(self.config.recent_events);
        if events.is_empty() {
            return Ok(());
        }

        store.write_summary_input(&events.join("\n"))?;
        match self
            .spawner
            .spawn_worker(session_id, &self.pane_id, WorkerMode::Stop)
        {
            Ok(pid) => store.record_worker(pid)?,
            Err(err) => {
                tracing::warn!(error = %err, session = %session_id, "Worker spawn failed")
            }
        }
        Ok(())
    }

    fn on_session_end(&self, session_id: &str) -> Result<()> {
        if self.panes().unbind_if(&self.pane_id, session_id)? {
            if let Err(err) = self
                .tmux
                .rename_window(&self.pane_id, &self.config.default_title)
            {
                tracing::warn!(error = %err, pane = %self.pane_id, "Title reset failed");
            }
        }
        Ok(())
    }
}
