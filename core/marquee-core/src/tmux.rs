//! tmux control interface.
//!
//! The adapter trait exists so handler logic can be tested with a recording
//! fake; the real implementation shells out to `tmux`. Failures collapse to
//! no-ops: a missing or broken tmux never fails the hook, the window title
//! just stays as it was.

use std::process::Command;

/// Terminal-multiplexer operations the session namer needs.
pub trait TmuxAdapter {
    /// Renames the window containing `pane_id`.
    fn rename_window(&self, pane_id: &str, title: &str) -> Result<(), String>;
}

/// Adapter backed by the `tmux` binary.
#[derive(Debug, Clone, Default)]
pub struct CommandTmuxAdapter;

impl TmuxAdapter for CommandTmuxAdapter {
    fn rename_window(&self, pane_id: &str, title: &str) -> Result<(), String> {
        run_tmux(["rename-window", "-t", pane_id, title]).map(|_| ())
    }
}

/// Returns the pane ID this hook invocation runs in, or None when not
/// inside tmux. Claude Code inherits `TMUX_PANE` from the shell it was
/// launched from.
pub fn current_pane() -> Option<String> {
    if std::env::var("TMUX").is_err() {
        return None;
    }
    std::env::var("TMUX_PANE")
        .ok()
        .filter(|value| !value.is_empty())
}

fn run_tmux<const N: usize>(args: [&str; N]) -> Result<String, String> {
    match Command::new("tmux").args(args).output() {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => Err(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
pub mod test_support {
    use super::TmuxAdapter;
    use std::sync::{Arc, Mutex};

    /// Records rename calls instead of touching tmux.
    #[derive(Clone, Default)]
    pub struct RecordingTmuxAdapter {
        pub renames: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl RecordingTmuxAdapter {
        pub fn renames(&self) -> Vec<(String, String)> {
            self.renames.lock().expect("lock renames").clone()
        }
    }

    impl TmuxAdapter for RecordingTmuxAdapter {
        fn rename_window(&self, pane_id: &str, title: &str) -> Result<(), String> {
            self.renames
                .lock()
                .expect("lock renames")
                .push((pane_id.to_string(), title.to_string()));
            Ok(())
        }
    }
}
