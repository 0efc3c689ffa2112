//! Event handler entry point.
//!
//! Reads JSON from stdin, echoes it back unchanged (the host pipeline
//! depends on pass-through), then parses the hook event and dispatches to
//! the session namer. Every skip and failure path still exits 0 with the
//! input already echoed.

use std::env;
use std::io::{self, Read, Write};
use std::path::Path;

use marquee_core::{
    current_pane, load_config, marquee_dir, Handler, HookInput, WorkerMode, WorkerSpawner,
    SUMMARY_GEN_ENV,
};

pub fn run() -> Result<(), String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("Failed to read stdin: {}", e))?;

    run_with_input(&input, &mut io::stdout(), None)
}

/// Inner handler with injectable output and state directory. `run` wires in
/// stdout and `~/.marquee`; tests pass a buffer and a temp dir.
fn run_with_input(
    input: &str,
    out: &mut impl Write,
    base_override: Option<&Path>,
) -> Result<(), String> {
    // Pass-through before any side effect.
    write!(out, "{}", input).map_err(|e| format!("Failed to echo input: {}", e))?;
    let _ = out.flush();

    // Our own summary workers trigger nested hook invocations; drain them.
    if env::var(SUMMARY_GEN_ENV)
        .map(|v| v == "1")
        .unwrap_or(false)
    {
        return Ok(());
    }

    if input.trim().is_empty() {
        return Ok(());
    }

    let hook_input: HookInput = match serde_json::from_str(input) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(error = %err, "Unparseable hook input, skipping");
            return Ok(());
        }
    };

    let Some(pane_id) = current_pane() else {
        tracing::debug!(
            event = %hook_input.hook_event_name,
            "Skipping event (not inside tmux)"
        );
        return Ok(());
    };

    let base_dir = match base_override {
        Some(path) => path.to_path_buf(),
        None => marquee_dir().ok_or("Cannot determine home directory")?,
    };
    let config = load_config();
    let tmux = marquee_core::CommandTmuxAdapter;
    let spawner = ExecWorkerSpawner;

    let handler = Handler::new(&config, &base_dir, &tmux, &spawner, pane_id);
    handler
        .handle(&hook_input)
        .map_err(|e| format!("Failed to handle {}: {}", hook_input.hook_event_name, e))
}

/// Spawns a detached `summary-worker` invocation of this binary.
struct ExecWorkerSpawner;

impl WorkerSpawner for ExecWorkerSpawner {
    fn spawn_worker(
        &self,
        session_id: &str,
        pane_id: &str,
        mode: WorkerMode,
    ) -> marquee_core::Result<u32> {
        use std::process::{Command, Stdio};

        let exe = env::current_exe()
            .map_err(|e| marquee_core::MarqueeError::io("resolve current exe", e))?;

        let mut command = Command::new(exe);
        command
            .arg("summary-worker")
            .arg("--session-id")
            .arg(session_id)
            .arg("--pane")
            .arg(pane_id)
            .env(SUMMARY_GEN_ENV, "1")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if mode == WorkerMode::Stop {
            command.arg("--clear-log");
        }

        // Not awaited: the worker outlives this handler and renames the
        // window out-of-band.
        let child = command
            .spawn()
            .map_err(|e| marquee_core::MarqueeError::io("spawn summary worker", e))?;
        Ok(child.id())
    }
}
