//! marquee-hook: CLI hook handler that names tmux windows after what the
//! Claude Code session in them is doing.
//!
//! Called directly by Claude Code hooks configured in ~/.claude/settings.json.
//!
//! ## Subcommands
//!
//! - `handle`: Main hook handler, reads JSON from stdin and echoes it back
//! - `summary-worker`: Detached summarization worker (spawned internally)

mod handle;
mod logging;
mod worker;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "marquee-hook")]
#[command(about = "Session-aware tmux window naming for Claude Code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a hook event (reads JSON from stdin)
    Handle,

    /// Summary worker (spawned by the handle command, not for direct use)
    #[command(hide = true)]
    SummaryWorker {
        /// Session whose spooled text should be summarized
        #[arg(long)]
        session_id: String,

        /// Pane whose window gets the resulting title
        #[arg(long)]
        pane: String,

        /// Clear the session's event log after a successful rename
        #[arg(long)]
        clear_log: bool,
    },
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Handle => {
            // The hook must never break the host pipeline: log and exit 0.
            if let Err(e) = handle::run() {
                tracing::error!(error = %e, "marquee-hook handle failed");
            }
        }
        Commands::SummaryWorker {
            session_id,
            pane,
            clear_log,
        } => {
            worker::run(&session_id, &pane, clear_log);
        }
    }
}
