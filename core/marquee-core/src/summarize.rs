//! External summarizer invocation.
//!
//! Runs the configured summarization command with a deadline. The command
//! is expected to print one line of plain text; anything else (timeout,
//! non-zero exit, empty output, spawn failure) yields None and the caller
//! leaves the window title alone.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::MarqueeConfig;
use crate::label::SUMMARY_INSTRUCTION;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Environment variable marking our own subprocesses so their nested hook
/// invocations are drained instead of processed.
pub const SUMMARY_GEN_ENV: &str = "MARQUEE_SUMMARY_GEN";

/// Runs the summarizer over `text` and returns the first non-empty output
/// line. None on any failure.
pub fn run_summarizer(config: &MarqueeConfig, text: &str) -> Option<String> {
    let (program, args) = config.summarizer_command.split_first()?;
    let request = format!("{}\n\n{}", SUMMARY_INSTRUCTION, text);

    let mut child = Command::new(program)
        .args(args)
        .arg(&request)
        .env(SUMMARY_GEN_ENV, "1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| {
            tracing::debug!(error = %err, program = %program, "Failed to spawn summarizer");
            err
        })
        .ok()?;

    // Drain stdout on a separate thread so a chatty child can't block on a
    // full pipe while we poll for exit.
    let mut stdout = child.stdout.take()?;
    let reader = thread::spawn(move || {
        let mut output = String::new();
        let _ = stdout.read_to_string(&mut output);
        output
    });

    let deadline = Instant::now() + Duration::from_secs(config.summarize_timeout_secs);
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    tracing::debug!("Summarizer timed out, killing");
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = reader.join();
                    return None;
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(err) => {
                tracing::debug!(error = %err, "Failed to poll summarizer");
                let _ = child.kill();
                let _ = child.wait();
                let _ = reader.join();
                return None;
            }
        }
    };

    let output = reader.join().ok()?;
    if !status.success() {
        tracing::debug!(status = %status, "Summarizer exited non-zero");
        return None;
    }

    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(command: &[&str], timeout_secs: u64) -> MarqueeConfig {
        MarqueeConfig {
            summarizer_command: command.iter().map(|s| s.to_string()).collect(),
            summarize_timeout_secs: timeout_secs,
            ..MarqueeConfig::default()
        }
    }

    #[test]
    fn returns_first_nonempty_line() {
        // The request arg is ignored; the script prints a fixed summary.
        let config = config_with(&["sh", "-c", "printf '\\nworking on tests\\nextra\\n' #"], 5);
        assert_eq!(
            run_summarizer(&config, "some activity").as_deref(),
            Some("working on tests")
        );
    }

    #[test]
    fn nonzero_exit_yields_none() {
        let config = config_with(&["sh", "-c", "echo oops; exit 3 #"], 5);
        assert!(run_summarizer(&config, "text").is_none());
    }

    #[test]
    fn empty_output_yields_none() {
        let config = config_with(&["sh", "-c", "exit 0 #"], 5);
        assert!(run_summarizer(&config, "text").is_none());
    }

    #[test]
    fn missing_program_yields_none() {
        let config = config_with(&["definitely-not-a-real-binary-xyz"], 5);
        assert!(run_summarizer(&config, "text").is_none());
    }

    #[test]
    fn timeout_kills_the_child() {
        let config = config_with(&["sh", "-c", "sleep 30; echo late #"], 1);
        let start = std::time::Instant::now();
        assert!(run_summarizer(&config, "text").is_none());
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
