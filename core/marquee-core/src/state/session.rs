//! File-backed per-session state.
//!
//! One directory per session ID holds the first-message flag, the rolling
//! event log, and the record of the at-most-one outstanding summary worker.
//! Mutators take the session lock internally so callers can't forget it;
//! each critical section is a single read-check-write.

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{MarqueeError, Result};

use super::lock::SessionLock;
use super::proc;

const FIRST_MESSAGE_FILE: &str = "first_message";
const EVENTS_FILE: &str = "events.log";
const WORKER_FILE: &str = "summary.pid";
const SUMMARY_INPUT_FILE: &str = "summary.input";

/// Record of the outstanding summary worker for a session.
///
/// `proc_started` disambiguates a recycled PID: cancellation only signals
/// the process if its start time still matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingWorker {
    pub pid: u32,
    #[serde(default)]
    pub proc_started: Option<u64>,
}

/// Handle to one session's on-disk state.
pub struct SessionStore {
    session_dir: PathBuf,
}

impl SessionStore {
    /// Opens (without creating) the store for `session_id` under `base`,
    /// normally `~/.marquee/sessions`.
    pub fn open(base: &Path, session_id: &str) -> SessionStore {
        SessionStore {
            session_dir: base.join(session_id),
        }
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Atomically tests and sets the first-message flag.
    ///
    /// Returns true exactly once per session: for the invocation that
    /// performed the false→true transition. Concurrent callers serialize on
    /// the session lock.
    pub fn mark_first_message(&self) -> Result<bool> {
        let _lock = SessionLock::acquire(&self.session_dir)?;

        let flag_path = self.session_dir.join(FIRST_MESSAGE_FILE);
        if read_flag(&flag_path) {
            return Ok(false);
        }

        fs::write(&flag_path, "1")
            .map_err(|e| MarqueeError::io(format!("write {}", flag_path.display()), e))?;
        Ok(true)
    }

    /// Returns true if the first prompt of this session has been processed.
    pub fn first_message_set(&self) -> bool {
        read_flag(&self.session_dir.join(FIRST_MESSAGE_FILE))
    }

    /// Appends one event summary line to the rolling log.
    pub fn append_event(&self, line: &str) -> Result<()> {
        let _lock = SessionLock::acquire(&self.session_dir)?;

        let log_path = self.session_dir.join(EVENTS_FILE);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| MarqueeError::io(format!("open {}", log_path.display()), e))?;
        writeln!(file, "{}", line.replace('\n', " "))
            .map_err(|e| MarqueeError::io(format!("append {}", log_path.display()), e))?;
        Ok(())
    }

    /// Returns the most recent `limit` log entries, oldest first.
    /// A missing log reads as empty.
    pub fn recent_events(&self, limit: usize) -> Vec<String> {
        let log_path = self.session_dir.join(EVENTS_FILE);
        let Ok(content) = std::fs::read_to_string(&log_path) else {
            return Vec::new();
        };

        let lines: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        let skip = lines.len().saturating_sub(limit);
        lines[skip..].iter().map(|s| s.to_string()).collect()
    }

    /// Truncates the event log (after a successful Stop summarization).
    pub fn clear_events(&self) -> Result<()> {
        let _lock = SessionLock::acquire(&self.session_dir)?;

        let log_path = self.session_dir.join(EVENTS_FILE);
        if log_path.exists() {
            fs::write(&log_path, "")
                .map_err(|e| MarqueeError::io(format!("truncate {}", log_path.display()), e))?;
        }
        Ok(())
    }

    /// Records `pid` as the outstanding summary worker, capturing its start
    /// time for later verified cancellation.
    pub fn record_worker(&self, pid: u32) -> Result<()> {
        let _lock = SessionLock::acquire(&self.session_dir)?;

        let record = PendingWorker {
            pid,
            proc_started: proc::process_start_time(pid),
        };
        let worker_path = self.session_dir.join(WORKER_FILE);
        let content = serde_json::to_string(&record)
            .map_err(|e| MarqueeError::json("serialize worker record", e))?;
        fs::write(&worker_path, content)
            .map_err(|e| MarqueeError::io(format!("write {}", worker_path.display()), e))?;
        Ok(())
    }

    /// Returns the recorded worker, if any. Corrupt records read as absent.
    pub fn pending_worker(&self) -> Option<PendingWorker> {
        let worker_path = self.session_dir.join(WORKER_FILE);
        let content = std::fs::read_to_string(&worker_path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Cancels any outstanding worker: verified SIGTERM, then record removal.
    /// Returns true if a live worker was signalled.
    pub fn cancel_pending_worker(&self) -> bool {
        let Ok(_lock) = SessionLock::acquire(&self.session_dir) else {
            return false;
        };

        let worker_path = self.session_dir.join(WORKER_FILE);
        let signalled = match self.pending_worker() {
            Some(record) => proc::terminate_verified(record.pid, record.proc_started),
            None => false,
        };
        let _ = std::fs::remove_file(&worker_path);
        signalled
    }

    /// Removes the worker record if it still points at `pid`. Called by the
    /// worker itself on exit; a record overwritten by a newer launch is left
    /// alone.
    pub fn clear_worker_if(&self, pid: u32) {
        let Ok(_lock) = SessionLock::acquire(&self.session_dir) else {
            return;
        };

        if let Some(record) = self.pending_worker() {
            if record.pid == pid {
                let _ = std::fs::remove_file(self.session_dir.join(WORKER_FILE));
            }
        }
    }

    /// Spools the text a summary worker should read.
    pub fn write_summary_input(&self, text: &str) -> Result<()> {
        fs::create_dir_all(&self.session_dir)
            .map_err(|e| MarqueeError::io(format!("create {}", self.session_dir.display()), e))?;
        let input_path = self.session_dir.join(SUMMARY_INPUT_FILE);
        fs::write(&input_path, text)
            .map_err(|e| MarqueeError::io(format!("write {}", input_path.display()), e))
    }

    pub fn read_summary_input(&self) -> Option<String> {
        std::fs::read_to_string(self.session_dir.join(SUMMARY_INPUT_FILE)).ok()
    }
}

fn read_flag(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .map(|content| content.trim() == "1")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    fn store(base: &Path) -> SessionStore {
        SessionStore::open(base, "session-1")
    }

    #[test]
    fn first_message_flag_starts_unset() {
        let temp = tempdir().unwrap();
        assert!(!store(temp.path()).first_message_set());
    }

    #[test]
    fn mark_first_message_sets_exactly_once() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        assert!(store.mark_first_message().unwrap());
        assert!(!store.mark_first_message().unwrap());
        assert!(store.first_message_set());
    }

    #[test]
    fn first_message_flag_file_contains_one() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        store.mark_first_message().unwrap();
        let content =
            std::fs::read_to_string(store.session_dir().join("first_message")).unwrap();
        assert_eq!(content, "1");
    }

    #[test]
    fn concurrent_marks_yield_a_single_winner() {
        let temp = tempdir().unwrap();
        let base = Arc::new(temp.path().to_path_buf());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let base = Arc::clone(&base);
                thread::spawn(move || {
                    SessionStore::open(&base, "racy")
                        .mark_first_message()
                        .unwrap()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn recent_events_returns_tail_in_order() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        for i in 0..30 {
            store.append_event(&format!("event {}", i)).unwrap();
        }
        let tail = store.recent_events(20);
        assert_eq!(tail.len(), 20);
        assert_eq!(tail.first().unwrap(), "event 10");
        assert_eq!(tail.last().unwrap(), "event 29");
    }

    #[test]
    fn recent_events_of_missing_log_is_empty() {
        let temp = tempdir().unwrap();
        assert!(store(temp.path()).recent_events(20).is_empty());
    }

    #[test]
    fn append_flattens_embedded_newlines() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        store.append_event("line one\nline two").unwrap();
        assert_eq!(store.recent_events(5), vec!["line one line two"]);
    }

    #[test]
    fn clear_events_empties_the_log() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        store.append_event("something").unwrap();
        store.clear_events().unwrap();
        assert!(store.recent_events(20).is_empty());
    }

    #[test]
    fn record_and_read_worker_round_trips() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        store.record_worker(std::process::id()).unwrap();
        let record = store.pending_worker().unwrap();
        assert_eq!(record.pid, std::process::id());
        assert!(record.proc_started.is_some());
    }

    #[test]
    fn cancel_terminates_recorded_live_worker() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
        store.record_worker(child.id()).unwrap();

        assert!(store.cancel_pending_worker());
        assert!(store.pending_worker().is_none());
        let status = child.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn cancel_with_no_record_is_a_noop() {
        let temp = tempdir().unwrap();
        assert!(!store(temp.path()).cancel_pending_worker());
    }

    #[test]
    fn cancel_ignores_dead_pid() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        std::fs::create_dir_all(store.session_dir()).unwrap();
        std::fs::write(
            store.session_dir().join("summary.pid"),
            r#"{"pid":99999999,"proc_started":1}"#,
        )
        .unwrap();
        assert!(!store.cancel_pending_worker());
        assert!(store.pending_worker().is_none());
    }

    #[test]
    fn clear_worker_if_respects_newer_record() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        store.record_worker(std::process::id()).unwrap();
        store.clear_worker_if(12345);
        assert!(store.pending_worker().is_some());
        store.clear_worker_if(std::process::id());
        assert!(store.pending_worker().is_none());
    }

    #[test]
    fn summary_input_round_trips() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        store.write_summary_input("recent activity").unwrap();
        assert_eq!(store.read_summary_input().as_deref(), Some("recent activity"));
    }
}
