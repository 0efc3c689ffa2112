//! Advisory file locking for session-scoped critical sections.
//!
//! Several independent hook invocations can run for the same session at
//! once. The first-message flag, the event log, and the worker PID file are
//! all read-check-write sequences, so each session directory carries a
//! `.lock` file and mutators take a blocking exclusive lock on it. Critical
//! sections are small; blocking with no timeout is acceptable.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::error::{MarqueeError, Result};

const LOCK_FILE: &str = ".lock";

/// Held exclusive lock on a session directory. Released on drop.
pub struct SessionLock {
    file: File,
}

impl SessionLock {
    /// Blocks until the exclusive lock for `session_dir` is acquired.
    /// Creates the directory and lock file if they do not exist yet.
    pub fn acquire(session_dir: &Path) -> Result<SessionLock> {
        std::fs::create_dir_all(session_dir)
            .map_err(|e| MarqueeError::io(format!("create {}", session_dir.display()), e))?;

        let lock_path = session_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| MarqueeError::io(format!("open {}", lock_path.display()), e))?;

        file.lock_exclusive()
            .map_err(|e| MarqueeError::io(format!("lock {}", lock_path.display()), e))?;

        Ok(SessionLock { file })
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
