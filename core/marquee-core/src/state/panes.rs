//! Pane→session binding map.
//!
//! A weak, non-owning association from a tmux pane ID to the session
//! currently considered active in that pane. It exists only so SessionEnd
//! can decide whether to reset the pane's window title. Bindings are created
//! on the first prompt in a pane and deleted when that session ends.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "panes": {
//!     "%5": { "session_id": "abc", "bound_at": "2026-08-29T12:00:00Z" }
//!   }
//! }
//! ```
//!
//! # Defensive Design
//!
//! Hook invocations race on this file, so loads tolerate empty files,
//! corrupt JSON, and version mismatches by returning an empty map, and
//! writes go through a temp file + rename under a map-level advisory lock.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{MarqueeError, Result};

const PANES_FILE: &str = "panes.json";
const PANES_LOCK_FILE: &str = "panes.lock";
const PANES_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaneBinding {
    pub session_id: String,
    pub bound_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PanesFile {
    version: u32,
    panes: HashMap<String, PaneBinding>,
}

impl Default for PanesFile {
    fn default() -> Self {
        PanesFile {
            version: PANES_VERSION,
            panes: HashMap::new(),
        }
    }
}

/// The global pane→session map, stored under the Marquee state directory.
pub struct PaneMap {
    base_dir: PathBuf,
}

impl PaneMap {
    pub fn new(base_dir: &Path) -> PaneMap {
        PaneMap {
            base_dir: base_dir.to_path_buf(),
        }
    }

    /// Binds `pane_id` to `session_id`, replacing any previous binding for
    /// that pane.
    pub fn bind(&self, pane_id: &str, session_id: &str) -> Result<()> {
        let _lock = self.lock()?;
        let mut file = self.load_file();
        file.panes.insert(
            pane_id.to_string(),
            PaneBinding {
                session_id: session_id.to_string(),
                bound_at: Utc::now(),
            },
        );
        self.save_file(&file)
    }

    /// Returns the session currently bound to `pane_id`.
    pub fn bound_session(&self, pane_id: &str) -> Option<String> {
        self.load_file()
            .panes
            .get(pane_id)
            .map(|binding| binding.session_id.clone())
    }

    /// Removes the binding for `pane_id` only if it points at `session_id`.
    /// Returns true if a binding was removed.
    pub fn unbind_if(&self, pane_id: &str, session_id: &str) -> Result<bool> {
        let _lock = self.lock()?;
        let mut file = self.load_file();

        let matches = file
            .panes
            .get(pane_id)
            .is_some_and(|binding| binding.session_id == session_id);
        if !matches {
            return Ok(false);
        }

        file.panes.remove(pane_id);
        self.save_file(&file)?;
        Ok(true)
    }

    fn lock(&self) -> Result<File> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| MarqueeError::io(format!("create {}", self.base_dir.display()), e))?;
        let lock_path = self.base_dir.join(PANES_LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| MarqueeError::io(format!("open {}", lock_path.display()), e))?;
        file.lock_exclusive()
            .map_err(|e| MarqueeError::io(format!("lock {}", lock_path.display()), e))?;
        Ok(file)
    }

    fn load_file(&self) -> PanesFile {
        let path = self.base_dir.join(PANES_FILE);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return PanesFile::default();
        };

        if content.trim().is_empty() {
            return PanesFile::default();
        }

        match serde_json::from_str::<PanesFile>(&content) {
            Ok(file) if file.version == PANES_VERSION => file,
            Ok(file) => {
                tracing::warn!(
                    version = file.version,
                    "Unsupported panes file version, starting empty"
                );
                PanesFile::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Corrupt panes file, starting empty");
                PanesFile::default()
            }
        }
    }

    fn save_file(&self, file: &PanesFile) -> Result<()> {
        let path = self.base_dir.join(PANES_FILE);
        let content = serde_json::to_string_pretty(file)
            .map_err(|e| MarqueeError::json("serialize panes file", e))?;

        let mut temp = NamedTempFile::new_in(&self.base_dir)
            .map_err(|e| MarqueeError::io("create panes temp file", e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| MarqueeError::io("write panes temp file", e))?;
        temp.flush()
            .map_err(|e| MarqueeError::io("flush panes temp file", e))?;
        temp.persist(&path)
            .map_err(|e| MarqueeError::io(format!("persist {}", path.display()), e.error))?;
        Ok(())
    }
}
