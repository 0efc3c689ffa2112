//! Error types for marquee-core operations.
//!
//! Hook invocations never surface these to the caller: the binary logs and
//! exits 0 so the host's hook pipeline keeps flowing. The typed variants
//! exist so internal call sites can say what failed and where.

use std::path::PathBuf;

/// All errors that can occur in marquee-core operations.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Cannot determine home directory")]
    HomeDirNotFound,

    #[error("Not running inside tmux (TMUX_PANE unset)")]
    NotInTmux,

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Command execution failed: {command}: {details}")]
    CommandFailed { command: String, details: String },

    #[error("State file malformed: {path}: {details}")]
    StateMalformed { path: PathBuf, details: String },
}

impl MarqueeError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        MarqueeError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        MarqueeError::Json {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using MarqueeError.
pub type Result<T> = std::result::Result<T, MarqueeError>;
