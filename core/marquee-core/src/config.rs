//! Configuration loading for the session namer.
//!
//! Config lives at `~/.marquee/config.json` and every field has a default,
//! so a missing or unreadable file yields a fully working setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest prompt that gets the synchronous truncation path.
fn default_short_prompt_max() -> usize {
    250
}

/// Characters of label text kept after the prefix.
fn default_label_max() -> usize {
    142
}

/// Log entries read back for a Stop summarization.
fn default_recent_events() -> usize {
    20
}

fn default_summarize_timeout_secs() -> u64 {
    10
}

fn default_label_prefix() -> String {
    "claude: ".to_string()
}

fn default_title() -> String {
    "zsh".to_string()
}

fn default_summarizer_command() -> Vec<String> {
    vec!["claude".to_string(), "-p".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarqueeConfig {
    /// Argv of the external summarization command. The summarization
    /// instruction and the text to summarize are appended as one final arg.
    #[serde(default = "default_summarizer_command")]
    pub summarizer_command: Vec<String>,

    #[serde(default = "default_summarize_timeout_secs")]
    pub summarize_timeout_secs: u64,

    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,

    /// Window title restored when a bound session ends.
    #[serde(default = "default_title")]
    pub default_title: String,

    #[serde(default = "default_short_prompt_max")]
    pub short_prompt_max: usize,

    #[serde(default = "default_label_max")]
    pub label_max: usize,

    #[serde(default = "default_recent_events")]
    pub recent_events: usize,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        MarqueeConfig {
            summarizer_command: default_summarizer_command(),
            summarize_timeout_secs: default_summarize_timeout_secs(),
            label_prefix: default_label_prefix(),
            default_title: default_title(),
            short_prompt_max: default_short_prompt_max(),
            label_max: default_label_max(),
            recent_events: default_recent_events(),
        }
    }
}

/// Returns the Marquee state directory (`~/.marquee`).
pub fn marquee_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".marquee"))
}

/// Returns the path to the configuration file.
pub fn config_path() -> Option<PathBuf> {
    marquee_dir().map(|d| d.join("config.json"))
}

/// Loads the configuration, returning defaults if the file is missing or
/// unparseable.
pub fn load_config() -> MarqueeConfig {
    config_path()
        .and_then(|p| std::fs::read_to_string(&p).ok())
        .and_then(|c| serde_json::from_str(&c).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_limits() {
        let config = MarqueeConfig::default();
        assert_eq!(config.short_prompt_max, 250);
        assert_eq!(config.label_max, 142);
        assert_eq!(config.recent_events, 20);
        assert_eq!(config.summarize_timeout_secs, 10);
        assert_eq!(config.label_prefix, "claude: ");
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: MarqueeConfig =
            serde_json::from_str(r#"{"default_title":"bash"}"#).unwrap();
        assert_eq!(config.default_title, "bash");
        assert_eq!(config.label_max, 142);
        assert_eq!(config.summarizer_command, vec!["claude", "-p"]);
    }
}
