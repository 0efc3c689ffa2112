//! Window label derivation.
//!
//! Labels come from three places: direct truncation of a short first prompt,
//! summarizer output, and per-tool descriptions appended to the session
//! event log. All of them are clamped and lower-cased the same way so the
//! window title stays uniform.

use serde_json::Value;

use crate::config::MarqueeConfig;

/// Instruction prepended to every summarizer invocation. Doubles as the
/// self-recursion guard: a prompt containing this marker is one of our own
/// summarization requests and must never trigger a rename.
pub const SUMMARY_INSTRUCTION: &str =
    "Summarize this terminal session activity in at most eight words, plain text, one line:";

/// Returns true if the prompt looks like a summarization request this tool
/// generated (feeding it back through the namer would loop forever).
pub fn is_self_summary_prompt(prompt: &str) -> bool {
    prompt.contains(SUMMARY_INSTRUCTION)
}

/// Builds a window label from raw text: whitespace-normalized, lower-cased,
/// clamped to `label_max` characters, with the configured prefix.
pub fn label_from_text(config: &MarqueeConfig, text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = normalized.chars().take(config.label_max).collect();
    format!("{}{}", config.label_prefix, truncated.to_lowercase())
}

/// Returns true if the prompt is short enough to rename synchronously.
pub fn is_short_prompt(config: &MarqueeConfig, prompt: &str) -> bool {
    prompt.chars().count() <= config.short_prompt_max
}

/// Extracts a short human-readable description from a tool invocation.
///
/// Maps tool names to the most relevant field in their input:
/// - Bash -> command
/// - Edit/Write/Read -> file_path (basename only)
/// - Grep/Glob -> pattern
/// - WebFetch -> url
/// - WebSearch -> query
/// - Task -> description
///
/// Returns None for tools with nothing worth logging.
pub fn describe_tool(tool_name: &str, tool_input: &Value) -> Option<String> {
    const MAX_DETAIL_LEN: usize = 120;

    let detail = match tool_name {
        "Bash" => tool_input.get("command")?.as_str()?.to_string(),
        "Edit" | "Write" | "Read" => {
            let path = tool_input.get("file_path")?.as_str()?;
            basename(path).to_string()
        }
        "Grep" | "Glob" => tool_input.get("pattern")?.as_str()?.to_string(),
        "WebFetch" => tool_input.get("url")?.as_str()?.to_string(),
        "WebSearch" => tool_input.get("query")?.as_str()?.to_string(),
        "Task" => tool_input.get("description")?.as_str()?.to_string(),
        _ => return None,
    };

    let normalized = detail.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }

    let clamped: String = normalized.chars().take(MAX_DETAIL_LEN).collect();
    Some(format!("{}: {}", tool_name, clamped))
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
