//! Hook event input parsing.
//!
//! Claude Code delivers one JSON object per hook invocation on stdin. The
//! schema carries more fields than we use; unknown ones are ignored so a
//! host upgrade never breaks the hook.

use serde::Deserialize;
use serde_json::Value;

/// Input JSON schema from Claude Code hooks.
///
/// Every field except `hook_event_name` is optional because each event kind
/// sends a different subset.
#[derive(Debug, Clone, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub session_id: Option<String>,
    pub hook_event_name: String,
    /// Only present for UserPromptSubmit.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Only present for PreToolUse/PostToolUse.
    #[serde(default)]
    pub tool_name: Option<String>,
    /// Tool input JSON, present for PreToolUse/PostToolUse.
    #[serde(default)]
    pub tool_input: Option<Value>,
    /// Present on Stop when this hook chain was itself triggered by a stop hook.
    #[serde(default)]
    pub stop_hook_active: Option<bool>,
}

/// Lifecycle events the session namer reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    UserPromptSubmit {
        prompt: String,
    },
    PreToolUse {
        tool_name: String,
        tool_input: Value,
    },
    PostToolUse,
    Stop {
        stop_hook_active: bool,
    },
    SessionEnd,
    Unknown {
        event_name: String,
    },
}

impl HookInput {
    pub fn to_event(&self) -> HookEvent {
        match self.hook_event_name.as_str() {
            "UserPromptSubmit" => HookEvent::UserPromptSubmit {
                prompt: self.prompt.clone().unwrap_or_default(),
            },
            "PreToolUse" => HookEvent::PreToolUse {
                tool_name: self.tool_name.clone().unwrap_or_default(),
                tool_input: self.tool_input.clone().unwrap_or(Value::Null),
            },
            "PostToolUse" => HookEvent::PostToolUse,
            "Stop" => HookEvent::Stop {
                stop_hook_active: self.stop_hook_active.unwrap_or(false),
            },
            "SessionEnd" => HookEvent::SessionEnd,
            other => HookEvent::Unknown {
                event_name: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prompt_submit() {
        let input: HookInput = serde_json::from_str(
            r#"{"hook_event_name":"UserPromptSubmit","session_id":"abc","prompt":"fix the bug"}"#,
        )
        .unwrap();
        assert_eq!(input.session_id.as_deref(), Some("abc"));
        assert_eq!(
            input.to_event(),
            HookEvent::UserPromptSubmit {
                prompt: "fix the bug".to_string()
            }
        );
    }

    #[test]
    fn parses_pre_tool_use_with_input() {
        let input: HookInput = serde_json::from_str(
            r#"{"hook_event_name":"PreToolUse","session_id":"abc","tool_name":"Bash","tool_input":{"command":"cargo test"}}"#,
        )
        .unwrap();
        match input.to_event() {
            HookEvent::PreToolUse {
                tool_name,
                tool_input,
            } => {
                assert_eq!(tool_name, "Bash");
                assert_eq!(tool_input["command"], "cargo test");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn tolerates_unknown_fields_and_events() {
        let input: HookInput = serde_json::from_str(
            r#"{"hook_event_name":"SubagentStop","session_id":"abc","transcript_path":"/tmp/t.json"}"#,
        )
        .unwrap();
        assert_eq!(
            input.to_event(),
            HookEvent::Unknown {
                event_name: "SubagentStop".to_string()
            }
        );
    }

    #[test]
    fn stop_hook_active_defaults_to_false() {
        let input: HookInput =
            serde_json::from_str(r#"{"hook_event_name":"Stop","session_id":"abc"}"#).unwrap();
        assert_eq!(
            input.to_event(),
            HookEvent::Stop {
                stop_hook_active: false
            }
        );
    }

    #[test]
    fn missing_session_id_is_none() {
        let input: HookInput =
            serde_json::from_str(r#"{"hook_event_name":"Stop"}"#).unwrap();
        assert!(input.session_id.is_none());
    }
}
