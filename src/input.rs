//! Input classification for hook invocations.
//!
//! The gate receives one text blob per invocation. A blob that is a JSON
//! object carrying a recognized `hook_event_name` becomes a [`HookEvent`];
//! everything else (malformed JSON, missing field, plain text) falls through
//! to raw-text filtering.

use serde_json::{Map, Value};

/// A structured hook event from the agent.
#[derive(Debug, Clone)]
pub enum HookEvent {
    /// A tool is about to run; carries the tool name and its arguments.
    PreToolUse {
        tool_name: String,
        tool_input: Map<String, Value>,
    },
    /// The user submitted a prompt.
    UserPromptSubmit { prompt: String },
    /// The session ended; cache cleanup point.
    SessionEnd,
    /// A hook event this gate does not handle; echoed back unchanged.
    Unrecognized { raw: Value },
}

/// How one inbound blob should be processed.
#[derive(Debug, Clone)]
pub enum Classified {
    /// A structured hook event for the decision state machine.
    Hook(HookEvent),
    /// Free-form text for the redaction engine.
    RawText(String),
}

/// Classify an input blob.
pub fn classify(input: &str) -> Classified {
    let trimmed = input.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
            if let Some(event) = parse_hook_event(map) {
                return Classified::Hook(event);
            }
        }
    }
    Classified::RawText(trimmed.to_string())
}

/// Parse a JSON object as a hook event, if it carries `hook_event_name`.
///
/// An object without the field is not a hook event at all (raw text); an
/// object with an unknown value is an event we pass through untouched.
fn parse_hook_event(map: Map<String, Value>) -> Option<HookEvent> {
    let event_name = map.get("hook_event_name")?.as_str()?;

    let event = match event_name {
        "PreToolUse" => {
            let tool_name = map
                .get("tool_name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let tool_input = map
                .get("tool_input")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            HookEvent::PreToolUse {
                tool_name,
                tool_input,
            }
        }
        "UserPromptSubmit" => {
            let prompt = map
                .get("prompt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            HookEvent::UserPromptSubmit { prompt }
        }
        "SessionEnd" => HookEvent::SessionEnd,
        _ => HookEvent::Unrecognized {
            raw: Value::Object(map),
        },
    };

    Some(event)
}

/// Extract the working directory from a hook input blob, when present.
///
/// Used before classification so the project config layer can be found.
pub fn extract_cwd(input: &str) -> Option<String> {
    let value: Value = serde_json::from_str(input.trim()).ok()?;
    value.get("cwd")?.as_str().map(String::from)
}
