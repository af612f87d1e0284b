//! Hook response serialization.
//!
//! PreToolUse decisions are reported as the agent's hook JSON schema:
//! `{"hookSpecificOutput": {"hookEventName": ..., "permissionDecision":
//! "allow"|"deny", ...}}`. Omitting `permissionDecision` defers to the
//! default policy. Hard prompt rejection is not expressed in this schema;
//! it travels out-of-band as a message plus a non-zero exit.

use serde::Serialize;
use serde_json::json;

use crate::decision::Decision;

/// The hook response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResponse {
    pub hook_specific_output: HookSpecificOutput,
}

/// Hook-specific output for PreToolUse decisions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: &'static str,
    pub permission_decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_decision_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_input: Option<serde_json::Value>,
}

/// What the process should ultimately do with a decision.
#[derive(Debug)]
pub enum Outcome {
    /// Print to stdout, exit 0.
    Emit(String),
    /// Print to stderr, exit 2: rejects the submission entirely.
    Reject(String),
}

/// Map a decision to its process-level outcome.
pub fn render(decision: &Decision) -> Outcome {
    match decision {
        Decision::Allow => Outcome::Emit(pre_tool_use_json("allow", None, None)),
        Decision::AllowWithRedirect { new_path } => Outcome::Emit(pre_tool_use_json(
            "allow",
            None,
            Some(json!({ "file_path": new_path })),
        )),
        Decision::Deny { reason } => {
            Outcome::Emit(pre_tool_use_json("deny", Some(reason.clone()), None))
        }
        Decision::DenyWithRedirect { original, redacted } => {
            let reason = format!(
                "SECRETS DETECTED - File contains sensitive data.\n\n\
                 Original: {original}\n\n\
                 A redacted version has been created. Please read this file instead:\n\n    {redacted}"
            );
            Outcome::Emit(pre_tool_use_json("deny", Some(reason), None))
        }
        Decision::PassThrough(payload) => Outcome::Emit(payload.clone()),
        Decision::Blocked { message } => Outcome::Reject(message.clone()),
    }
}

fn pre_tool_use_json(
    permission: &'static str,
    reason: Option<String>,
    updated_input: Option<serde_json::Value>,
) -> String {
    let response = HookResponse {
        hook_specific_output: HookSpecificOutput {
            hook_event_name: "PreToolUse",
            permission_decision: permission,
            permission_decision_reason: reason,
            updated_input,
        },
    };
    serde_json::to_string(&response).unwrap_or_else(|_| {
        format!(
            r#"{{"hookSpecificOutput":{{"hookEventName":"PreToolUse","permissionDecision":"{permission}"}}}}"#
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn emitted(decision: &Decision) -> Value {
        match render(decision) {
            Outcome::Emit(payload) => serde_json::from_str(&payload).unwrap(),
            Outcome::Reject(msg) => panic!("unexpected rejection: {msg}"),
        }
    }

    #[test]
    fn test_allow_shape() {
        let v = emitted(&Decision::Allow);
        let output = &v["hookSpecificOutput"];
        assert_eq!(output["hookEventName"], "PreToolUse");
        assert_eq!(output["permissionDecision"], "allow");
        assert!(output.get("permissionDecisionReason").is_none());
        assert!(output.get("updatedInput").is_none());
    }

    #[test]
    fn test_deny_carries_reason() {
        let v = emitted(&Decision::deny("Access denied to sensitive file: .env"));
        let output = &v["hookSpecificOutput"];
        assert_eq!(output["permissionDecision"], "deny");
        assert_eq!(
            output["permissionDecisionReason"],
            "Access denied to sensitive file: .env"
        );
    }

    #[test]
    fn test_deny_with_redirect_names_both_paths() {
        let v = emitted(&Decision::DenyWithRedirect {
            original: "/app/settings.json".to_string(),
            redacted: "/tmp/claude/redacted/ab12_settings.json".to_string(),
        });
        let reason = v["hookSpecificOutput"]["permissionDecisionReason"]
            .as_str()
            .unwrap();
        assert!(reason.contains("/app/settings.json"));
        assert!(reason.contains("/tmp/claude/redacted/ab12_settings.json"));
    }

    #[test]
    fn test_allow_with_redirect_updates_input() {
        let v = emitted(&Decision::AllowWithRedirect {
            new_path: "/tmp/claude/redacted/ab12_settings.json".to_string(),
        });
        let output = &v["hookSpecificOutput"];
        assert_eq!(output["permissionDecision"], "allow");
        assert_eq!(
            output["updatedInput"]["file_path"],
            "/tmp/claude/redacted/ab12_settings.json"
        );
    }

    #[test]
    fn test_pass_through_is_verbatim() {
        match render(&Decision::PassThrough("{}".to_string())) {
            Outcome::Emit(payload) => assert_eq!(payload, "{}"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_blocked_is_rejection() {
        match render(&Decision::Blocked {
            message: "BLOCKED: Sensitive content detected".to_string(),
        }) {
            Outcome::Reject(msg) => assert!(msg.contains("BLOCKED")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
