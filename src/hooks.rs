//! The hook decision state machine.
//!
//! Dispatches each [`HookEvent`] to the right predicate/engine combination
//! and produces exactly one [`Decision`]. File reads fail open: an
//! unreadable file or a failed cache write must never be conflated with
//! "has secrets". Prompt submissions fail closed: once a pattern matched,
//! the unredacted prompt never passes through.

use std::fs;

use crate::cache::RedactCache;
use crate::clipboard::Clipboard;
use crate::decision::Decision;
use crate::input::HookEvent;
use crate::rules::RuleSet;

/// Tools whose arguments are inspected. Anything else is allowed: policy is
/// an allow-list of risky tools, not a deny-list of all tools.
const TOOL_READ: &str = "Read";
const TOOL_BASH: &str = "Bash";
const TOOL_GREP: &str = "Grep";
const TOOL_SEARCH: &str = "Search";
const TOOL_GLOB: &str = "Glob";

/// Evaluates hook events against the rule set.
pub struct HookProcessor<'a> {
    rules: &'a RuleSet,
    cache: &'a RedactCache,
    clipboard: &'a dyn Clipboard,
}

impl<'a> HookProcessor<'a> {
    pub fn new(rules: &'a RuleSet, cache: &'a RedactCache, clipboard: &'a dyn Clipboard) -> Self {
        Self {
            rules,
            cache,
            clipboard,
        }
    }

    /// Produce the decision for one event.
    pub fn process(&self, event: HookEvent) -> Decision {
        match event {
            HookEvent::PreToolUse {
                tool_name,
                tool_input,
            } => {
                let arg = |key: &str| {
                    tool_input
                        .get(key)
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                match tool_name.as_str() {
                    TOOL_READ => self.handle_read(&arg("file_path")),
                    TOOL_BASH => self.handle_bash(&arg("command")),
                    TOOL_GREP | TOOL_SEARCH => self.handle_search(&arg("pattern")),
                    TOOL_GLOB => self.handle_glob(&arg("pattern")),
                    _ => Decision::Allow,
                }
            }
            HookEvent::UserPromptSubmit { prompt } => self.handle_prompt(&prompt),
            HookEvent::SessionEnd => self.handle_session_end(),
            HookEvent::Unrecognized { raw } => {
                Decision::PassThrough(raw.to_string())
            }
        }
    }

    fn handle_read(&self, file_path: &str) -> Decision {
        // Reads of our own redacted copies must succeed, or the redirect
        // below would loop forever.
        if self.cache.contains(file_path) {
            return Decision::Allow;
        }

        if let Some(reason) = self.rules.should_block_file(file_path) {
            return Decision::deny(reason);
        }

        if self.rules.should_redact_file(file_path) {
            return self.redact_read(file_path);
        }

        Decision::Allow
    }

    /// Read, filter, and cache a redact-eligible file. Any I/O failure
    /// falls open to Allow.
    fn redact_read(&self, file_path: &str) -> Decision {
        let Ok(content) = fs::read_to_string(file_path) else {
            return Decision::Allow;
        };

        let result = self.rules.filter_content(&content);
        if !result.changed {
            return Decision::Allow;
        }

        match self.cache.store_file(file_path, &result.content) {
            Ok(cached) => Decision::DenyWithRedirect {
                original: file_path.to_string(),
                redacted: cached.to_string_lossy().into_owned(),
            },
            Err(_) => Decision::Allow,
        }
    }

    fn handle_bash(&self, command: &str) -> Decision {
        match self.rules.should_block_command(command) {
            Some(reason) => Decision::deny(reason),
            None => Decision::Allow,
        }
    }

    fn handle_search(&self, pattern: &str) -> Decision {
        match self.rules.should_block_search(pattern) {
            Some(reason) => Decision::deny(reason),
            None => Decision::Allow,
        }
    }

    /// The glob pattern itself is the candidate string, so this is a
    /// deliberately coarser check: plain substring containment of every
    /// file-block entry, not glob matching.
    fn handle_glob(&self, pattern: &str) -> Decision {
        for entry in self.rules.file_block_entries() {
            if pattern.contains(entry) {
                return Decision::deny(format!(
                    "Pattern may expose sensitive files: {pattern}"
                ));
            }
        }
        Decision::Allow
    }

    fn handle_prompt(&self, prompt: &str) -> Decision {
        let result = self.rules.filter_content(prompt);
        if !result.changed {
            // Nothing sensitive; defer to default policy.
            return Decision::PassThrough("{}".to_string());
        }

        let clipboard_status = match self.clipboard.copy(&result.content) {
            Ok(()) => "Copied to clipboard - paste to continue",
            Err(_) => "Could not copy to clipboard",
        };

        let mut message = String::from("BLOCKED: Sensitive content detected\n\nDetected patterns:\n");
        for name in &result.matched {
            message.push_str(&format!("  - {name}\n"));
        }

        match self.cache.store_prompt(prompt, &result.content) {
            Ok(saved) => {
                let separator = "-".repeat(40);
                message.push_str(&format!(
                    "\nYour message (redacted):\n{separator}\n{}\n{separator}\n\nSaved to: {}\n{clipboard_status}",
                    result.content,
                    saved.display(),
                ));
            }
            Err(_) => {
                // No saved copy to point at; still never pass the prompt on.
                message.push_str(&format!(
                    "\nThe submission was rejected. Remove the sensitive values and resend.\n{clipboard_status}",
                ));
            }
        }

        Decision::Blocked { message }
    }

    fn handle_session_end(&self) -> Decision {
        if let Err(e) = self.cache.purge() {
            // Cleanup is best-effort and must not abort the host process.
            eprintln!("session-end cleanup warning: {e}");
        }
        Decision::PassThrough("{}".to_string())
    }
}
