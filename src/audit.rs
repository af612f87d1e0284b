//! Best-effort activity log.
//!
//! One JSON line per invocation that actually filtered something, appended
//! to `~/.secret-gate/activity.log` (override with SECRET_GATE_LOG). Write
//! failures are swallowed by the caller; the log never affects the decision.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// A single activity record.
#[derive(Debug, Serialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    /// What kind of input this was ("raw_text", "PreToolUse", ...).
    pub kind: String,
    /// The outcome ("allow", "deny", "deny_redirect", "blocked", ...).
    pub outcome: String,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub duration_ms: u128,
}

/// Resolve the activity log path.
pub fn log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SECRET_GATE_LOG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|h| h.join(".secret-gate/activity.log"))
}

/// Append an entry to the activity log.
pub fn record(entry: &ActivityEntry) -> std::io::Result<()> {
    let Some(path) = log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry() -> ActivityEntry {
        ActivityEntry {
            timestamp: Utc::now(),
            kind: "raw_text".to_string(),
            outcome: "filtered".to_string(),
            input_bytes: 64,
            output_bytes: 48,
            duration_ms: Duration::from_millis(2).as_millis(),
        }
    }

    #[test]
    fn test_record_appends_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("activity.log");
        // Not using record() here: it resolves the path from the
        // environment, which races with other tests. Write directly.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();
        for _ in 0..2 {
            let json = serde_json::to_string(&entry()).unwrap();
            writeln!(file, "{json}").unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"kind\":\"raw_text\""));
        assert!(content.contains("\"outcome\":\"filtered\""));
    }

    #[test]
    fn test_entry_serializes_all_fields() {
        let json = serde_json::to_string(&entry()).unwrap();
        for field in [
            "timestamp",
            "kind",
            "outcome",
            "input_bytes",
            "output_bytes",
            "duration_ms",
        ] {
            assert!(json.contains(field), "missing field {field}");
        }
    }
}
