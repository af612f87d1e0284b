//! Rule configuration: loading and layer merging.
//!
//! Three layers are merged in order: built-in defaults (compiled into the
//! binary), the user config at `~/.secret-gate/config.toml`, and the project
//! config at `.secret-gate.toml` in the working directory. A missing or
//! unparsable user/project layer is skipped; the built-in layer must parse.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The built-in rule layer, always loaded first.
const DEFAULT_RULES: &str = include_str!("../configs/default-rules.toml");

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid regex in rule '{rule}': {source}")]
    Regex {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// A single redaction pattern rule.
///
/// `replacement` is either a literal template (may reference capture groups)
/// or one of two special modes: `mask` (replace the match with an equal
/// number of mask characters) and `env_filter` (keep `KEY=`, replace the
/// value with a sentinel).
#[derive(Debug, Clone, Deserialize)]
pub struct PatternRule {
    /// Unique rule name; later layers override earlier rules by name.
    pub name: String,
    /// Regex matched against the text being filtered.
    pub regex: String,
    /// Replacement template or special mode (`mask`, `env_filter`).
    pub replacement: String,
}

/// Criteria for files that are redacted rather than blocked outright.
///
/// Both lists empty means the redact-on-read feature is disabled.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RedactFilesConfig {
    /// File extensions (suffix match, case-insensitive).
    pub extensions: Vec<String>,
    /// Substrings matched against the base name (case-insensitive).
    pub filename_substrings: Vec<String>,
}

impl RedactFilesConfig {
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty() && self.filename_substrings.is_empty()
    }
}

/// Raw rule configuration as it appears on disk.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Ordered redaction rules; order is significant at filter time.
    pub patterns: Vec<PatternRule>,

    /// File paths to block entirely. Entries containing a glob wildcard use
    /// glob semantics, others substring containment; both case-insensitive.
    pub file_blocks: Vec<String>,

    /// Search patterns to block (case-insensitive substring).
    pub search_blocks: Vec<String>,

    /// Command regexes to block (matched case-insensitively).
    pub command_blocks: Vec<String>,

    /// Files to redact-and-redirect instead of blocking.
    pub redact_files: RedactFilesConfig,
}

impl Config {
    /// Load configuration, merging built-in, user, and project layers.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(DEFAULT_RULES)?;

        if let Some(user) = Self::load_user_config() {
            config.merge(user);
        }

        let project_dir = cwd.unwrap_or(Path::new("."));
        if let Some(project) = Self::load_project_config(project_dir) {
            config.merge(project);
        }

        Ok(config)
    }

    /// Load the user-level config. A missing or broken file is skipped.
    fn load_user_config() -> Option<Self> {
        let path = Self::user_config_path()?;
        let content = fs::read_to_string(path).ok()?;
        toml::from_str(&content).ok()
    }

    /// Load the project-level config from `.secret-gate.toml`.
    fn load_project_config(cwd: &Path) -> Option<Self> {
        let content = fs::read_to_string(cwd.join(".secret-gate.toml")).ok()?;
        toml::from_str(&content).ok()
    }

    /// User config path. Respects SECRET_GATE_CONFIG for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SECRET_GATE_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|h| h.join(".secret-gate/config.toml"))
    }

    /// Merge an override layer into this one.
    ///
    /// Pattern rules merge by name: an override with a known name replaces
    /// the existing rule in place, new names append. String lists union by
    /// first occurrence, base order first. Both are deterministic given
    /// identical layers.
    pub fn merge(&mut self, other: Config) {
        for rule in other.patterns {
            match self.patterns.iter_mut().find(|p| p.name == rule.name) {
                Some(existing) => *existing = rule,
                None => self.patterns.push(rule),
            }
        }

        merge_unique(&mut self.file_blocks, other.file_blocks);
        merge_unique(&mut self.search_blocks, other.search_blocks);
        merge_unique(&mut self.command_blocks, other.command_blocks);
        merge_unique(
            &mut self.redact_files.extensions,
            other.redact_files.extensions,
        );
        merge_unique(
            &mut self.redact_files.filename_substrings,
            other.redact_files.filename_substrings,
        );
    }
}

/// Append items not already present, preserving first-seen order.
fn merge_unique(base: &mut Vec<String>, override_items: Vec<String>) {
    for item in override_items {
        if !base.contains(&item) {
            base.push(item);
        }
    }
}
