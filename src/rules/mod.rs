//! Compiled rule set and policy predicates.

mod filter;

pub use filter::FilterResult;

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::config::{Config, ConfigError, PatternRule, RedactFilesConfig};

/// How a file-block entry matches candidate paths.
enum FileBlockMatcher {
    /// Entry contains a wildcard: glob match against the whole path.
    Glob(GlobMatcher),
    /// Plain entry: lowercase substring containment.
    Substring(String),
}

/// An immutable, fully compiled rule set.
///
/// Built once per invocation from the merged [`Config`]; every regex and
/// glob is compiled here so a bad rule fails at load time, not at decision
/// time.
pub struct RuleSet {
    patterns: Vec<(PatternRule, Regex)>,
    file_blocks: Vec<(String, FileBlockMatcher)>,
    search_blocks: Vec<String>,
    command_blocks: Vec<(String, Regex)>,
    redact_files: RedactFilesConfig,
}

impl Config {
    /// Compile every pattern for matching. Any compile failure is fatal.
    pub fn compile(self) -> Result<RuleSet, ConfigError> {
        let patterns = self
            .patterns
            .into_iter()
            .map(|rule| {
                let re = Regex::new(&rule.regex).map_err(|e| ConfigError::Regex {
                    rule: rule.name.clone(),
                    source: e,
                })?;
                Ok((rule, re))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let file_blocks = self
            .file_blocks
            .into_iter()
            .map(|entry| {
                let matcher = if entry.contains('*') || entry.contains('?') {
                    let glob = GlobBuilder::new(&entry)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| ConfigError::Glob {
                            pattern: entry.clone(),
                            source: e,
                        })?;
                    FileBlockMatcher::Glob(glob.compile_matcher())
                } else {
                    FileBlockMatcher::Substring(entry.to_lowercase())
                };
                Ok((entry, matcher))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let command_blocks = self
            .command_blocks
            .into_iter()
            .map(|pattern| {
                let re = Regex::new(&format!("(?i){pattern}")).map_err(|e| {
                    ConfigError::Regex {
                        rule: pattern.clone(),
                        source: e,
                    }
                })?;
                Ok((pattern, re))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(RuleSet {
            patterns,
            file_blocks,
            search_blocks: self.search_blocks,
            command_blocks,
            redact_files: self.redact_files,
        })
    }
}

impl RuleSet {
    pub(crate) fn patterns(&self) -> &[(PatternRule, Regex)] {
        &self.patterns
    }

    /// Raw file-block entries, used for the coarse Glob-pattern check.
    pub fn file_block_entries(&self) -> impl Iterator<Item = &str> {
        self.file_blocks.iter().map(|(entry, _)| entry.as_str())
    }

    /// Should access to this path be blocked entirely?
    ///
    /// Entries with a wildcard use glob semantics (`*` may span directory
    /// separators), plain entries use substring containment; both are
    /// case-insensitive. First match wins.
    pub fn should_block_file(&self, path: &str) -> Option<String> {
        let path_lower = path.to_lowercase();
        for (_, matcher) in &self.file_blocks {
            let hit = match matcher {
                FileBlockMatcher::Glob(glob) => glob.is_match(path),
                FileBlockMatcher::Substring(needle) => path_lower.contains(needle),
            };
            if hit {
                return Some(format!("Access denied to sensitive file: {path}"));
            }
        }
        None
    }

    /// Should this search pattern be blocked?
    pub fn should_block_search(&self, pattern: &str) -> Option<String> {
        let pattern_lower = pattern.to_lowercase();
        for blocked in &self.search_blocks {
            if pattern_lower.contains(&blocked.to_lowercase()) {
                return Some(format!(
                    "Search pattern may expose sensitive data: {pattern}"
                ));
            }
        }
        None
    }

    /// Should this shell command be blocked?
    pub fn should_block_command(&self, command: &str) -> Option<String> {
        let command_lower = command.to_lowercase();
        for (_, re) in &self.command_blocks {
            if re.is_match(&command_lower) {
                return Some(format!("Command may expose sensitive data: {command}"));
            }
        }
        None
    }

    /// Should this file be redacted (rather than blocked) on read?
    ///
    /// Never blocks by itself; it only gates the redact-and-redirect path.
    pub fn should_redact_file(&self, path: &str) -> bool {
        if self.redact_files.is_empty() {
            return false;
        }

        let path_lower = path.to_lowercase();
        for ext in &self.redact_files.extensions {
            if !ext.is_empty() && path_lower.ends_with(&ext.to_lowercase()) {
                return true;
            }
        }

        let base_name = std::path::Path::new(&path_lower)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for needle in &self.redact_files.filename_substrings {
            if !needle.is_empty() && base_name.contains(&needle.to_lowercase()) {
                return true;
            }
        }

        false
    }
}
