//! Content-addressed store for redacted copies of files and prompts.
//!
//! Entries live under one well-known directory whose whole tree is the unit
//! of lifecycle: it is created on first store and deleted wholesale on
//! session end. Names are derived from a sha256 digest of the key material,
//! so re-storing the same source overwrites the same entry.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Default cache root when no override is configured.
pub const DEFAULT_CACHE_DIR: &str = "/tmp/claude/redacted";

/// The redacted-content cache under a fixed root directory.
pub struct RedactCache {
    root: PathBuf,
}

impl RedactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root from the environment, or the well-known default.
    pub fn from_env() -> Self {
        let root = std::env::var("SECRET_GATE_CACHE_DIR")
            .unwrap_or_else(|_| DEFAULT_CACHE_DIR.to_string());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Is this path already inside the cache? Reads of cache entries are
    /// always allowed, otherwise a redirected read would loop forever.
    ///
    /// A path with `..` components is never treated as a cache path: it can
    /// lexically start with the root while resolving somewhere else
    /// entirely, which would turn the loop-prevention exemption into a
    /// policy bypass.
    pub fn contains(&self, path: &str) -> bool {
        let path = Path::new(path);
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return false;
        }
        path.starts_with(&self.root)
    }

    /// Store the redacted copy of a file; returns the entry path.
    pub fn store_file(&self, original_path: &str, redacted: &str) -> io::Result<PathBuf> {
        let base_name = Path::new(original_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let name = format!("{}_{}", digest_prefix(original_path), base_name);
        let header = format!(
            "# ***FILTERED*** REDACTED VERSION - Some sensitive values have been masked\n# Original: {original_path}\n\n"
        );
        self.write_entry(&name, &header, redacted)
    }

    /// Store the redacted copy of a user prompt; returns the entry path.
    pub fn store_prompt(&self, prompt: &str, redacted: &str) -> io::Result<PathBuf> {
        let name = format!("user_input_{}.txt", digest_prefix(prompt));
        let header = "# REDACTED USER INPUT - Sensitive values have been masked\n\n";
        self.write_entry(&name, header, redacted)
    }

    fn write_entry(&self, name: &str, header: &str, content: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        fs::write(&path, format!("{header}{content}"))?;
        Ok(path)
    }

    /// Remove the cache root recursively. Best-effort: a missing directory
    /// is success, and callers treat any error as non-fatal.
    pub fn purge(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Fixed-width hex digest prefix of the key material.
fn digest_prefix(key_material: &str) -> String {
    let digest = Sha256::digest(key_material.as_bytes());
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache() -> (TempDir, RedactCache) {
        let dir = TempDir::new().unwrap();
        let cache = RedactCache::new(dir.path().join("redacted"));
        (dir, cache)
    }

    #[test]
    fn test_store_file_writes_header_and_content() {
        let (_dir, cache) = cache();
        let path = cache.store_file("/app/.env.backup", "KEY=***FILTERED***").unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# ***FILTERED*** REDACTED VERSION"));
        assert!(written.contains("# Original: /app/.env.backup"));
        assert!(written.ends_with("KEY=***FILTERED***"));
    }

    #[test]
    fn test_store_file_name_is_deterministic() {
        let (_dir, cache) = cache();
        let first = cache.store_file("/app/config.json", "a").unwrap();
        let second = cache.store_file("/app/config.json", "b").unwrap();
        assert_eq!(first, second);
        assert!(first.file_name().unwrap().to_string_lossy().ends_with("_config.json"));
    }

    #[test]
    fn test_distinct_sources_get_distinct_entries() {
        let (_dir, cache) = cache();
        let a = cache.store_file("/one/config.json", "x").unwrap();
        let b = cache.store_file("/two/config.json", "x").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_store_prompt() {
        let (_dir, cache) = cache();
        let path = cache.store_prompt("secret prompt", "redacted prompt").unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# REDACTED USER INPUT"));
        assert!(written.contains("redacted prompt"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("user_input_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_contains() {
        let (_dir, cache) = cache();
        let entry = cache.store_file("/app/config.json", "x").unwrap();
        assert!(cache.contains(&entry.to_string_lossy()));
        assert!(!cache.contains("/app/config.json"));
    }

    #[test]
    fn test_contains_rejects_parent_traversal() {
        let (_dir, cache) = cache();
        let escape = format!("{}/../../../etc/passwd", cache.root().display());
        assert!(!cache.contains(&escape));
        let dotted_entry = format!("{}/../redacted/entry.txt", cache.root().display());
        assert!(!cache.contains(&dotted_entry));
    }

    #[test]
    fn test_purge_removes_everything() {
        let (_dir, cache) = cache();
        cache.store_file("/a/one.json", "1").unwrap();
        cache.store_file("/b/two.json", "2").unwrap();
        cache.store_prompt("three", "3").unwrap();
        cache.purge().unwrap();
        assert!(!cache.root().exists());
    }

    #[test]
    fn test_purge_missing_root_is_ok() {
        let (_dir, cache) = cache();
        assert!(cache.purge().is_ok());
    }

    #[test]
    fn test_store_recreates_root_after_purge() {
        let (_dir, cache) = cache();
        cache.store_file("/a/one.json", "1").unwrap();
        cache.purge().unwrap();
        let path = cache.store_file("/a/one.json", "1").unwrap();
        assert!(path.exists());
    }
}
