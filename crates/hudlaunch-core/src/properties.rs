use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flat `key=value` settings file.
///
/// One entry per line, `#` prefix marks a comment line. The whole mapping is
/// rewritten on every [`set`](Properties::set), so comments do not survive a
/// write. This is the persisted-settings format of the product, not a real
/// INI dialect.
pub struct Properties {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl Properties {
    /// Load the settings file at `path`.
    ///
    /// A missing or unreadable file yields an empty store; that is the normal
    /// first-run condition, not an error. Lines split on the first `=` only,
    /// so values may contain further `=` characters. When a key occurs twice
    /// the last occurrence wins.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = HashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                for row in content.lines() {
                    if row.is_empty() || row.starts_with('#') {
                        continue;
                    }
                    let (key, value) = match row.split_once('=') {
                        Some((k, v)) => (k.to_string(), v.to_string()),
                        // No separator: the whole line is the key
                        None => (row.to_string(), String::new()),
                    };
                    debug!("k: {}, v: {}", key, value);
                    entries.insert(key, value);
                }
            }
            Err(e) => {
                debug!("Cannot load the config file {:?}: {}", path, e);
            }
        }

        Self { path, entries }
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Replace (or insert) `key`, then rewrite the whole file.
    ///
    /// The write is synchronous and not transactional; a failure propagates
    /// to the caller and the file may be left behind the in-memory state.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());

        let mut content = String::new();
        for (k, v) in &self.entries {
            content.push_str(k);
            content.push('=');
            content.push_str(v);
            content.push('\n');
        }

        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Path this store reads from and writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
