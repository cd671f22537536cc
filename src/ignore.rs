//! `.vcignore` pattern matching.
//!
//! `<workdir>/.vcignore`, if present, holds one regex pattern per line. A
//! path is ignored if any pattern matches it anchored (`^pattern$`). The
//! metadata directory name itself is always ignored, regardless of the file.

use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};
use crate::fs::META_DIR;

/// Default name of the ignore file, used unless a repository is constructed
/// with a different one.
pub const DEFAULT_IGNORE_FILE: &str = ".vcignore";

#[derive(Debug)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Load rules for the repository rooted at `workdir`, reading patterns
    /// from `ignore_file` (relative to `workdir`) if it exists. Always
    /// includes an implicit rule ignoring the metadata directory itself.
    pub fn load(workdir: &Path, ignore_file: &str) -> Result<Self> {
        let mut patterns = vec![anchored(META_DIR)?];

        let ignore_path = workdir.join(ignore_file);
        if ignore_path.is_file() {
            let content = std::fs::read_to_string(&ignore_path)
                .map_err(|e| Error::io(&ignore_path, e))?;
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                patterns.push(anchored(line)?);
            }
        }

        Ok(Self { patterns })
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(path))
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^{pattern}$"))
        .map_err(|e| Error::Corrupt(format!("invalid ignore pattern {pattern:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn meta_dir_always_ignored() {
        let dir = tempdir().unwrap();
        let rules = IgnoreRules::load(dir.path(), DEFAULT_IGNORE_FILE).unwrap();
        assert!(rules.is_ignored(".vc"));
    }

    #[test]
    fn loads_patterns_from_ignore_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".vcignore"), "target\n.*\\.log\n").unwrap();
        let rules = IgnoreRules::load(dir.path(), DEFAULT_IGNORE_FILE).unwrap();
        assert!(rules.is_ignored("target"));
        assert!(rules.is_ignored("debug.log"));
        assert!(!rules.is_ignored("README"));
    }

    #[test]
    fn patterns_are_anchored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".vcignore"), "log\n").unwrap();
        let rules = IgnoreRules::load(dir.path(), DEFAULT_IGNORE_FILE).unwrap();
        assert!(rules.is_ignored("log"));
        assert!(!rules.is_ignored("alog"));
        assert!(!rules.is_ignored("logs"));
    }

    #[test]
    fn honors_custom_ignore_file_name() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".customignore"), "target\n").unwrap();
        let rules = IgnoreRules::load(dir.path(), ".customignore").unwrap();
        assert!(rules.is_ignored("target"));

        let defaults = IgnoreRules::load(dir.path(), DEFAULT_IGNORE_FILE).unwrap();
        assert!(!defaults.is_ignored("target"));
    }
}
