//! A tree object represents a directory: an ordered list of entries mapping
//! names to blob or subtree keys.
//!
//! Wire format, one line per entry: `"<f|d> <40-hex-key> <name>\n"`. `name`
//! is everything after the second space to end of line (so it may itself
//! contain spaces); for `f` entries it is a filename, for `d` entries it is
//! a subdirectory path relative to the repository workdir.

use crate::dirdict::Kind;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: Kind,
    pub key: String,
    pub name: String,
}

impl TreeEntry {
    pub fn file(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: Kind::File,
            key: key.into(),
            name: name.into(),
        }
    }

    pub fn directory(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind: Kind::Dir,
            key: key.into(),
            name: name.into(),
        }
    }

    fn sort_key(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push(entry.kind.as_char());
            out.push(' ');
            out.push_str(&entry.key);
            out.push(' ');
            out.push_str(&entry.name);
            out.push('\n');
        }
        out
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ' ');
            let kind_char = parts
                .next()
                .and_then(|s| s.chars().next())
                .ok_or_else(|| Error::Corrupt(format!("malformed tree line: {line:?}")))?;
            let kind = Kind::from_char(kind_char)
                .ok_or_else(|| Error::Corrupt(format!("unknown tree entry kind: {kind_char}")))?;
            let key = parts
                .next()
                .ok_or_else(|| Error::Corrupt(format!("malformed tree line: {line:?}")))?
                .to_string();
            let name = parts
                .next()
                .ok_or_else(|| Error::Corrupt(format!("malformed tree line: {line:?}")))?
                .to_string();
            entries.push(TreeEntry { kind, key, name });
        }
        Ok(Self { entries })
    }
}
