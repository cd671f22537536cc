//! `DirDict`: the shared in-memory projection used by status, checkout, and
//! diff. Maps a directory path (`""` for the workdir root) to an ordered list
//! of entries it directly contains.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    File,
    Dir,
}

impl Kind {
    pub fn as_char(self) -> char {
        match self {
            Kind::File => 'f',
            Kind::Dir => 'd',
        }
    }

    pub fn from_char(c: char) -> Option<Kind> {
        match c {
            'f' => Some(Kind::File),
            'd' => Some(Kind::Dir),
            _ => None,
        }
    }
}

/// One entry of a directory listing. `name` carries the full path relative
/// to the workdir root for file entries stored in a `DirDict` (this is what
/// lets status/diff compare entries across the staging/working/HEAD dicts by
/// identity), not just the basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: Kind,
    pub key: String,
}

#[derive(Debug, Clone, Default)]
pub struct DirDict(pub BTreeMap<String, Vec<DirEntry>>);

impl DirDict {
    pub fn new() -> Self {
        DirDict(BTreeMap::new())
    }

    pub fn entry(&mut self, dir: &str) -> &mut Vec<DirEntry> {
        self.0.entry(dir.to_string()).or_default()
    }

    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|s| s.as_str())
    }

    /// True if `dir` has a file entry named exactly `name`.
    pub fn contains_file(&self, dir: &str, name: &str) -> bool {
        self.find_entry(dir, name).is_some()
    }

    /// All file names (full relative paths) across every directory.
    pub fn all_file_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for entries in self.0.values() {
            for e in entries {
                if e.kind == Kind::File {
                    names.push(e.name.clone());
                }
            }
        }
        names
    }

    pub fn find_entry(&self, dir: &str, name: &str) -> Option<&DirEntry> {
        self.0
            .get(dir)
            .and_then(|entries| entries.iter().find(|e| e.name == name))
    }
}

/// Split `path` into `(parent_dir, basename)`. `""` is returned for a
/// top-level path's parent.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

/// All proper ancestor directories of `dir`, root-first, not including `dir`
/// itself nor the `""` root (the caller is expected to always include `""`).
pub fn ancestors(dir: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut rest = dir;
    while let Some((parent, _)) = rest.rsplit_once('/') {
        result.push(parent.to_string());
        rest = parent;
    }
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_path_top_level() {
        assert_eq!(split_path("README"), ("", "README"));
    }

    #[test]
    fn split_path_nested() {
        assert_eq!(split_path("src/lib.rs"), ("src", "lib.rs"));
        assert_eq!(split_path("a/b/c.txt"), ("a/b", "c.txt"));
    }

    #[test]
    fn ancestors_of_nested_dir() {
        assert_eq!(ancestors("a/b/c"), vec!["a".to_string(), "a/b".to_string()]);
    }

    #[test]
    fn ancestors_of_top_level_dir_is_empty() {
        assert!(ancestors("a").is_empty());
    }

    #[test]
    fn find_entry_looks_up_by_name_within_dir() {
        let mut dd = DirDict::new();
        dd.entry("").push(DirEntry {
            name: "README".into(),
            kind: Kind::File,
            key: "k1".into(),
        });
        assert!(dd.contains_file("", "README"));
        assert!(!dd.contains_file("", "other"));
    }
}
