//! Filesystem helpers, rooted at the repository metadata directory `R`.
//!
//! These mirror a small set of primitives every other module builds on:
//! read/write a file under `R` (creating parent dirs as needed), check
//! existence, list files in a directory, and find or create `R` itself by
//! walking up from a starting directory.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const META_DIR: &str = ".vc";

/// Walk upward from `start` looking for a `META_DIR` directory. Returns the
/// path to `R` (the metadata directory itself), not the workdir.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.canonicalize().ok()?;
    loop {
        let candidate = current.join(META_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Create `R` under `parent_dir`. Fails if it already exists.
pub fn create_repo_root(parent_dir: &Path) -> Result<PathBuf> {
    let root = parent_dir.join(META_DIR);
    if root.exists() {
        return Err(Error::Exists(root.display().to_string()));
    }
    std::fs::create_dir_all(root.join("objects")).map_err(|e| Error::io(&root, e))?;
    std::fs::create_dir_all(root.join("refs").join("heads")).map_err(|e| Error::io(&root, e))?;
    Ok(root)
}

/// Read `R/relpath`, returning an empty string if the file does not exist.
/// Trailing whitespace (the trailing newline every `write_file` appends) is
/// trimmed.
pub fn read_file(root: &Path, relpath: &str) -> Result<String> {
    let path = root.join(relpath);
    if !path.exists() {
        return Ok(String::new());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    Ok(contents.trim_end().to_string())
}

/// Write `contents` (plus a trailing newline) to `R/relpath`, creating any
/// missing parent directories first.
pub fn write_file(root: &Path, relpath: &str, contents: &str) -> Result<()> {
    let path = root.join(relpath);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut data = contents.to_string();
    if !data.ends_with('\n') {
        data.push('\n');
    }
    std::fs::write(&path, data).map_err(|e| Error::io(&path, e))
}

pub fn remove_file(root: &Path, relpath: &str) -> Result<()> {
    let path = root.join(relpath);
    std::fs::remove_file(&path).map_err(|e| Error::io(&path, e))
}

pub fn rename_file(root: &Path, from: &str, to: &str) -> Result<()> {
    let from_path = root.join(from);
    let to_path = root.join(to);
    if let Some(parent) = to_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::rename(&from_path, &to_path).map_err(|e| Error::io(&from_path, e))
}

pub fn exists(root: &Path, relpath: &str) -> bool {
    root.join(relpath).exists()
}

/// List the plain-file (not directory) entries of `R/rel_path`.
pub fn list_files(root: &Path, rel_path: &str) -> Result<Vec<String>> {
    let dir = root.join(rel_path);
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.display().to_string()));
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))? {
        let entry = entry.map_err(|e| Error::io(&dir, e))?;
        if entry.path().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "HEAD", "refs/heads/master").unwrap();
        assert_eq!(read_file(dir.path(), "HEAD").unwrap(), "refs/heads/master");
    }

    #[test]
    fn read_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_file(dir.path(), "nope").unwrap(), "");
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "refs/heads/master", "abc").unwrap();
        assert!(dir.path().join("refs/heads/master").is_file());
    }

    #[test]
    fn find_repo_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let root = create_repo_root(dir.path()).unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let found = find_repo_root(&nested).unwrap();
        assert_eq!(found.canonicalize().unwrap(), root.canonicalize().unwrap());
    }

    #[test]
    fn find_repo_root_returns_none_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_repo_root(dir.path()).is_none());
    }
}
