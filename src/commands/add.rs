//! `add`: stage files for the next commit.
//!
//! ## Usage
//!
//! ```bash
//! vc add file.txt
//! vc add file1.txt file2.txt
//! vc add .
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::db::ObjectDb;
use crate::ignore::IgnoreRules;
use crate::index::Index;
use crate::Repository;

/// Expand a single CLI path argument into the set of regular files it
/// names, recursing into directories and skipping ignored paths.
fn expand_path(workdir: &Path, ignore_rules: &IgnoreRules, path: &Path) -> Result<Vec<PathBuf>> {
    let full = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workdir.join(path)
    };

    if full.is_file() {
        return Ok(vec![full]);
    }
    if !full.is_dir() {
        anyhow::bail!("pathspec '{}' did not match any files", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&full).into_iter().filter_map(|e| e.ok()) {
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }
        let relative = entry_path
            .strip_prefix(workdir)
            .unwrap_or(entry_path)
            .to_string_lossy()
            .replace('\\', "/");
        if ignore_rules.is_ignored(&relative) {
            continue;
        }
        files.push(entry_path.to_path_buf());
    }
    Ok(files)
}

pub fn run(paths: Vec<String>) -> Result<()> {
    let repository = Repository::find()?;
    let db = ObjectDb::new(repository.meta_dir.clone());
    let ignore_rules = IgnoreRules::load(&repository.workdir, &repository.ignore_file)?;
    let mut index = Index::load(&repository.meta_dir)?;

    for path_str in &paths {
        let path = PathBuf::from(path_str);
        let files = expand_path(&repository.workdir, &ignore_rules, &path)
            .context(format!("pathspec '{path_str}' did not match any files"))?;
        for file in files {
            index.stage_file(&db, &repository.meta_dir, &repository.workdir, &file)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn add_stages_single_file() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        std::fs::write(temp.path().join("test.txt"), b"test content").unwrap();

        run(vec!["test.txt".to_string()]).unwrap();

        let repository = Repository::find().unwrap();
        let index = Index::load(&repository.meta_dir).unwrap();
        assert!(index.get("test.txt").is_some());
    }

    #[test]
    fn add_expands_directory_skipping_ignored() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        std::fs::create_dir(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("src/lib.rs"), b"fn main() {}").unwrap();
        std::fs::write(temp.path().join(".vcignore"), "src/ignored\\.rs\n").unwrap();
        std::fs::write(temp.path().join("src/ignored.rs"), b"nope").unwrap();

        run(vec!["src".to_string()]).unwrap();

        let repository = Repository::find().unwrap();
        let index = Index::load(&repository.meta_dir).unwrap();
        assert!(index.get("src/lib.rs").is_some());
        assert!(index.get("src/ignored.rs").is_none());
    }
}
