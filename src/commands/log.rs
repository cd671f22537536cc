//! `log`: display commit history, following the first-parent chain.
//!
//! ## Usage
//!
//! ```bash
//! vc log
//! vc log --oneline
//! ```

use anyhow::Result;

use crate::repo::Repo;
use crate::Repository;

pub fn run(oneline: bool) -> Result<()> {
    let repository = Repository::find()?;
    let repo = Repo::open(&repository);
    let entries = repo.log()?;

    if entries.is_empty() {
        println!("fatal: your current branch does not have any commits yet");
        return Ok(());
    }

    for entry in entries {
        let short = &entry.key[..7.min(entry.key.len())];
        if oneline {
            println!("{short} {}", entry.short_comment);
        } else {
            println!("commit {}", entry.key);
            println!();
            println!("    {}", entry.short_comment);
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn log_on_empty_repo_prints_fatal_message() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        run(true).unwrap();
    }

    #[test]
    fn log_lists_committed_history() {
        let temp = tempdir().unwrap();
        let repository = Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let repo = Repo::open(&repository);
        std::fs::write(temp.path().join("a"), "1").unwrap();
        let mut index = crate::index::Index::load(&repository.meta_dir).unwrap();
        index
            .stage_file(&repo.db, &repository.meta_dir, &repository.workdir, Path::new("a"))
            .unwrap();
        index.commit(&repo.db, &repository.meta_dir, Some("first")).unwrap();

        run(true).unwrap();
    }
}
