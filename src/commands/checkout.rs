//! `checkout`: switch branches or detach onto a commit.
//!
//! ## Usage
//!
//! ```bash
//! vc checkout feature
//! vc checkout -b feature
//! vc checkout abc1234
//! ```

use anyhow::Result;

use crate::index::Index;
use crate::repo::Repo;
use crate::Repository;

pub fn run(target: &str, create_branch: bool) -> Result<()> {
    let repository = Repository::find()?;
    let repo = Repo::open(&repository);
    let mut index = Index::load(&repository.meta_dir)?;

    let (short_comment, detached) = repo.checkout(&mut index, target, create_branch)?;

    if detached {
        println!("Note: checking out '{target}'.");
        println!("You are in 'detached HEAD' state.");
        println!("HEAD is now at {short_comment}");
    } else {
        println!("Switched to branch '{target}'");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn checkout_switches_to_new_branch() {
        let temp = tempdir().unwrap();
        let repository = Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let repo = Repo::open(&repository);
        std::fs::write(temp.path().join("a"), "1").unwrap();
        let mut index = Index::load(&repository.meta_dir).unwrap();
        index
            .stage_file(&repo.db, &repository.meta_dir, &repository.workdir, Path::new("a"))
            .unwrap();
        index.commit(&repo.db, &repository.meta_dir, Some("first")).unwrap();

        run("feature", true).unwrap();
        let (branch, _) = crate::refs::branch_current(&repository.meta_dir).unwrap();
        assert_eq!(branch.as_deref(), Some("feature"));
    }
}
