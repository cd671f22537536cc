//! `commit`: record the staged tree as a new commit.
//!
//! ## Usage
//!
//! ```bash
//! vc commit -m "message"
//! ```

use anyhow::Result;

use crate::db::ObjectDb;
use crate::index::Index;
use crate::Repository;

pub fn run(message: &str) -> Result<()> {
    let repository = Repository::find()?;
    let db = ObjectDb::new(repository.meta_dir.clone());
    let index = Index::load(&repository.meta_dir)?;

    if index.entries().next().is_none() {
        println!("nothing to commit, working tree clean");
        return Ok(());
    }

    let key = index.commit(&db, &repository.meta_dir, Some(message))?;
    let entry_count = index.entries().count();
    println!("[{}] {}", &key[..7.min(key.len())], message);
    println!(" {entry_count} file(s) changed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectType;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn commit_advances_branch() {
        let temp = tempdir().unwrap();
        let repo = Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let db = ObjectDb::new(repo.meta_dir.clone());
        std::fs::write(temp.path().join("a.txt"), "hi").unwrap();
        let mut index = Index::load(&repo.meta_dir).unwrap();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("a.txt"))
            .unwrap();

        run("first commit").unwrap();

        let (_, tip) = crate::refs::branch_current(&repo.meta_dir).unwrap();
        assert!(!tip.is_empty());
        let stored = db.get(&tip).unwrap();
        assert_eq!(stored.object_type, ObjectType::Commit);
    }

    #[test]
    fn commit_with_empty_index_is_a_no_op() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        run("nothing staged").unwrap();

        let repository = Repository::find().unwrap();
        let (_, tip) = crate::refs::branch_current(&repository.meta_dir).unwrap();
        assert!(tip.is_empty());
    }
}
