//! `branch`: list, create, delete, or rename branches.
//!
//! ## Usage
//!
//! ```bash
//! vc branch
//! vc branch feature
//! vc branch -d old-branch
//! vc branch -m old-name new-name
//! ```

use anyhow::Result;

use crate::refs;
use crate::Repository;

pub fn run(names: Vec<String>, delete: bool, rename: bool) -> Result<()> {
    let repository = Repository::find()?;
    let meta_dir = &repository.meta_dir;

    if delete {
        let name = names
            .first()
            .ok_or_else(|| anyhow::anyhow!("branch name required for deletion"))?;
        let short = refs::branch_delete(meta_dir, name)?;
        println!("Deleted branch {name} (was {short})");
        return Ok(());
    }

    if rename {
        if names.len() != 2 {
            anyhow::bail!("branch -m requires <old> <new>");
        }
        refs::branch_rename(meta_dir, &names[0], &names[1])?;
        println!("Renamed branch {} to {}", names[0], names[1]);
        return Ok(());
    }

    if let Some(name) = names.first() {
        refs::branch_create(meta_dir, name)?;
        println!("Created branch '{name}'");
        return Ok(());
    }

    let (branches, current) = refs::list_branches(meta_dir)?;
    for branch in branches {
        if current.as_deref() == Some(branch.as_str()) {
            println!("* {branch}");
        } else {
            println!("  {branch}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn branch_create_then_list() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        run(vec!["feature".to_string()], false, false).unwrap();
        run(vec![], false, false).unwrap();

        let repository = Repository::find().unwrap();
        assert!(refs::branch_exists(&repository.meta_dir, "feature"));
    }

    #[test]
    fn branch_rename_updates_head() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        run(vec!["master".to_string(), "trunk".to_string()], false, true).unwrap();

        let repository = Repository::find().unwrap();
        let (branch, _) = refs::branch_current(&repository.meta_dir).unwrap();
        assert_eq!(branch.as_deref(), Some("trunk"));
    }

    #[test]
    fn branch_delete_non_current() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        run(vec!["feature".to_string()], false, false).unwrap();
        run(vec!["feature".to_string()], true, false).unwrap();

        let repository = Repository::find().unwrap();
        assert!(!refs::branch_exists(&repository.meta_dir, "feature"));
    }
}
