//! `status`: show the working tree status.
//!
//! ## Usage
//!
//! ```bash
//! vc status
//! ```

use anyhow::Result;

use crate::index::Index;
use crate::repo::{FileStatus, RepoStatus};
use crate::Repository;

pub fn run() -> Result<()> {
    let repository = Repository::find()?;
    let index = Index::load(&repository.meta_dir)?;
    let repo = crate::repo::Repo::open(&repository);
    let status = repo.status(&index)?;

    print_status(&status);
    Ok(())
}

fn print_status(status: &RepoStatus) {
    match &status.branch {
        Some(branch) => println!("On branch {branch}"),
        None if status.detached_short_tip.is_empty() => println!("HEAD detached"),
        None => println!("HEAD detached at {}", status.detached_short_tip),
    }
    println!();

    if status.staged.is_empty() && status.not_staged.is_empty() && status.not_tracked.is_empty() {
        println!("nothing to commit, working tree clean");
        return;
    }

    if !status.staged.is_empty() {
        println!("Changes to be committed:");
        println!();
        for entry in &status.staged {
            println!("        {:<11} {}", label(entry.status), entry.path);
        }
        println!();
    }

    if !status.not_staged.is_empty() {
        println!("Changes not staged for commit:");
        println!();
        for entry in &status.not_staged {
            println!("        {:<11} {}", label(entry.status), entry.path);
        }
        println!();
    }

    if !status.not_tracked.is_empty() {
        println!("Untracked files:");
        println!();
        for path in &status.not_tracked {
            println!("        {path}");
        }
        println!();
    }
}

fn label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::New => "new file:",
        FileStatus::Modified => "modified:",
        FileStatus::Deleted => "deleted:",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn status_runs_on_empty_repo() {
        let temp = tempdir().unwrap();
        Repository::init(temp.path(), "master").unwrap();
        std::env::set_current_dir(temp.path()).unwrap();
        run().unwrap();
    }
}
