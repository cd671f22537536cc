//! `init`: create `R` and initialize branch/HEAD.
//!
//! ## Usage
//!
//! ```bash
//! vc init
//! vc init /path/to/repo
//! ```

use std::path::Path;

use anyhow::Result;

use crate::Repository;

pub fn run(path: Option<&Path>, initial_branch: &str) -> Result<()> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let repo = Repository::init(&target, initial_branch)?;
    println!(
        "initialized empty repository in {}",
        repo.meta_dir.display()
    );
    Ok(())
}
