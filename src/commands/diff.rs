//! `diff`: show context diffs between the index and the working tree.
//!
//! ## Usage
//!
//! ```bash
//! vc diff
//! vc diff file1.txt file2.txt
//! ```

use anyhow::Result;

use crate::index::Index;
use crate::repo::Repo;
use crate::Repository;

pub fn run(files: Vec<String>) -> Result<()> {
    let repository = Repository::find()?;
    let repo = Repo::open(&repository);
    let index = Index::load(&repository.meta_dir)?;

    for hunk in repo.diff(&index, &files)? {
        print!("{hunk}");
    }
    Ok(())
}
