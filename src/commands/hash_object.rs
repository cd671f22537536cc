//! `hash-object`: compute an object's key and optionally store it.
//!
//! ## Usage
//!
//! ```bash
//! vc hash-object README.md
//! vc hash-object -w README.md
//! echo hi | vc hash-object -w --stdin
//! ```

use std::io::Read as _;

use anyhow::{Context, Result};

use crate::db::ObjectDb;
use crate::objects::ObjectType;
use crate::Repository;

pub fn run(file: Option<&str>, stdin: bool, write: bool) -> Result<String> {
    let content = if stdin {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        let path = file.context("file argument is required unless --stdin is given")?;
        std::fs::read(path).context(format!("failed to read file: {path}"))?
    };

    let key = if write {
        let repository = Repository::find()?;
        let db = ObjectDb::new(repository.meta_dir.clone());
        db.put(&content, ObjectType::Blob)?
    } else {
        let db = ObjectDb::new(std::path::PathBuf::new());
        db.calculate_key(&content, ObjectType::Blob)?
    };

    println!("{key}");
    Ok(key)
}
