//! `cat-file`: inspect a single object by key.
//!
//! ## Usage
//!
//! ```bash
//! vc cat-file -t abc123
//! vc cat-file -s abc123
//! vc cat-file -p abc123
//! vc cat-file -e abc123
//! ```

use anyhow::Result;

use crate::db::ObjectDb;
use crate::objects::Tree;
use crate::Repository;

pub fn run(hash: &str, exists: bool, show_size: bool, show_type: bool, pretty_print: bool) -> Result<()> {
    let repository = Repository::find()?;
    let db = ObjectDb::new(repository.meta_dir.clone());

    if exists {
        return match db.get(hash) {
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };
    }

    let object = db.get(hash)?;

    if show_type {
        println!("{}", object.object_type);
        return Ok(());
    }
    if show_size {
        println!("{}", object.size);
        return Ok(());
    }
    if pretty_print {
        match object.object_type {
            crate::objects::ObjectType::Tree => {
                let tree = Tree::parse(&object.text()?)?;
                for entry in &tree.entries {
                    println!("{} {} {}", entry.kind.as_char(), entry.key, entry.name);
                }
            }
            _ => {
                print!("{}", String::from_utf8_lossy(&object.payload));
            }
        }
    }

    Ok(())
}
