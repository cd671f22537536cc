//! The index (staging area): a persistent flat map from workdir-relative
//! paths to staged blob keys, and the bridge between it and committed tree
//! objects.
//!
//! Persisted at `R/index`, one entry per line: `"<key> <kind> <path>\n"`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::db::ObjectDb;
use crate::dirdict::{ancestors, split_path, DirDict, DirEntry, Kind};
use crate::error::{Error, Result};
use crate::objects::{Commit, ObjectType, Tree, TreeEntry};
use crate::refs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub kind: Kind,
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(meta_dir: &Path) -> Result<Self> {
        let path = meta_dir.join("index");
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let mut entries = BTreeMap::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ' ');
            let key = parts
                .next()
                .ok_or_else(|| Error::Corrupt(format!("malformed index line: {line:?}")))?
                .to_string();
            let kind_char = parts
                .next()
                .and_then(|s| s.chars().next())
                .ok_or_else(|| Error::Corrupt(format!("malformed index line: {line:?}")))?;
            let kind = Kind::from_char(kind_char)
                .ok_or_else(|| Error::Corrupt(format!("unknown index entry kind: {kind_char}")))?;
            let entry_path = parts
                .next()
                .ok_or_else(|| Error::Corrupt(format!("malformed index line: {line:?}")))?
                .to_string();
            entries.insert(
                entry_path.clone(),
                IndexEntry {
                    key,
                    kind,
                    path: entry_path,
                },
            );
        }
        Ok(Self { entries })
    }

    pub fn save(&self, meta_dir: &Path) -> Result<()> {
        let mut content = String::new();
        for entry in self.entries.values() {
            content.push_str(&entry.key);
            content.push(' ');
            content.push(entry.kind.as_char());
            content.push(' ');
            content.push_str(&entry.path);
            content.push('\n');
        }
        crate::fs::write_file(meta_dir, "index", &content)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Stage `path` (relative to `workdir`). Rejects directories and
    /// non-regular files outright; the CLI layer is responsible for
    /// recursively expanding a directory argument into individual files.
    pub fn stage_file(
        &mut self,
        db: &ObjectDb,
        meta_dir: &Path,
        workdir: &Path,
        path: &Path,
    ) -> Result<()> {
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            workdir.join(path)
        };

        if full_path.is_dir() {
            return Err(Error::Unsupported(format!(
                "staging a directory is not supported: {}",
                path.display()
            )));
        }
        if !full_path.is_file() {
            return Err(Error::NotFound(full_path.display().to_string()));
        }

        let relpath = full_path
            .strip_prefix(workdir)
            .unwrap_or(&full_path)
            .to_string_lossy()
            .replace('\\', "/");

        let bytes = std::fs::read(&full_path).map_err(|e| Error::io(&full_path, e))?;
        let key = db.put(&bytes, ObjectType::Blob)?;

        self.entries.insert(
            relpath.clone(),
            IndexEntry {
                key,
                kind: Kind::File,
                path: relpath,
            },
        );
        self.save(meta_dir)
    }

    pub fn remove_file(&mut self, meta_dir: &Path, path: &str) -> Result<()> {
        if self.entries.remove(path).is_none() {
            return Err(Error::NotFound(path.to_string()));
        }
        self.save(meta_dir)
    }

    pub fn unstage_file(&mut self, _path: &str) -> Result<()> {
        Err(Error::Unsupported(
            "unstage is not yet designed".to_string(),
        ))
    }

    /// Project the index into a [`DirDict`] of files only, no directory
    /// placeholders.
    pub fn dirtree(&self) -> DirDict {
        let mut dd = DirDict::new();
        dd.entry("");
        for entry in self.entries.values() {
            let (dir, _name) = split_path(&entry.path);
            dd.entry(dir).push(DirEntry {
                name: entry.path.clone(),
                kind: Kind::File,
                key: entry.key.clone(),
            });
        }
        dd
    }

    /// Replace the index contents with the files enumerated in `dd`.
    pub fn set_to_dirtree(&mut self, meta_dir: &Path, dd: &DirDict) -> Result<()> {
        self.entries.clear();
        for entries in dd.0.values() {
            for entry in entries {
                if entry.kind == Kind::File {
                    self.entries.insert(
                        entry.name.clone(),
                        IndexEntry {
                            key: entry.key.clone(),
                            kind: Kind::File,
                            path: entry.name.clone(),
                        },
                    );
                }
            }
        }
        self.save(meta_dir)
    }

    /// Fold the flat index into a tree of tree objects, returning the root
    /// tree's key.
    pub fn save_to_db(&self, db: &ObjectDb) -> Result<String> {
        let mut dict: DirDict = DirDict::new();
        dict.entry("");

        for entry in self.entries.values() {
            let (dir, name) = split_path(&entry.path);
            dict.entry(dir).push(DirEntry {
                name: name.to_string(),
                kind: Kind::File,
                key: entry.key.clone(),
            });
            for ancestor in ancestors(dir) {
                dict.entry(&ancestor);
            }
            dict.entry(dir);
        }

        let mut dirs: Vec<String> = dict.dirs().map(|s| s.to_string()).collect();
        dirs.sort();
        for dir in &dirs {
            if dir.is_empty() {
                continue;
            }
            let (parent, _) = split_path(dir);
            let already_present = dict
                .0
                .get(parent)
                .map(|entries| entries.iter().any(|e| e.kind == Kind::Dir && e.name == *dir))
                .unwrap_or(false);
            if !already_present {
                dict.entry(parent).push(DirEntry {
                    name: dir.clone(),
                    kind: Kind::Dir,
                    key: String::new(),
                });
            }
        }

        build_tree(&dict, "", db)
    }

    /// Resolve the current branch's tip, build the tree, wrap it in a new
    /// commit, and advance the branch ref (or detached HEAD).
    pub fn commit(&self, db: &ObjectDb, meta_dir: &Path, message: Option<&str>) -> Result<String> {
        let (branch, tip) = refs::branch_current(meta_dir)?;
        let tree_key = self.save_to_db(db)?;
        let parents = if tip.is_empty() { vec![] } else { vec![tip] };
        let message = message.unwrap_or("(no message)");
        let commit = Commit::new(tree_key, parents, message);
        let key = db.put_text(&commit.serialize(), ObjectType::Commit)?;
        refs::head_advance(meta_dir, &branch, &key)?;
        log::info!("committed {key} on {:?}", branch);
        Ok(key)
    }
}

fn build_tree(dict: &DirDict, dir: &str, db: &ObjectDb) -> Result<String> {
    let mut tree = Tree::new();
    if let Some(entries) = dict.0.get(dir) {
        for entry in entries {
            match entry.kind {
                Kind::File => tree.push(TreeEntry::file(entry.name.clone(), entry.key.clone())),
                Kind::Dir => {
                    let key = build_tree(dict, &entry.name, db)?;
                    tree.push(TreeEntry::directory(entry.name.clone(), key));
                }
            }
        }
    }
    tree.sort();
    db.put_text(&tree.serialize(), ObjectType::Tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Repository;
    use tempfile::tempdir;

    fn fresh() -> (tempfile::TempDir, Repository, ObjectDb) {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path(), "master").unwrap();
        let db = ObjectDb::new(repo.meta_dir.clone());
        (dir, repo, db)
    }

    #[test]
    fn stage_file_records_blob_key() {
        let (dir, repo, db) = fresh();
        std::fs::write(dir.path().join("README"), "abc").unwrap();

        let mut index = Index::new();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("README"))
            .unwrap();

        let entry = index.get("README").unwrap();
        assert_eq!(entry.key, db.calculate_key(b"abc", ObjectType::Blob).unwrap());
    }

    #[test]
    fn stage_file_rejects_directory() {
        let (dir, repo, db) = fresh();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut index = Index::new();
        assert!(matches!(
            index.stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("sub")),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn stage_twice_is_idempotent() {
        let (dir, repo, db) = fresh();
        std::fs::write(dir.path().join("README"), "abc").unwrap();
        let mut index = Index::new();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("README"))
            .unwrap();
        let before = index.get("README").cloned().unwrap();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("README"))
            .unwrap();
        let after = index.get("README").cloned().unwrap();
        assert_eq!(before, after);
        assert_eq!(index.entries().count(), 1);
    }

    #[test]
    fn save_to_db_builds_nested_trees() {
        let (dir, repo, db) = fresh();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("README"), "abc").unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "fn main() {}").unwrap();

        let mut index = Index::new();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("README"))
            .unwrap();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("src/lib.rs"))
            .unwrap();

        let root_key = index.save_to_db(&db).unwrap();
        let root = db.get(&root_key).unwrap();
        let tree = Tree::parse(&root.text().unwrap()).unwrap();
        assert!(tree.entries.iter().any(|e| e.name == "README"));
        assert!(tree
            .entries
            .iter()
            .any(|e| e.name == "src" && e.kind == Kind::Dir));
    }

    #[test]
    fn commit_advances_branch_and_links_parent() {
        let (dir, repo, db) = fresh();
        std::fs::write(dir.path().join("README"), "abc").unwrap();
        let mut index = Index::new();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("README"))
            .unwrap();
        let first = index.commit(&db, &repo.meta_dir, Some("first")).unwrap();

        std::fs::write(dir.path().join("README"), "abcdef").unwrap();
        index
            .stage_file(&db, &repo.meta_dir, &repo.workdir, Path::new("README"))
            .unwrap();
        let second = index.commit(&db, &repo.meta_dir, Some("second")).unwrap();

        let commit = Commit::parse(&db.get(&second).unwrap().text().unwrap()).unwrap();
        assert_eq!(commit.parents, vec![first]);

        let (_, tip) = refs::branch_current(&repo.meta_dir).unwrap();
        assert_eq!(tip, second);
    }

    #[test]
    fn unstage_file_is_unsupported() {
        let mut index = Index::new();
        assert!(matches!(
            index.unstage_file("anything"),
            Err(Error::Unsupported(_))
        ));
    }
}
