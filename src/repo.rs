//! The repository layer: combines the index, the object DB, and reference
//! files into status, log, checkout, and diff — the three-way comparison
//! between HEAD, the index, and the working tree.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::db::ObjectDb;
use crate::dirdict::{split_path, DirDict, DirEntry, Kind};
use crate::diff;
use crate::error::{Error, Result};
use crate::ignore::IgnoreRules;
use crate::index::Index;
use crate::objects::{Commit, ObjectType, Tree};
use crate::refs;
use crate::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    New,
    Modified,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub path: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone)]
pub struct RepoStatus {
    pub branch: Option<String>,
    pub detached_short_tip: String,
    pub staged: Vec<StatusEntry>,
    pub not_staged: Vec<StatusEntry>,
    pub not_tracked: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub key: String,
    pub short_comment: String,
}

/// The repository layer proper: everything [`Repository`] locates or creates
/// on disk, wired up with an object DB ready to serve status/log/checkout/diff.
pub struct Repo {
    pub workdir: PathBuf,
    pub meta_dir: PathBuf,
    pub ignore_file: String,
    pub db: ObjectDb,
}

impl Repo {
    pub fn open(repository: &Repository) -> Self {
        Repo {
            workdir: repository.workdir.clone(),
            meta_dir: repository.meta_dir.clone(),
            ignore_file: repository.ignore_file.clone(),
            db: ObjectDb::new(repository.meta_dir.clone()),
        }
    }

    pub fn init_repo(path: &std::path::Path, initial_branch: &str) -> Result<(Repository, Self)> {
        let repository = Repository::init(path, initial_branch)?;
        let repo = Self::open(&repository);
        Ok((repository, repo))
    }

    fn build_head_dict(&self) -> Result<DirDict> {
        let (_, tip) = refs::branch_current(&self.meta_dir)?;
        let mut dd = DirDict::new();
        if tip.is_empty() {
            return Ok(dd);
        }
        let commit = match self.db.get(&tip) {
            Ok(obj) => Commit::parse(&obj.text()?)?,
            Err(_) => return Ok(dd),
        };
        self.add_tree_entries(&mut dd, "", &commit.tree)?;
        Ok(dd)
    }

    fn add_tree_entries(&self, dd: &mut DirDict, dir: &str, key: &str) -> Result<()> {
        let obj = match self.db.get(key) {
            Ok(obj) => obj,
            Err(_) => return Ok(()),
        };
        let tree = Tree::parse(&obj.text()?)?;
        dd.entry(dir);
        for entry in &tree.entries {
            match entry.kind {
                Kind::Dir => self.add_tree_entries(dd, &entry.name, &entry.key)?,
                Kind::File => {
                    let full = if dir.is_empty() {
                        entry.name.clone()
                    } else {
                        format!("{dir}/{}", entry.name)
                    };
                    dd.entry(dir).push(DirEntry {
                        name: full,
                        kind: Kind::File,
                        key: entry.key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Lists, per directory in `dirs` (plus the workdir root), the files and
    /// subdirectories physically present on disk, skipping ignored names.
    fn build_working_dict(&self, dirs: &[String], ignore: &IgnoreRules) -> Result<DirDict> {
        let mut dd = DirDict::new();
        let mut all_dirs: Vec<&str> = dirs.iter().map(|s| s.as_str()).collect();
        if !all_dirs.contains(&"") {
            all_dirs.push("");
        }

        for &dir in &all_dirs {
            let dir_path = if dir.is_empty() {
                self.workdir.clone()
            } else {
                self.workdir.join(dir)
            };
            if !dir_path.is_dir() {
                continue;
            }
            dd.entry(dir);
            let read = std::fs::read_dir(&dir_path).map_err(|e| Error::io(&dir_path, e))?;
            for item in read {
                let item = item.map_err(|e| Error::io(&dir_path, e))?;
                let name = item.file_name().to_string_lossy().to_string();
                if ignore.is_ignored(&name) {
                    continue;
                }
                let path = item.path();
                let kind = if path.is_dir() { Kind::Dir } else { Kind::File };
                let full = if dir.is_empty() {
                    name
                } else {
                    format!("{dir}/{name}")
                };
                dd.entry(dir).push(DirEntry {
                    name: full,
                    kind,
                    key: String::new(),
                });
            }
        }
        Ok(dd)
    }

    pub fn status(&self, index: &Index) -> Result<RepoStatus> {
        let stag_dict = index.dirtree();
        let ignore = IgnoreRules::load(&self.workdir, &self.ignore_file)?;
        let dirs: Vec<String> = stag_dict.dirs().map(|s| s.to_string()).collect();
        let work_dict = self.build_working_dict(&dirs, &ignore)?;
        let head_dict = self.build_head_dict()?;

        let (branch, tip) = refs::branch_current(&self.meta_dir)?;
        let detached_short_tip = if branch.is_none() {
            tip.chars().take(7).collect()
        } else {
            String::new()
        };

        let mut all: BTreeSet<String> = BTreeSet::new();
        all.extend(stag_dict.all_file_names());
        all.extend(work_dict.all_file_names());
        all.extend(head_dict.all_file_names());

        let mut staged = Vec::new();
        let mut not_staged = Vec::new();
        let mut not_tracked = Vec::new();

        for f in all {
            let (dir, _) = split_path(&f);
            let staged_entry = stag_dict.find_entry(dir, &f);
            let working_entry = work_dict.find_entry(dir, &f);
            let head_entry = head_dict.find_entry(dir, &f);

            let mut handled = false;
            if staged_entry.is_none() {
                if working_entry.is_some() {
                    not_tracked.push(f.clone());
                    handled = true;
                } else if head_entry.is_some() {
                    not_staged.push(StatusEntry {
                        path: f.clone(),
                        status: FileStatus::Deleted,
                    });
                    handled = true;
                }
            }

            if handled {
                continue;
            }

            let staged_key = staged_entry.map(|e| e.key.as_str());
            let head_key = head_entry.map(|e| e.key.as_str());
            if staged_key != head_key {
                staged.push(StatusEntry {
                    path: f.clone(),
                    status: if head_key.is_none() {
                        FileStatus::New
                    } else {
                        FileStatus::Modified
                    },
                });
            }

            if let Some(entry) = staged_entry {
                let full = self.workdir.join(&f);
                if let Ok(bytes) = std::fs::read(&full) {
                    let whash = self.db.calculate_key(&bytes, ObjectType::Blob)?;
                    if whash != entry.key {
                        not_staged.push(StatusEntry {
                            path: f.clone(),
                            status: FileStatus::Modified,
                        });
                    }
                }
            }
        }

        Ok(RepoStatus {
            branch,
            detached_short_tip,
            staged,
            not_staged,
            not_tracked,
        })
    }

    pub fn log(&self) -> Result<Vec<LogEntry>> {
        let (_, mut key) = refs::branch_current(&self.meta_dir)?;
        let mut out = Vec::new();
        while !key.is_empty() {
            let obj = match self.db.get(&key) {
                Ok(obj) => obj,
                Err(_) => break,
            };
            let commit = Commit::parse(&obj.text()?)?;
            out.push(LogEntry {
                key: key.clone(),
                short_comment: commit.short_comment().to_string(),
            });
            key = commit.parents.first().cloned().unwrap_or_default();
        }
        Ok(out)
    }

    fn dirty_entries(&self, index: &Index) -> Result<Vec<String>> {
        let mut dirty = Vec::new();
        for entry in index.entries() {
            let full = self.workdir.join(&entry.path);
            let bytes = std::fs::read(&full).map_err(|e| Error::io(&full, e))?;
            let key = self.db.calculate_key(&bytes, ObjectType::Blob)?;
            if key != entry.key {
                dirty.push(entry.path.clone());
            }
        }
        Ok(dirty)
    }

    /// Resolves `target` as a commit key (full or ≥4-char prefix) first, then
    /// as a branch name, optionally creating it. Fails `Conflict` if the
    /// working tree has dirty tracked files. Returns `(short_message,
    /// detached)`.
    pub fn checkout(
        &self,
        index: &mut Index,
        target: &str,
        create_branch: bool,
    ) -> Result<(String, bool)> {
        let not_found = || {
            Error::NotFound(format!(
                "pathspec '{target}' did not match any file(s) known to vc"
            ))
        };

        let (branch, commit_key) = if let Ok(full) = self.db.get_full_key(target) {
            (None, full)
        } else if refs::branch_exists(&self.meta_dir, target) {
            let tip = refs::branch_tip(&self.meta_dir, target)?;
            (Some(target.to_string()), tip)
        } else if create_branch {
            refs::branch_create(&self.meta_dir, target)?;
            let tip = refs::branch_tip(&self.meta_dir, target)?;
            (Some(target.to_string()), tip)
        } else {
            return Err(not_found());
        };

        if commit_key.is_empty() {
            return Err(not_found());
        }

        let commit = Commit::parse(&self.db.get(&commit_key)?.text()?)?;

        let dirty = self.dirty_entries(index)?;
        if !dirty.is_empty() {
            log::warn!("checkout aborted: {} dirty entries", dirty.len());
            return Err(Error::Conflict(dirty));
        }

        let mut dd = DirDict::new();
        self.add_tree_entries(&mut dd, "", &commit.tree)?;
        for path in dd.all_file_names() {
            let (dir, _) = split_path(&path);
            let entry = dd
                .find_entry(dir, &path)
                .expect("path came from all_file_names of the same dict");
            let obj = self.db.get(&entry.key)?;
            let full = self.workdir.join(&path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            std::fs::write(&full, &obj.payload).map_err(|e| Error::io(&full, e))?;
        }

        match &branch {
            Some(name) => {
                crate::fs::write_file(&self.meta_dir, "HEAD", &format!("refs/heads/{name}"))?
            }
            None => crate::fs::write_file(&self.meta_dir, "HEAD", &commit_key)?,
        }
        index.set_to_dirtree(&self.meta_dir, &dd)?;

        log::info!("checked out {commit_key} (branch={:?})", branch);
        Ok((commit.short_comment().to_string(), branch.is_none()))
    }

    /// Context diffs between the index-stored blob and the working-tree file
    /// for every file in the union of the staging/working/HEAD dicts,
    /// optionally restricted to `files`.
    pub fn diff(&self, index: &Index, files: &[String]) -> Result<Vec<String>> {
        let stag_dict = index.dirtree();
        let ignore = IgnoreRules::load(&self.workdir, &self.ignore_file)?;
        let dirs: Vec<String> = stag_dict.dirs().map(|s| s.to_string()).collect();
        let work_dict = self.build_working_dict(&dirs, &ignore)?;
        let head_dict = self.build_head_dict()?;

        let mut all: BTreeSet<String> = BTreeSet::new();
        all.extend(stag_dict.all_file_names());
        all.extend(work_dict.all_file_names());
        all.extend(head_dict.all_file_names());

        let filter: Option<BTreeSet<&str>> = if files.is_empty() {
            None
        } else {
            Some(files.iter().map(|s| s.as_str()).collect())
        };

        let mut out = Vec::new();
        for f in all {
            if let Some(set) = &filter {
                if !set.contains(f.as_str()) {
                    continue;
                }
            }
            let working_content =
                std::fs::read_to_string(self.workdir.join(&f)).unwrap_or_default();
            let (dir, _) = split_path(&f);
            let staged_content = match stag_dict.find_entry(dir, &f) {
                Some(entry) => self.db.get(&entry.key)?.text().unwrap_or_default(),
                None => String::new(),
            };
            if let Some(d) = diff::context_diff(&f, &f, &staged_content, &working_content) {
                out.push(d);
            }
        }
        Ok(out)
    }
}
