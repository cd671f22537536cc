//! A small, git-like version control system.
//!
//! ## Architecture overview
//!
//! Everything here is built on a content-addressed object store: every piece
//! of data — file content, directory listing, commit snapshot — is stored as
//! an object identified by the SHA-1 hash of its *compressed* stored form.
//!
//! ### Object types
//!
//! - **Blob**: raw file contents.
//! - **Tree**: a directory listing (maps names to blob/tree keys).
//! - **Commit**: a tree key plus parent commit keys and a message.
//!
//! ### Repository layout
//!
//! ```text
//! .vc/
//! ├── HEAD            # "refs/heads/<branch>" or a raw commit key (detached)
//! ├── index           # staging area, one "<key> <kind> <path>" line per entry
//! ├── objects/        # content-addressed object store
//! │   └── ab/cdef...  # zlib-compressed stored object
//! └── refs/heads/     # branch pointers, one commit key per file
//! ```

pub mod commands;
pub mod db;
pub mod diff;
pub mod dirdict;
pub mod error;
pub mod fs;
pub mod hasher;
pub mod ignore;
pub mod index;
pub mod objects;
pub mod refs;
pub mod repo;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};
pub use fs::META_DIR;

pub const DEFAULT_BRANCH: &str = "master";

/// Resolves a repository root and bootstraps it. Distinct from [`repo::Repo`],
/// which wraps the index/DB/root together once a repository is found; this
/// type only knows how to locate or create `R`.
#[derive(Debug, Clone)]
pub struct Repository {
    /// The working directory (parent of `meta_dir`).
    pub workdir: PathBuf,
    /// `R`, the repository metadata directory (conventionally `<workdir>/.vc`).
    pub meta_dir: PathBuf,
    /// Name of the ignore file, relative to `workdir` (conventionally `.vcignore`).
    pub ignore_file: String,
}

impl Repository {
    /// Find the repository root by walking up from the current directory,
    /// using the default ignore-file name.
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| Error::io(".", e))?;
        Self::find_from(&current_dir)
    }

    pub fn find_from(start: &Path) -> Result<Self> {
        Self::find_from_with_ignore_file(start, ignore::DEFAULT_IGNORE_FILE)
    }

    /// Like [`find_from`](Self::find_from), but with a caller-chosen
    /// ignore-file name instead of the default `.vcignore`.
    pub fn find_from_with_ignore_file(start: &Path, ignore_file: &str) -> Result<Self> {
        let meta_dir = fs::find_repo_root(start).ok_or(Error::NotInRepo)?;
        let workdir = meta_dir
            .parent()
            .map(Path::to_path_buf)
            .ok_or(Error::NotInRepo)?;
        Ok(Self {
            workdir,
            meta_dir,
            ignore_file: ignore_file.to_string(),
        })
    }

    /// Initialize a new repository at `path`, with `initial_branch` as the
    /// starting branch name (conventionally `master`) and the default
    /// ignore-file name.
    pub fn init(path: &Path, initial_branch: &str) -> Result<Self> {
        Self::init_with_ignore_file(path, initial_branch, ignore::DEFAULT_IGNORE_FILE)
    }

    /// Like [`init`](Self::init), but with a caller-chosen ignore-file name
    /// instead of the default `.vcignore`. Exists so embedders (and tests)
    /// can vary this knob without an on-disk config file.
    pub fn init_with_ignore_file(
        path: &Path,
        initial_branch: &str,
        ignore_file: &str,
    ) -> Result<Self> {
        let workdir = path.to_path_buf();
        let meta_dir = fs::create_repo_root(&workdir)?;
        fs::write_file(&meta_dir, "HEAD", &format!("refs/heads/{initial_branch}"))?;
        fs::write_file(&meta_dir, &format!("refs/heads/{initial_branch}"), "")?;
        log::info!(
            "initialized repository at {} (branch {initial_branch})",
            meta_dir.display()
        );
        Ok(Self {
            workdir,
            meta_dir,
            ignore_file: ignore_file.to_string(),
        })
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.meta_dir.join("objects")
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.meta_dir.join("refs")
    }

    pub fn head_path(&self) -> PathBuf {
        self.meta_dir.join("HEAD")
    }

    pub fn index_path(&self) -> PathBuf {
        self.meta_dir.join("index")
    }
}
