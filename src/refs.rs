//! Reference (branch/HEAD) algebra.
//!
//! HEAD is either `refs/heads/<name>` (attached) or a raw commit key
//! (detached). Branch refs live under `refs/heads/<name>`, one commit key
//! per file.

use std::path::Path;

use crate::error::{Error, Result};
use crate::fs;

fn branch_ref_relpath(name: &str) -> String {
    format!("refs/heads/{name}")
}

/// Reads HEAD. Returns `(Some(branch), tip)` if attached, `(None, tip)` if
/// detached (`tip` is then the raw commit key from HEAD itself, possibly
/// empty on a fresh repository with no commits yet).
pub fn branch_current(meta_dir: &Path) -> Result<(Option<String>, String)> {
    let head = fs::read_file(meta_dir, "HEAD")?;
    if let Some(name) = head.strip_prefix("refs/heads/") {
        let tip = fs::read_file(meta_dir, &branch_ref_relpath(name))?;
        Ok((Some(name.to_string()), tip))
    } else {
        Ok((None, head))
    }
}

/// Advance the current ref (branch or detached HEAD) to `key`.
pub fn head_advance(meta_dir: &Path, branch: &Option<String>, key: &str) -> Result<()> {
    match branch {
        Some(name) => fs::write_file(meta_dir, &branch_ref_relpath(name), key),
        None => fs::write_file(meta_dir, "HEAD", key),
    }
}

pub fn branch_tip(meta_dir: &Path, name: &str) -> Result<String> {
    if !branch_exists(meta_dir, name) {
        return Err(Error::NotFound(name.to_string()));
    }
    fs::read_file(meta_dir, &branch_ref_relpath(name))
}

pub fn branch_exists(meta_dir: &Path, name: &str) -> bool {
    fs::exists(meta_dir, &branch_ref_relpath(name))
}

/// Create `name` pointing at the current tip (whatever the current branch's
/// tip is, or the detached HEAD's commit).
pub fn branch_create(meta_dir: &Path, name: &str) -> Result<()> {
    if branch_exists(meta_dir, name) {
        return Err(Error::Exists(name.to_string()));
    }
    let (_, tip) = branch_current(meta_dir)?;
    fs::write_file(meta_dir, &branch_ref_relpath(name), &tip)
}

/// Delete `name`, returning its tip's 7-char short key. Fails `Exists` if
/// `name` is the currently checked-out branch, `NotFound` if absent.
pub fn branch_delete(meta_dir: &Path, name: &str) -> Result<String> {
    let (current, _) = branch_current(meta_dir)?;
    if current.as_deref() == Some(name) {
        return Err(Error::Exists(name.to_string()));
    }
    if !branch_exists(meta_dir, name) {
        return Err(Error::NotFound(name.to_string()));
    }
    let tip = fs::read_file(meta_dir, &branch_ref_relpath(name))?;
    fs::remove_file(meta_dir, &branch_ref_relpath(name))?;
    Ok(tip.chars().take(7).collect())
}

pub fn branch_rename(meta_dir: &Path, from: &str, to: &str) -> Result<()> {
    if !branch_exists(meta_dir, from) {
        return Err(Error::NotFound(from.to_string()));
    }
    if branch_exists(meta_dir, to) {
        return Err(Error::Exists(to.to_string()));
    }
    fs::rename_file(meta_dir, &branch_ref_relpath(from), &branch_ref_relpath(to))?;

    let (current, _) = branch_current(meta_dir)?;
    if current.as_deref() == Some(from) {
        fs::write_file(meta_dir, "HEAD", &format!("refs/heads/{to}"))?;
    }
    Ok(())
}

pub fn list_branches(meta_dir: &Path) -> Result<(Vec<String>, Option<String>)> {
    let names = fs::list_files(meta_dir, "refs/heads")?;
    let mut names = names;
    names.sort();
    let (current, _) = branch_current(meta_dir)?;
    Ok((names, current))
}
