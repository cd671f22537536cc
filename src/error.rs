//! Core error taxonomy, shared by every component.

use std::path::PathBuf;

/// Everything a core operation can fail with.
///
/// The CLI layer wraps these in `anyhow::Error` to attach call-site context;
/// the core library itself only ever returns this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a vc repository (or any parent up to the filesystem root)")]
    NotInRepo,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    Exists(String),

    #[error("ambiguous reference: {0}")]
    Ambiguous(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("conflict: local changes would be overwritten: {0:?}")]
    Conflict(Vec<String>),

    #[error("corrupt object or ref: {0}")]
    Corrupt(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
