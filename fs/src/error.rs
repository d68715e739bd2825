//! Filesystem error type shared by staging, writing, scanning and applying.

use std::io;
use std::path::{Path, PathBuf};

pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("cannot {op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("conflicting content generated for {path}")]
    Conflict { path: PathBuf },
}

impl FsError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        FsError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path the error refers to. For a failed copy this is the destination.
    pub fn path(&self) -> &Path {
        match self {
            FsError::Io { path, .. } | FsError::Conflict { path } => path,
            FsError::Copy { to, .. } => to,
        }
    }
}
