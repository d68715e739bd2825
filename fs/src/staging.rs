//! Scoped staging area.
//!
//! A run writes every artifact into a fresh private directory first. The
//! directory lives exactly as long as its [`StagingDir`] value: dropping it,
//! on success or on any error path, deletes the tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use stubgen_lib::{klog_debug, klog_warn};

use crate::error::{FsError, FsResult};

const STAGING_ATTEMPTS: usize = 16;

static STAGING_SEQ: AtomicUsize = AtomicUsize::new(0);

pub struct StagingDir {
    root: PathBuf,
}

impl StagingDir {
    /// Create a unique directory under the system temp dir.
    pub fn create(prefix: &str) -> FsResult<Self> {
        Self::create_in(&std::env::temp_dir(), prefix)
    }

    pub fn create_in(parent: &Path, prefix: &str) -> FsResult<Self> {
        fs::create_dir_all(parent).map_err(|err| FsError::io("create", parent, err))?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let mut last_err = None;
        for _ in 0..STAGING_ATTEMPTS {
            let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
            let root = parent.join(format!("{prefix}-{}-{nanos:08x}-{seq}", process::id()));
            match fs::create_dir(&root) {
                Ok(()) => {
                    klog_debug!("created staging directory {}", root.display());
                    return Ok(Self { root });
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => last_err = Some(err),
                Err(err) => return Err(FsError::io("create", &root, err)),
            }
        }
        let err = last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AlreadyExists));
        Err(FsError::io("create", parent, err))
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a staged relative path.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => klog_debug!("removed staging directory {}", self.root.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                klog_warn!("cannot remove staging directory {}: {}", self.root.display(), err)
            }
        }
    }
}
