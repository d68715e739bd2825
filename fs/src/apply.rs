//! Applying a reconciliation to the real tree.

use std::fs;
use std::io;
use std::path::Path;

use stubgen_lib::{klog_debug, klog_info};

use crate::error::{FsError, FsResult};
use crate::reconcile::Reconciliation;
use crate::staging::StagingDir;

/// Copy added and changed files from `staging` into `libc_root` and delete
/// removed stubs. Files outside the delta are left alone.
pub fn apply_delta(delta: &Reconciliation, staging: &StagingDir, libc_root: &Path) -> FsResult<()> {
    for relative in delta.added.iter().chain(&delta.changed) {
        let from = staging.resolve(relative);
        let to = libc_root.join(relative);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|err| FsError::io("create", parent, err))?;
        }
        fs::copy(&from, &to).map_err(|source| FsError::Copy {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        klog_debug!("installed {}", to.display());
    }

    for relative in &delta.removed {
        let path = libc_root.join(relative);
        match fs::remove_file(&path) {
            Ok(()) => klog_debug!("removed {}", path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(FsError::io("remove", &path, err)),
        }
    }

    klog_info!(
        "applied {} new, {} changed, {} deleted",
        delta.added.len(),
        delta.changed.len(),
        delta.removed.len()
    );
    Ok(())
}
