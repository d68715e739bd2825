//! Tree reconciliation.
//!
//! Compares what a run staged against what the tree holds and partitions the
//! paths into added, changed and removed. The comparison looks only at paths
//! and bytes, never at timestamps or other metadata, and it changes nothing:
//! applying the result is a separate step.

use std::collections::BTreeSet;
use std::path::PathBuf;

use stubgen_lib::klog_info;

use crate::tree::TreeSnapshot;
use crate::writer::StagedSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub added: BTreeSet<PathBuf>,
    pub changed: BTreeSet<PathBuf>,
    pub removed: BTreeSet<PathBuf>,
}

impl Reconciliation {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    pub fn log(&self) {
        for path in &self.added {
            klog_info!("new file:     {}", path.display());
        }
        for path in &self.changed {
            klog_info!("changed file: {}", path.display());
        }
        for path in &self.removed {
            klog_info!("deleted file: {}", path.display());
        }
        if self.is_unchanged() {
            klog_info!("no changes detected!");
        } else {
            klog_info!("ready to go!!");
        }
    }
}

pub fn reconcile(staged: &StagedSet, tree: &TreeSnapshot) -> Reconciliation {
    let mut delta = Reconciliation::default();

    for path in staged.paths() {
        match tree.content(path) {
            None => {
                delta.added.insert(path.to_path_buf());
            }
            Some(existing) if Some(existing) != staged.get(path) => {
                delta.changed.insert(path.to_path_buf());
            }
            Some(_) => {}
        }
    }

    delta.removed = tree
        .stub_paths()
        .filter(|path| !staged.contains(path))
        .map(|path| path.to_path_buf())
        .collect();

    delta
}
