//! Artifact writer.
//!
//! Writes generated artifacts into the staging area, keyed by relative path.
//! The writer is shared by emission workers: the path table is claimed under
//! a lock so each path is written at most once, while writes to distinct
//! paths run outside the lock.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use spin::Mutex;
use stubgen_core::GeneratedArtifact;

use crate::error::{FsError, FsResult};
use crate::staging::StagingDir;

/// Every file staged during a run, by relative path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StagedSet {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl StagedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relative: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(relative.into(), content.into());
    }

    pub fn get(&self, relative: &Path) -> Option<&[u8]> {
        self.files.get(relative).map(Vec::as_slice)
    }

    pub fn contains(&self, relative: &Path) -> bool {
        self.files.contains_key(relative)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<PathBuf>, C: Into<Vec<u8>>> FromIterator<(P, C)> for StagedSet {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut set = StagedSet::new();
        for (path, content) in iter {
            set.insert(path, content);
        }
        set
    }
}

pub struct ArtifactWriter<'a> {
    staging: &'a StagingDir,
    staged: Mutex<StagedSet>,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(staging: &'a StagingDir) -> Self {
        Self {
            staging,
            staged: Mutex::new(StagedSet::new()),
        }
    }

    /// Stage one artifact.
    ///
    /// Writing identical content to a path twice is a no-op. Different content
    /// for an already staged path is a [`FsError::Conflict`].
    pub fn write(&self, artifact: &GeneratedArtifact) -> FsResult<()> {
        let relative = artifact.relative_path();
        let content = artifact.content().as_bytes();

        {
            let mut staged = self.staged.lock();
            if let Some(existing) = staged.get(relative) {
                if existing == content {
                    return Ok(());
                }
                return Err(FsError::Conflict {
                    path: relative.to_path_buf(),
                });
            }
            staged.insert(relative, content);
        }

        let target = self.staging.resolve(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| FsError::io("create", parent, err))?;
        }
        fs::write(&target, content).map_err(|err| FsError::io("write", &target, err))
    }

    pub fn finish(self) -> StagedSet {
        self.staged.into_inner()
    }
}
