//! Generated output units.

use std::path::{Path, PathBuf};

use stubgen_abi::Architecture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Stub(Architecture),
    CompatibilityHeader,
}

/// One generated file, addressed relative to the libc root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedArtifact {
    relative_path: PathBuf,
    content: String,
    kind: ArtifactKind,
}

impl GeneratedArtifact {
    pub fn new(relative_path: impl Into<PathBuf>, content: String, kind: ArtifactKind) -> Self {
        Self {
            relative_path: relative_path.into(),
            content,
            kind,
        }
    }

    /// `arch-<arch>/syscalls/<func>.S`
    pub fn stub_path(arch: Architecture, func: &str) -> PathBuf {
        Path::new(&arch.stub_dir()).join(format!("{func}.S"))
    }

    #[inline]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}
