//! Snapshot of the existing libc tree.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stubgen_abi::Architecture;
use stubgen_lib::klog_info;

use crate::error::{FsError, FsResult};
use crate::writer::StagedSet;

/// Stub file extension inside `arch-*/syscalls`.
pub const STUB_EXTENSION: &str = "S";

/// Contents of the tree that matter for reconciliation.
///
/// `stubs` is the inventory of every stub file currently present; these are
/// the only files that can be classified as removed. `others` holds existing
/// non-stub files that the run also generates (the compatibility header).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeSnapshot {
    stubs: BTreeMap<PathBuf, Vec<u8>>,
    others: BTreeMap<PathBuf, Vec<u8>>,
}

impl TreeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_stub(&mut self, relative: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.stubs.insert(relative.into(), content.into());
    }

    pub fn insert_other(&mut self, relative: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.others.insert(relative.into(), content.into());
    }

    pub fn content(&self, relative: &Path) -> Option<&[u8]> {
        self.stubs
            .get(relative)
            .or_else(|| self.others.get(relative))
            .map(Vec::as_slice)
    }

    pub fn stub_paths(&self) -> impl Iterator<Item = &Path> {
        self.stubs.keys().map(PathBuf::as_path)
    }

    pub fn stub_count(&self) -> usize {
        self.stubs.len()
    }
}

/// Read the stub inventory of every architecture plus any other existing file
/// that `staged` also contains.
///
/// Every `arch-*/syscalls` directory must exist. A missing or unreadable one
/// is fatal, as is a `libc_root` that is not a directory.
pub fn scan_tree(libc_root: &Path, staged: &StagedSet) -> FsResult<TreeSnapshot> {
    require_dir(libc_root)?;
    klog_info!("scanning for existing architecture-specific stub files...");
    let mut snapshot = TreeSnapshot::new();

    for arch in Architecture::ALL {
        let relative_dir = PathBuf::from(arch.stub_dir());
        let dir = libc_root.join(&relative_dir);
        klog_info!("scanning {}", dir.display());

        let entries = fs::read_dir(&dir).map_err(|err| FsError::io("scan", &dir, err))?;

        for entry in entries {
            let entry = entry.map_err(|err| FsError::io("scan", &dir, err))?;
            let path = entry.path();
            let is_stub = path.extension().is_some_and(|ext| ext == STUB_EXTENSION);
            if !is_stub || !path.is_file() {
                continue;
            }
            let content = fs::read(&path).map_err(|err| FsError::io("read", &path, err))?;
            snapshot.insert_stub(relative_dir.join(entry.file_name()), content);
        }
    }
    klog_info!("found {} stub files", snapshot.stub_count());

    for relative in staged.paths() {
        if snapshot.content(relative).is_some() {
            continue;
        }
        let path = libc_root.join(relative);
        match fs::read(&path) {
            Ok(content) => snapshot.insert_other(relative, content),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(FsError::io("read", &path, err)),
        }
    }

    Ok(snapshot)
}

/// Fail unless `path` names an existing directory.
pub fn require_dir(path: &Path) -> FsResult<()> {
    let metadata = fs::metadata(path).map_err(|err| FsError::io("open", path, err))?;
    if !metadata.is_dir() {
        let err = io::Error::new(io::ErrorKind::InvalidInput, "not a directory");
        return Err(FsError::io("open", path, err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::StagingDir;

    fn libc_tree() -> StagingDir {
        let root = StagingDir::create("stubgen-tree-test").unwrap();
        for arch in Architecture::ALL {
            fs::create_dir_all(root.resolve(Path::new(&arch.stub_dir()))).unwrap();
        }
        root
    }

    #[test]
    fn scans_only_stub_files() {
        let root = libc_tree();
        fs::write(root.resolve(Path::new("arch-arm/syscalls/read.S")), "read").unwrap();
        fs::write(root.resolve(Path::new("arch-arm/syscalls/README")), "x").unwrap();

        let snapshot = scan_tree(root.path(), &StagedSet::new()).unwrap();
        assert_eq!(snapshot.stub_count(), 1);
        assert_eq!(snapshot.content(Path::new("arch-arm/syscalls/read.S")), Some(&b"read"[..]));
    }

    #[test]
    fn missing_root_is_fatal() {
        let root = libc_tree();
        let missing = root.path().join("no/such/libc");
        let err = scan_tree(&missing, &StagedSet::new()).unwrap_err();
        assert!(matches!(err, FsError::Io { op: "open", .. }));
        assert_eq!(err.path(), missing);
    }

    #[test]
    fn root_that_is_a_file_is_fatal() {
        let root = libc_tree();
        let file = root.resolve(Path::new("SYSCALLS.TXT"));
        fs::write(&file, "").unwrap();
        assert!(require_dir(&file).is_err());
        assert!(require_dir(root.path()).is_ok());
    }

    #[test]
    fn missing_stub_directory_is_fatal() {
        let root = libc_tree();
        fs::remove_dir_all(root.resolve(Path::new("arch-mips64"))).unwrap();
        let err = scan_tree(root.path(), &StagedSet::new()).unwrap_err();
        assert!(matches!(err, FsError::Io { op: "scan", .. }));
        assert!(err.path().ends_with("arch-mips64/syscalls"));
    }
}
