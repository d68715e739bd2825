//! Test fixtures with automatic setup and teardown.
//!
//! A fixture builds a throw-away libc tree on `setup` and deletes it when
//! dropped, so tests never share or leak state on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stubgen_abi::Architecture;
use stubgen_core::compat_header::KERNEL_HEADER_SOURCES;
use stubgen_fs::{DESCRIPTOR_FILE_NAME, RunOptions, StagingDir};
use stubgen_lib::{KlogLevel, klog_init};

/// Trait for fixtures with automatic setup/teardown.
///
/// Teardown is driven by `Drop`.
pub trait TestFixture: Sized {
    fn setup() -> io::Result<Self>;

    fn teardown(&mut self);
}

pub const DEFAULT_DESCRIPTOR: &str = "\
# return  func[|aliases][:name[:id]]   (params)   arches
int     close(int)      all
ssize_t read|__read(int, void*, size_t)  all
int     __openat:openat(int, const char*, int, mode_t)  all
int     foo|bar,baz:realname (int a)  all
ssize_t pread64(int, void*, size_t, off64_t)  arm,x86
int     socket:socketcall:1 (int, int, int)  x86
int     socket(int, int, int)  arm,arm64,mips,mips64,x86_64
void*   mmap2(void*, size_t, int, int, int, long)  arm,x86,mips
int     vfork()  custom
";

/// Minimal `unistd.h` contents, one per kernel header in scan order.
const KERNEL_UNISTD: [&str; 5] = [
    "#define __NR_io_setup 0\n\
     #define __NR_openat 56\n\
     #define __NR_close 57\n\
     #define __NR_read 63\n",
    "#define __NR_SYSCALL_BASE 0\n\
     #define __NR_read (__NR_SYSCALL_BASE + 3)\n\
     #define __NR_close (__NR_SYSCALL_BASE + 6)\n",
    "#define __NR_Linux 4000\n\
     #define __NR_read (__NR_Linux + 3)\n\
     #define __NR_read (__NR_Linux + 3)\n",
    "#define __NR_read 3\n#define __NR_close 6\n#define __NR_socketcall 102\n",
    "#define __NR_read 0\n#define __NR_close 3\n#define __NR_socket 41\n",
];

/// Quiet logging for test binaries.
pub fn init_test_logging() {
    klog_init(KlogLevel::Warn);
}

/// A libc tree holding a descriptor, the kernel `unistd.h` headers and one
/// empty stub directory per architecture.
pub struct LibcTreeFixture {
    root: Option<StagingDir>,
}

impl TestFixture for LibcTreeFixture {
    fn setup() -> io::Result<Self> {
        Self::with_descriptor(DEFAULT_DESCRIPTOR)
    }

    fn teardown(&mut self) {
        self.root.take();
    }
}

impl Drop for LibcTreeFixture {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl LibcTreeFixture {
    pub fn with_descriptor(descriptor: &str) -> io::Result<Self> {
        let root = StagingDir::create("stubgen-libc-fixture").map_err(io::Error::other)?;
        let fixture = Self { root: Some(root) };

        fixture.write(DESCRIPTOR_FILE_NAME, descriptor)?;
        for (source, text) in KERNEL_HEADER_SOURCES.iter().zip(KERNEL_UNISTD) {
            fixture.write(source.header, text)?;
        }
        for arch in Architecture::ALL {
            fs::create_dir_all(fixture.path(&arch.stub_dir()))?;
        }
        Ok(fixture)
    }

    pub fn root(&self) -> &Path {
        match &self.root {
            Some(root) => root.path(),
            None => panic!("fixture already torn down"),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> io::Result<()> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    pub fn read(&self, relative: &str) -> io::Result<String> {
        fs::read_to_string(self.path(relative))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn remove(&self, relative: &str) -> io::Result<()> {
        fs::remove_file(self.path(relative))
    }

    /// Options for a single-worker run against this tree.
    pub fn options(&self) -> RunOptions {
        RunOptions::new(self.root())
    }

    /// A fresh staging area for one run.
    pub fn staging(&self) -> StagingDir {
        match StagingDir::create("stubgen-run-fixture") {
            Ok(staging) => staging,
            Err(err) => panic!("cannot create staging directory: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_tree_is_removed_on_drop() {
        let fixture = LibcTreeFixture::setup().unwrap();
        let root = fixture.root().to_path_buf();
        assert!(fixture.exists(DESCRIPTOR_FILE_NAME));
        assert!(fixture.exists("arch-x86_64/syscalls"));
        assert!(fixture.exists("kernel/uapi/asm-x86/asm/unistd_64.h"));
        drop(fixture);
        assert!(!root.exists());
    }
}
