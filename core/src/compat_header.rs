//! glibc-compatible `SYS_*` constants.
//!
//! glibc exposes kernel syscall numbers as `SYS_<name>`; the kernel headers
//! only define `__NR_<name>`. This module scans each architecture's
//! `unistd.h` and emits one header mapping the former onto the latter,
//! selected per target by the preprocessor.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use stubgen_abi::{nr_macro_name, NR_PREFIX};
use stubgen_lib::klog_info;

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::error::HeaderError;
use crate::GENERATED_WARNING;

/// Location of the generated header, relative to the libc root.
pub const COMPAT_HEADER_PATH: &str = "include/sys/glibc-syscalls.h";

const INCLUDE_GUARD: &str = "_BIONIC_GLIBC_SYSCALLS_H_";

/// A kernel header and the compiler macro that selects it.
#[derive(Clone, Copy, Debug)]
pub struct KernelHeaderSource {
    pub define: &'static str,
    pub header: &'static str,
}

/// Scanned in this order; the first becomes `#if`, the rest `#elif`.
pub const KERNEL_HEADER_SOURCES: [KernelHeaderSource; 5] = [
    KernelHeaderSource {
        define: "__aarch64__",
        header: "kernel/uapi/asm-generic/unistd.h",
    },
    KernelHeaderSource {
        define: "__arm__",
        header: "kernel/uapi/asm-arm/asm/unistd.h",
    },
    KernelHeaderSource {
        define: "__mips__",
        header: "kernel/uapi/asm-mips/asm/unistd.h",
    },
    KernelHeaderSource {
        define: "__i386__",
        header: "kernel/uapi/asm-x86/asm/unistd_32.h",
    },
    KernelHeaderSource {
        define: "__x86_64__",
        header: "kernel/uapi/asm-x86/asm/unistd_64.h",
    },
];

/// Collect syscall names from `#define __NR_<name> <value>` lines.
///
/// Names must start with a lowercase letter and be followed by a space, which
/// skips helpers such as `__NR_SYSCALL_BASE`. Duplicates (MIPS defines every
/// number once per ABI) collapse.
pub fn scan_unistd(text: &str) -> BTreeSet<String> {
    const DEFINE: &str = "#define ";

    let mut names = BTreeSet::new();
    for line in text.lines() {
        let Some(rest) = line
            .strip_prefix(DEFINE)
            .and_then(|rest| rest.strip_prefix(NR_PREFIX))
        else {
            continue;
        };
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..end];
        let starts_lower = name.starts_with(|c: char| c.is_ascii_lowercase());
        let followed_by_space = rest[end..].starts_with(' ');
        if starts_lower && name.chars().count() >= 2 && followed_by_space {
            names.insert(name.to_string());
        }
    }
    names
}

/// Render the header from `(define, names)` blocks in selection order.
pub fn render_compat_header(blocks: &[(&str, BTreeSet<String>)]) -> String {
    let mut out = format!("/* {GENERATED_WARNING} */\n");
    out.push_str(&format!("#ifndef {INCLUDE_GUARD}\n#define {INCLUDE_GUARD}\n"));
    for (index, (define, names)) in blocks.iter().enumerate() {
        let directive = if index == 0 { "#if" } else { "#elif" };
        out.push_str(&format!("{directive} defined({define})\n"));
        for name in names {
            out.push_str(&format!("#define SYS_{name} {}\n", nr_macro_name(name)));
        }
    }
    if !blocks.is_empty() {
        out.push_str("#endif\n");
    }
    out.push_str(&format!("#endif /* {INCLUDE_GUARD} */\n"));
    out
}

/// Scan the kernel headers under `libc_root` and build the header artifact.
pub fn generate_compat_header(libc_root: &Path) -> Result<GeneratedArtifact, HeaderError> {
    klog_info!("generating {}", COMPAT_HEADER_PATH);

    let mut blocks = Vec::with_capacity(KERNEL_HEADER_SOURCES.len());
    for source in KERNEL_HEADER_SOURCES {
        let path = libc_root.join(source.header);
        let text = fs::read_to_string(&path).map_err(|err| HeaderError::MissingHeader {
            path: path.clone(),
            guard: source.define,
            source: err,
        })?;
        blocks.push((source.define, scan_unistd(&text)));
    }

    Ok(GeneratedArtifact::new(
        COMPAT_HEADER_PATH,
        render_compat_header(&blocks),
        ArtifactKind::CompatibilityHeader,
    ))
}
