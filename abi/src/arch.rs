//! Target architecture definitions.
//!
//! The set of architectures is closed: every target the generator can emit
//! code for is listed in [`Architecture::ALL`], and descriptor lines select a
//! subset of them through an [`ArchFlags`] set.

use core::fmt;

use bitflags::bitflags;

/// A target CPU architecture with its own syscall calling convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Architecture {
    Arm,
    Arm64,
    Mips,
    Mips64,
    X86,
    X86_64,
}

/// Width of a native pointer on a target, in bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl Architecture {
    /// Every supported architecture, in canonical emission order.
    pub const ALL: [Architecture; 6] = [
        Architecture::Arm,
        Architecture::Arm64,
        Architecture::Mips,
        Architecture::Mips64,
        Architecture::X86,
        Architecture::X86_64,
    ];

    /// Spelling used in descriptor files and directory names.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
            Architecture::Mips => "mips",
            Architecture::Mips64 => "mips64",
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
        }
    }

    /// Look up an architecture by its descriptor spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|arch| arch.name() == name)
    }

    #[inline]
    pub const fn flag(self) -> ArchFlags {
        match self {
            Architecture::Arm => ArchFlags::ARM,
            Architecture::Arm64 => ArchFlags::ARM64,
            Architecture::Mips => ArchFlags::MIPS,
            Architecture::Mips64 => ArchFlags::MIPS64,
            Architecture::X86 => ArchFlags::X86,
            Architecture::X86_64 => ArchFlags::X86_64,
        }
    }

    #[inline]
    pub const fn pointer_width(self) -> PointerWidth {
        match self {
            Architecture::Arm | Architecture::Mips | Architecture::X86 => PointerWidth::Bits32,
            Architecture::Arm64 | Architecture::Mips64 | Architecture::X86_64 => {
                PointerWidth::Bits64
            }
        }
    }

    /// True when native registers are 64 bits wide.
    #[inline]
    pub const fn is_lp64(self) -> bool {
        matches!(self.pointer_width(), PointerWidth::Bits64)
    }

    /// Directory, relative to the libc root, holding this target's stubs.
    pub fn stub_dir(self) -> String {
        format!("arch-{}/syscalls", self.name())
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of architectures a descriptor entry asks stubs for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ArchFlags: u8 {
        const ARM = 1 << 0;
        const ARM64 = 1 << 1;
        const MIPS = 1 << 2;
        const MIPS64 = 1 << 3;
        const X86 = 1 << 4;
        const X86_64 = 1 << 5;
    }
}

impl ArchFlags {
    /// Architectures in this set, in canonical emission order.
    pub fn architectures(self) -> impl Iterator<Item = Architecture> {
        Architecture::ALL
            .into_iter()
            .filter(move |arch| self.contains(arch.flag()))
    }

    #[inline]
    pub fn has(self, arch: Architecture) -> bool {
        self.contains(arch.flag())
    }
}

impl FromIterator<Architecture> for ArchFlags {
    fn from_iter<I: IntoIterator<Item = Architecture>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ArchFlags::empty(), |acc, arch| acc | arch.flag())
    }
}
