//! Per-architecture stub emitters.
//!
//! Every stub has the same frame:
//!
//! ```text
//! /* <warning> */
//!
//! #include <private/bionic_asm.h>
//!
//! ENTRY(<func>)
//! <architecture body, ending in END(<func>)>
//! <one ALIAS_SYMBOL per alias>
//! <.hidden <func> when the symbol is internal>
//! ```
//!
//! Only the body differs between targets; it is produced by the
//! [`StubEmitter`] registered for each [`Architecture`].

mod arm;
mod arm64;
mod mips;
mod x86;
mod x86_64;

use stubgen_abi::{Architecture, PointerWidth, RegisterRule};

use crate::artifact::{ArtifactKind, GeneratedArtifact};
use crate::syscall::SyscallSpec;
use crate::GENERATED_WARNING;

pub use arm::ArmEmitter;
pub use arm64::Arm64Emitter;
pub use mips::{Mips64Emitter, MipsEmitter};
pub use x86::X86Emitter;
pub use x86_64::X86_64Emitter;

/// Kernel error values are in `[-MAX_ERRNO, -1]`; on error the stubs branch
/// here with the positive errno in the first argument register.
pub const SET_ERRNO_ENTRY: &str = "__set_errno_internal";

/// Stub body generator for one architecture.
pub trait StubEmitter: Sync {
    fn arch(&self) -> Architecture;

    /// Argument registers `spec` occupies under this target's counting rule.
    fn register_count(&self, spec: &SyscallSpec) -> usize {
        RegisterRule::for_arch(self.arch()).count(&spec.params().widths())
    }

    /// Code between `ENTRY(func)` and the footer, including `END(func)`.
    fn emit_body(&self, spec: &SyscallSpec) -> String;
}

static ARM: ArmEmitter = ArmEmitter;
static ARM64: Arm64Emitter = Arm64Emitter;
static MIPS: MipsEmitter = MipsEmitter;
static MIPS64: Mips64Emitter = Mips64Emitter;
static X86: X86Emitter = X86Emitter;
static X86_64: X86_64Emitter = X86_64Emitter;

pub fn emitter_for(arch: Architecture) -> &'static dyn StubEmitter {
    match arch {
        Architecture::Arm => &ARM,
        Architecture::Arm64 => &ARM64,
        Architecture::Mips => &MIPS,
        Architecture::Mips64 => &MIPS64,
        Architecture::X86 => &X86,
        Architecture::X86_64 => &X86_64,
    }
}

/// Emit the complete stub for `spec` on `arch`.
pub fn emit_stub(spec: &SyscallSpec, arch: Architecture) -> GeneratedArtifact {
    let mut text = stub_header(spec.func());
    text.push_str(&emitter_for(arch).emit_body(spec));
    add_footer(&mut text, arch.pointer_width(), spec);
    GeneratedArtifact::new(
        GeneratedArtifact::stub_path(arch, spec.func()),
        text,
        ArtifactKind::Stub(arch),
    )
}

/// Emit one stub per architecture requested by `spec`.
pub fn stubs_for(spec: &SyscallSpec) -> Vec<GeneratedArtifact> {
    spec.arches()
        .architectures()
        .map(|arch| emit_stub(spec, arch))
        .collect()
}

fn stub_header(func: &str) -> String {
    format!("/* {GENERATED_WARNING} */\n\n#include <private/bionic_asm.h>\n\nENTRY({func})\n")
}

pub(crate) fn end_marker(func: &str) -> String {
    format!("END({func})\n")
}

fn add_footer(text: &mut String, pointer_width: PointerWidth, spec: &SyscallSpec) {
    let func = spec.func();
    for alias in spec.aliases() {
        text.push_str(&format!("\nALIAS_SYMBOL({alias}, {func})\n"));
    }
    if is_hidden(pointer_width, func) {
        text.push_str(&format!(".hidden {func}\n"));
    }
}

/// Underscore-prefixed symbols are internal on LP64; three underscores mark
/// a symbol internal everywhere.
pub fn is_hidden(pointer_width: PointerWidth, func: &str) -> bool {
    (pointer_width == PointerWidth::Bits64 && func.starts_with("__")) || func.starts_with("___")
}
