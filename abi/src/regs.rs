//! Register allocation rules for syscall arguments.
//!
//! Each target decides how many machine registers a parameter list consumes.
//! That count selects stub template variants (ARM), sizes the spill area
//! around the trap (x86) and decides whether an argument register has to be
//! relocated before entering the kernel (x86_64).

use crate::arch::Architecture;
use crate::param::ParamWidth;

// =============================================================================
// Counting rules
// =============================================================================

/// Register counting rule followed by a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterRule {
    /// 32-bit words: wide parameters take two registers.
    Generic32,
    /// 64-bit words: every parameter takes exactly one register.
    Lp64,
    /// ARM EABI: like `Generic32`, but wide values start on an even register.
    ArmEabi,
}

impl RegisterRule {
    pub const fn for_arch(arch: Architecture) -> Self {
        match arch {
            Architecture::Arm => RegisterRule::ArmEabi,
            Architecture::Mips | Architecture::X86 => RegisterRule::Generic32,
            Architecture::Arm64 | Architecture::Mips64 | Architecture::X86_64 => RegisterRule::Lp64,
        }
    }

    pub fn count(self, params: &[ParamWidth]) -> usize {
        match self {
            RegisterRule::Generic32 => count_generic_registers(params),
            RegisterRule::Lp64 => count_lp64_registers(params),
            RegisterRule::ArmEabi => count_arm_registers(params),
        }
    }
}

pub fn count_generic_registers(params: &[ParamWidth]) -> usize {
    params.iter().map(|width| width.words()).sum()
}

pub fn count_lp64_registers(params: &[ParamWidth]) -> usize {
    params.len()
}

/// Count registers under the ARM EABI, which passes 64-bit quantities in an
/// even/odd register pair. `(int fd, off64_t pos)` needs four registers:
/// r0 for `fd`, r1 unused, r2-r3 for `pos`.
pub fn count_arm_registers(params: &[ParamWidth]) -> usize {
    params.iter().fold(0, |count, width| match width {
        ParamWidth::Wide => (count + (count & 1)) + 2,
        ParamWidth::Narrow => count + 1,
    })
}

// =============================================================================
// ARM
// =============================================================================

/// Largest register count the short ARM trampoline can handle (r0-r3).
pub const ARM_DEFAULT_MAX_REGISTERS: usize = 4;

/// ARM stub template variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmStubVariant {
    /// Arguments fit in r0-r3; only r7 is borrowed for the syscall number.
    Default,
    /// Arguments spill into r4-r6, which are saved and restored around the trap.
    Long,
}

impl ArmStubVariant {
    pub const fn select(register_count: usize) -> Self {
        if register_count > ARM_DEFAULT_MAX_REGISTERS {
            ArmStubVariant::Long
        } else {
            ArmStubVariant::Default
        }
    }
}

// =============================================================================
// x86
// =============================================================================

/// i386 kernel argument registers, in argument order.
pub const X86_ARG_REGISTERS: [&str; 6] = ["ebx", "ecx", "edx", "esi", "edi", "ebp"];

/// Registers that must be saved, loaded from the caller's stack, and restored
/// around the trap for a call needing `register_count` argument words.
pub fn x86_spill_registers(register_count: usize) -> &'static [&'static str] {
    &X86_ARG_REGISTERS[..register_count.min(X86_ARG_REGISTERS.len())]
}

/// Registers saved by the dispatch (socketcall) trampoline: the sub-call id
/// goes in the first, the address of the caller's arguments in the second.
pub const X86_DISPATCH_REGISTERS: [&str; 2] = ["ebx", "ecx"];

// =============================================================================
// x86_64
// =============================================================================

/// Parameters beyond this count include the fourth argument, which the C ABI
/// passes in %rcx but the kernel expects in %r10.
pub const X86_64_RCX_ARGUMENT_LIMIT: usize = 3;

pub fn x86_64_needs_r10_move(register_count: usize) -> bool {
    register_count > X86_64_RCX_ARGUMENT_LIMIT
}
