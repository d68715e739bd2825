//! MIPS o32 and n64 stubs.
//!
//! MIPS reports failure through a3 rather than a negative return value, so
//! these bodies branch on a3 instead of range-checking v0.

use stubgen_abi::Architecture;

use super::{end_marker, StubEmitter, SET_ERRNO_ENTRY};
use crate::syscall::SyscallSpec;

pub struct MipsEmitter;

pub struct Mips64Emitter;

impl StubEmitter for MipsEmitter {
    fn arch(&self) -> Architecture {
        Architecture::Mips
    }

    fn emit_body(&self, spec: &SyscallSpec) -> String {
        let mut body = format!(
            concat!(
                "    .set noreorder\n",
                "    .cpload t9\n",
                "    li v0, {nr}\n",
                "    syscall\n",
                "    bnez a3, 1f\n",
                "    move a0, v0\n",
                "    j ra\n",
                "    nop\n",
                "1:\n",
                "    la t9,{errno}\n",
                "    j t9\n",
                "    nop\n",
                "    .set reorder\n",
            ),
            nr = spec.nr_macro(),
            errno = SET_ERRNO_ENTRY,
        );
        body.push_str(&end_marker(spec.func()));
        body
    }
}

impl StubEmitter for Mips64Emitter {
    fn arch(&self) -> Architecture {
        Architecture::Mips64
    }

    // n64 has no .cpload; gp is set up around the tail call with
    // .cpsetup/.cpreturn, keeping ra in t0 meanwhile.
    fn emit_body(&self, spec: &SyscallSpec) -> String {
        let mut body = format!(
            concat!(
                "    .set push\n",
                "    .set noreorder\n",
                "    li v0, {nr}\n",
                "    syscall\n",
                "    bnez a3, 1f\n",
                "    move a0, v0\n",
                "    j ra\n",
                "    nop\n",
                "1:\n",
                "    move t0, ra\n",
                "    bal     2f\n",
                "    nop\n",
                "2:\n",
                "    .cpsetup ra, t1, 2b\n",
                "    LA t9,{errno}\n",
                "    .cpreturn\n",
                "    j t9\n",
                "    move ra, t0\n",
                "    .set pop\n",
            ),
            nr = spec.nr_macro(),
            errno = SET_ERRNO_ENTRY,
        );
        body.push_str(&end_marker(spec.func()));
        body
    }
}
