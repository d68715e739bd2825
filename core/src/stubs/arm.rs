//! ARM EABI stubs.
//!
//! The syscall number travels in r7 and arguments in r0-r6. When the call
//! fits in r0-r3 only r7 has to be preserved (via ip); otherwise r4-r7 are
//! pushed, r4-r6 are loaded from the caller's stack and unwind info tracks
//! the saved registers.

use stubgen_abi::{ArmStubVariant, Architecture};

use super::{end_marker, StubEmitter};
use crate::syscall::SyscallSpec;

pub struct ArmEmitter;

impl ArmEmitter {
    pub fn variant(&self, spec: &SyscallSpec) -> ArmStubVariant {
        ArmStubVariant::select(self.register_count(spec))
    }
}

impl StubEmitter for ArmEmitter {
    fn arch(&self) -> Architecture {
        Architecture::Arm
    }

    fn emit_body(&self, spec: &SyscallSpec) -> String {
        let nr = spec.nr_macro();
        let mut body = match self.variant(spec) {
            ArmStubVariant::Default => format!(
                concat!(
                    "    mov     ip, r7\n",
                    "    ldr     r7, ={nr}\n",
                    "    swi     #0\n",
                    "    mov     r7, ip\n",
                    "    cmn     r0, #(MAX_ERRNO + 1)\n",
                    "    bxls    lr\n",
                    "    neg     r0, r0\n",
                    "    b       {errno}\n",
                ),
                nr = nr,
                errno = super::SET_ERRNO_ENTRY,
            ),
            ArmStubVariant::Long => format!(
                concat!(
                    "    mov     ip, sp\n",
                    "    stmfd   sp!, {{r4, r5, r6, r7}}\n",
                    "    .cfi_def_cfa_offset 16\n",
                    "    .cfi_rel_offset r4, 0\n",
                    "    .cfi_rel_offset r5, 4\n",
                    "    .cfi_rel_offset r6, 8\n",
                    "    .cfi_rel_offset r7, 12\n",
                    "    ldmfd   ip, {{r4, r5, r6}}\n",
                    "    ldr     r7, ={nr}\n",
                    "    swi     #0\n",
                    "    ldmfd   sp!, {{r4, r5, r6, r7}}\n",
                    "    .cfi_def_cfa_offset 0\n",
                    "    cmn     r0, #(MAX_ERRNO + 1)\n",
                    "    bxls    lr\n",
                    "    neg     r0, r0\n",
                    "    b       {errno}\n",
                ),
                nr = nr,
                errno = super::SET_ERRNO_ENTRY,
            ),
        };
        body.push_str(&end_marker(spec.func()));
        body
    }
}
