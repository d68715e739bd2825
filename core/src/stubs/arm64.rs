//! AArch64 stubs: number in x8, `svc #0`, conditional negate on error.

use stubgen_abi::Architecture;

use super::{end_marker, StubEmitter, SET_ERRNO_ENTRY};
use crate::syscall::SyscallSpec;

pub struct Arm64Emitter;

impl StubEmitter for Arm64Emitter {
    fn arch(&self) -> Architecture {
        Architecture::Arm64
    }

    fn emit_body(&self, spec: &SyscallSpec) -> String {
        let mut body = format!(
            concat!(
                "    mov     x8, {nr}\n",
                "    svc     #0\n",
                "\n",
                "    cmn     x0, #(MAX_ERRNO + 1)\n",
                "    cneg    x0, x0, hi\n",
                "    b.hi    {errno}\n",
                "\n",
                "    ret\n",
            ),
            nr = spec.nr_macro(),
            errno = SET_ERRNO_ENTRY,
        );
        body.push_str(&end_marker(spec.func()));
        body
    }
}
