//! x86_64 stubs.

use stubgen_abi::{x86_64_needs_r10_move, Architecture};

use super::{end_marker, StubEmitter, SET_ERRNO_ENTRY};
use crate::syscall::SyscallSpec;

pub struct X86_64Emitter;

impl StubEmitter for X86_64Emitter {
    fn arch(&self) -> Architecture {
        Architecture::X86_64
    }

    fn emit_body(&self, spec: &SyscallSpec) -> String {
        let mut body = String::new();
        if x86_64_needs_r10_move(self.register_count(spec)) {
            // rcx is clobbered by `syscall`; the kernel reads arg 4 from r10.
            body.push_str("    movq    %rcx, %r10\n");
        }
        body.push_str(&format!(
            concat!(
                "    movl    ${nr}, %eax\n",
                "    syscall\n",
                "    cmpq    $-MAX_ERRNO, %rax\n",
                "    jb      1f\n",
                "    negl    %eax\n",
                "    movl    %eax, %edi\n",
                "    call    {errno}\n",
                "1:\n",
                "    ret\n",
            ),
            nr = spec.nr_macro(),
            errno = SET_ERRNO_ENTRY,
        ));
        body.push_str(&end_marker(spec.func()));
        body
    }
}
