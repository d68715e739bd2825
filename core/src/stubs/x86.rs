//! i386 stubs.
//!
//! Arguments arrive on the stack but the kernel wants them in
//! ebx/ecx/edx/esi/edi/ebp. Each register used is pushed (with matching
//! unwind info), loaded from the caller's frame, and popped in reverse order
//! after `__sysenter` returns.
//!
//! Dispatch (socketcall) entries instead pass the sub-call id in ebx and a
//! pointer to the caller's arguments in ecx.

use stubgen_abi::{x86_spill_registers, Architecture, X86_DISPATCH_REGISTERS};

use super::{end_marker, StubEmitter, SET_ERRNO_ENTRY};
use crate::syscall::SyscallSpec;

/// Size of one pushed register (and of the return address).
const X86_WORD: usize = 4;

pub struct X86Emitter;

impl StubEmitter for X86Emitter {
    fn arch(&self) -> Architecture {
        Architecture::X86
    }

    fn emit_body(&self, spec: &SyscallSpec) -> String {
        match spec.dispatch_id() {
            Some(id) => emit_dispatch(spec, id),
            None => emit_direct(spec, self.register_count(spec)),
        }
    }
}

fn emit_direct(spec: &SyscallSpec, register_count: usize) -> String {
    let registers = x86_spill_registers(register_count);
    let mut body = save_registers(registers);

    let stack_bias = stack_bias(registers.len());
    for (index, reg) in registers.iter().enumerate() {
        body.push_str(&format!(
            "    mov     {}(%esp), %{reg}\n",
            stack_bias + index * X86_WORD
        ));
    }

    body.push_str(&trap(spec));
    body.push_str(&restore_registers(registers));
    body.push_str(&epilogue(spec));
    body
}

fn emit_dispatch(spec: &SyscallSpec, id: u32) -> String {
    let registers = &X86_DISPATCH_REGISTERS[..];
    let mut body = save_registers(registers);

    body.push_str(&format!("    mov     ${id}, %ebx\n"));
    body.push_str("    mov     %esp, %ecx\n");
    body.push_str(&format!("    addl    ${}, %ecx\n", stack_bias(registers.len())));

    body.push_str(&trap(spec));
    body.push_str(&restore_registers(registers));
    body.push_str(&epilogue(spec));
    body
}

/// Offset from esp to the first caller argument once `pushed` registers
/// sit on top of the return address.
fn stack_bias(pushed: usize) -> usize {
    pushed * X86_WORD + X86_WORD
}

fn save_registers(registers: &[&str]) -> String {
    let mut out = String::new();
    for (index, reg) in registers.iter().enumerate() {
        out.push_str(&format!("    pushl   %{reg}\n"));
        if index == 0 {
            out.push_str("    .cfi_def_cfa_offset 8\n");
        } else {
            out.push_str("    .cfi_adjust_cfa_offset 4\n");
        }
        out.push_str(&format!("    .cfi_rel_offset {reg}, 0\n"));
    }
    out
}

fn restore_registers(registers: &[&str]) -> String {
    registers
        .iter()
        .rev()
        .map(|reg| format!("    popl    %{reg}\n"))
        .collect()
}

fn trap(spec: &SyscallSpec) -> String {
    format!(
        concat!(
            "    movl    ${nr}, %eax\n",
            "    call    __sysenter\n",
            "    cmpl    $-MAX_ERRNO, %eax\n",
            "    jb      1f\n",
            "    negl    %eax\n",
            "    pushl   %eax\n",
            "    call    {errno}\n",
            "    addl    $4, %esp\n",
            "1:\n",
        ),
        nr = spec.nr_macro(),
        errno = SET_ERRNO_ENTRY,
    )
}

fn epilogue(spec: &SyscallSpec) -> String {
    format!("    ret\n{}", end_marker(spec.func()))
}
