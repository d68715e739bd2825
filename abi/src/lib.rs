//! Stubgen architecture ABI model
//!
//! This crate holds the canonical description of every target the stub
//! generator knows about and the argument-passing rules each one follows.
//! Having a single source of truth for these rules keeps the parser, the
//! emitters and the tests agreeing on:
//! - which architectures exist and how they are spelled in descriptors
//! - how many machine registers a parameter list consumes on each target
//! - how the kernel numeric-id macro for a syscall is named
//!
//! Nothing in this crate performs I/O.

#![forbid(unsafe_code)]

pub mod arch;
pub mod nr;
pub mod param;
pub mod regs;

pub use arch::*;
pub use nr::*;
pub use param::*;
pub use regs::*;
