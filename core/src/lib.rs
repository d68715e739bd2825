//! Descriptor parsing and stub emission.
//!
//! The flow through this crate is strictly one-way:
//! descriptor text -> [`SyscallSpec`] records -> [`GeneratedArtifact`]s.
//! Every step is a pure function of its inputs except the two file readers
//! ([`parse_descriptor_file`] and [`generate_compat_header`]).

pub mod artifact;
pub mod compat_header;
pub mod error;
pub mod stubs;
pub mod syscall;

pub use artifact::{ArtifactKind, GeneratedArtifact};
pub use compat_header::{generate_compat_header, COMPAT_HEADER_PATH};
pub use error::{DescriptorError, HeaderError, ParseError};
pub use stubs::{emit_stub, emitter_for, stubs_for, StubEmitter};
pub use syscall::parser::{parse_descriptor, parse_descriptor_file, parse_line, ParsedDescriptor};
pub use syscall::{ParamList, SyscallSpec};

/// Banner written at the top of every generated file.
pub const GENERATED_WARNING: &str = "Generated by gensyscalls. Do not edit.";
