//! Error types for descriptor parsing and header generation.

use std::io;
use std::path::PathBuf;

/// A problem with a single descriptor line.
///
/// Syntax problems are local: the line is reported and skipped. A dispatch id
/// combined with a non-x86 architecture means the descriptor is internally
/// inconsistent and is fatal for the run (see [`ParseError::is_fatal`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{line}: missing left parenthesis in '{text}'")]
    MissingLeftParen { line: usize, text: String },
    #[error("{line}: missing or misplaced right parenthesis in '{text}'")]
    MisplacedRightParen { line: usize, text: String },
    #[error("{line}: missing return type in '{text}'")]
    MissingReturnType { line: usize, text: String },
    #[error("{line}: misplaced colon in '{text}'")]
    MisplacedColon { line: usize, text: String },
    #[error("{line}: misplaced second colon in '{text}'")]
    MisplacedSecondColon { line: usize, text: String },
    #[error("{line}: invalid dispatch id '{id}' in '{text}'")]
    InvalidDispatchId { line: usize, id: String, text: String },
    #[error("{line}: misplaced alias list in '{text}'")]
    MisplacedAlias { line: usize, text: String },
    #[error("{line}: alias '{alias}' repeats the function symbol in '{text}'")]
    AliasIsFunction { line: usize, alias: String, text: String },
    #[error("{line}: invalid syscall architecture '{arch}' in '{text}'")]
    InvalidArchitecture { line: usize, arch: String, text: String },
    #[error("{line}: dispatch id for dispatch syscalls is only supported for x86 in '{text}'")]
    DispatchArchitecture { line: usize, text: String },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MissingLeftParen { line, .. }
            | ParseError::MisplacedRightParen { line, .. }
            | ParseError::MissingReturnType { line, .. }
            | ParseError::MisplacedColon { line, .. }
            | ParseError::MisplacedSecondColon { line, .. }
            | ParseError::InvalidDispatchId { line, .. }
            | ParseError::MisplacedAlias { line, .. }
            | ParseError::AliasIsFunction { line, .. }
            | ParseError::InvalidArchitecture { line, .. }
            | ParseError::DispatchArchitecture { line, .. } => *line,
        }
    }

    /// Semantic errors abort the whole run; syntax errors only skip a line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::DispatchArchitecture { .. })
    }
}

/// Failure that stops descriptor processing altogether.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("cannot read descriptor {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "descriptor is inconsistent ({} fatal line(s)); first: {}",
        .0.len(),
        .0.first().map(ToString::to_string).unwrap_or_default()
    )]
    Semantic(Vec<ParseError>),
}

/// Failure while generating the compatibility header.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("cannot read kernel header {path} for {guard}: {source}")]
    MissingHeader {
        path: PathBuf,
        guard: &'static str,
        #[source]
        source: io::Error,
    },
}
