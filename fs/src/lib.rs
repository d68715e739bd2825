//! Filesystem side of the generator.
//!
//! Artifacts are staged into a private [`StagingDir`], compared against the
//! existing libc tree and reported as a [`Reconciliation`]. Only
//! [`apply_delta`] writes to the tree.

mod apply;
mod error;
mod pipeline;
mod reconcile;
mod staging;
mod tree;
mod writer;

pub use apply::apply_delta;
pub use error::{FsError, FsResult};
pub use pipeline::{emit_all, run, PipelineError, RunOptions, RunReport, DESCRIPTOR_FILE_NAME};
pub use reconcile::{reconcile, Reconciliation};
pub use staging::StagingDir;
pub use tree::{require_dir, scan_tree, TreeSnapshot, STUB_EXTENSION};
pub use writer::{ArtifactWriter, StagedSet};
