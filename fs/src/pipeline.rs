//! One generation run: parse, emit, stage, scan, reconcile.
//!
//! The run never touches the real tree. Its result is a [`RunReport`] whose
//! delta can be handed to [`apply_delta`](crate::apply_delta) afterwards.

use std::panic;
use std::path::PathBuf;
use std::thread;

use stubgen_core::{
    generate_compat_header, parse_descriptor_file, stubs_for, DescriptorError, GeneratedArtifact,
    HeaderError, ParseError, SyscallSpec,
};
use stubgen_lib::{klog_debug, klog_error, klog_info};

use crate::error::{FsError, FsResult};
use crate::reconcile::{reconcile, Reconciliation};
use crate::staging::StagingDir;
use crate::tree::{require_dir, scan_tree};
use crate::writer::{ArtifactWriter, StagedSet};

/// Descriptor file name inside the libc root.
pub const DESCRIPTOR_FILE_NAME: &str = "SYSCALLS.TXT";

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub libc_root: PathBuf,
    pub descriptor: PathBuf,
    /// Emission workers; zero is treated as one.
    pub jobs: usize,
    pub compat_header: bool,
}

impl RunOptions {
    /// Defaults for a libc root: `SYSCALLS.TXT` beside it, one worker, header on.
    pub fn new(libc_root: impl Into<PathBuf>) -> Self {
        let libc_root = libc_root.into();
        Self {
            descriptor: libc_root.join(DESCRIPTOR_FILE_NAME),
            libc_root,
            jobs: 1,
            compat_header: true,
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub delta: Reconciliation,
    /// Skipped descriptor lines.
    pub diagnostics: Vec<ParseError>,
    /// Set when the compatibility header could not be generated. Stubs are
    /// still staged and reconciled.
    pub header_error: Option<HeaderError>,
    pub syscall_count: usize,
    pub staged: StagedSet,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    Fs(#[from] FsError),
}

pub fn run(options: &RunOptions, staging: &StagingDir) -> Result<RunReport, PipelineError> {
    require_dir(&options.libc_root)?;
    let parsed = parse_descriptor_file(&options.descriptor)?;
    klog_info!(
        "parsed {} syscalls from {}",
        parsed.syscalls.len(),
        options.descriptor.display()
    );

    let writer = ArtifactWriter::new(staging);

    let header_error = if options.compat_header {
        match generate_compat_header(&options.libc_root) {
            Ok(header) => {
                stage(&writer, &header)?;
                None
            }
            Err(err) => {
                klog_error!("{}", err);
                Some(err)
            }
        }
    } else {
        klog_debug!("compatibility header disabled");
        None
    };

    emit_all(&parsed.syscalls, &writer, options.jobs)?;

    let staged = writer.finish();
    let tree = scan_tree(&options.libc_root, &staged)?;
    let delta = reconcile(&staged, &tree);
    delta.log();

    Ok(RunReport {
        delta,
        diagnostics: parsed.diagnostics,
        header_error,
        syscall_count: parsed.syscalls.len(),
        staged,
    })
}

/// Emit and stage every stub, spreading `syscalls` over up to `jobs` scoped
/// workers. Returns the first worker error.
pub fn emit_all(
    syscalls: &[SyscallSpec],
    writer: &ArtifactWriter<'_>,
    jobs: usize,
) -> FsResult<()> {
    if syscalls.is_empty() {
        return Ok(());
    }
    let jobs = jobs.clamp(1, syscalls.len());
    let batch_len = syscalls.len().div_ceil(jobs);
    klog_debug!("emitting with {} worker(s)", jobs);

    thread::scope(|scope| {
        let workers: Vec<_> = syscalls
            .chunks(batch_len)
            .map(|batch| scope.spawn(move || emit_batch(batch, writer)))
            .collect();

        let mut result = Ok(());
        for worker in workers {
            let outcome = match worker.join() {
                Ok(outcome) => outcome,
                Err(payload) => panic::resume_unwind(payload),
            };
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    })
}

fn emit_batch(batch: &[SyscallSpec], writer: &ArtifactWriter<'_>) -> FsResult<()> {
    for spec in batch {
        for artifact in stubs_for(spec) {
            stage(writer, &artifact)?;
        }
    }
    Ok(())
}

fn stage(writer: &ArtifactWriter<'_>, artifact: &GeneratedArtifact) -> FsResult<()> {
    klog_info!(">>> generating {}", artifact.relative_path().display());
    writer.write(artifact)
}
