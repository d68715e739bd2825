//! `gensyscalls`: regenerate the per-architecture syscall stubs of a libc
//! tree from its `SYSCALLS.TXT`.

mod config;

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use stubgen_fs::{apply_delta, run, RunReport, StagingDir};
use stubgen_lib::{klog_error, klog_info, klog_init, klog_warn, KlogLevel};

use crate::config::{parse_args, Command, Config, USAGE};

const STAGING_PREFIX: &str = "gensyscalls";

fn main() -> ExitCode {
    klog_init(KlogLevel::Info);

    let command = match parse_args(env::args().skip(1), |name| env::var(name).ok()) {
        Ok(command) => command,
        Err(err) => {
            klog_error!("{}", err);
            eprint!("{USAGE}");
            return ExitCode::from(2);
        }
    };
    let config = match command {
        Command::Help => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Command::Run(config) => config,
    };

    match generate(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            klog_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Run the pipeline and, unless this is a dry run, apply the delta. Returns
/// false when the run completed but the compatibility header failed.
fn generate(config: &Config) -> Result<bool> {
    klog_init(config.verbosity);

    // Dropped on every return path below, which removes the staged files.
    let staging = StagingDir::create(STAGING_PREFIX).context("cannot create staging directory")?;

    let report = run(&config.run_options(), &staging)
        .with_context(|| format!("generation failed for {}", config.libc_root.display()))?;

    print_report(&report);

    if config.dry_run {
        if !report.delta.is_unchanged() {
            klog_info!("dry run: pass --apply to update {}", config.libc_root.display());
        }
    } else {
        apply_delta(&report.delta, &staging, &config.libc_root)
            .with_context(|| format!("cannot update {}", config.libc_root.display()))?;
    }

    if let Some(err) = &report.header_error {
        klog_warn!("compatibility header not generated: {}", err);
        return Ok(false);
    }
    Ok(true)
}

/// Print the three path lists on stdout for version-control tooling.
fn print_report(report: &RunReport) {
    let sections: [(&str, &BTreeSet<PathBuf>); 3] = [
        ("A", &report.delta.added),
        ("M", &report.delta.changed),
        ("D", &report.delta.removed),
    ];
    for (tag, paths) in sections {
        for path in paths {
            print_path(tag, path);
        }
    }
    if !report.diagnostics.is_empty() {
        klog_warn!("{} descriptor line(s) skipped", report.diagnostics.len());
    }
}

fn print_path(tag: &str, path: &Path) {
    println!("{tag} {}", path.display());
}
