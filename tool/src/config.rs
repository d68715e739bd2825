//! Command line and environment configuration.

use std::path::PathBuf;
use std::thread;

use stubgen_fs::{RunOptions, DESCRIPTOR_FILE_NAME};
use stubgen_lib::KlogLevel;

pub const ENV_LIBC_ROOT: &str = "STUBGEN_LIBC_ROOT";
pub const ENV_ANDROID_BUILD_TOP: &str = "ANDROID_BUILD_TOP";

/// libc location relative to `$ANDROID_BUILD_TOP`.
const ANDROID_LIBC_SUBDIR: &str = "bionic/libc";

pub const USAGE: &str = "\
usage: gensyscalls [options]

  --root <dir>        libc root (default: $STUBGEN_LIBC_ROOT, then $ANDROID_BUILD_TOP/bionic/libc)
  --descriptor <file> syscall descriptor (default: <root>/SYSCALLS.TXT)
  --apply             write the computed changes into the libc tree
  --dry-run           only report changes (default)
  --jobs <n>          emission workers (default: available parallelism)
  --no-header         skip include/sys/glibc-syscalls.h
  -v, -vv, -q         more or less logging
  -h, --help          show this text
";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no libc root: pass --root or set {ENV_LIBC_ROOT} or {ENV_ANDROID_BUILD_TOP}")]
    MissingRoot,
    #[error("option {0} needs a value")]
    MissingValue(String),
    #[error("invalid value '{value}' for {option}")]
    InvalidValue { option: String, value: String },
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub libc_root: PathBuf,
    pub descriptor: PathBuf,
    pub dry_run: bool,
    pub verbosity: KlogLevel,
    pub jobs: usize,
    pub compat_header: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

#[derive(Default)]
struct Builder {
    root: Option<PathBuf>,
    descriptor: Option<PathBuf>,
    apply: bool,
    verbosity: i32,
    jobs: Option<usize>,
    no_header: bool,
    help: bool,
}

impl Config {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            libc_root: self.libc_root.clone(),
            descriptor: self.descriptor.clone(),
            jobs: self.jobs,
            compat_header: self.compat_header,
        }
    }
}

/// Parse `args` (without the program name). `env` looks up environment
/// variables so callers control where they come from.
pub fn parse_args<I, F>(args: I, env: F) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Builder::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let (option, inline) = match arg.split_once('=') {
            Some((option, value)) if option.starts_with("--") => {
                (option.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };
        let mut value = || -> Result<String, ConfigError> {
            match inline.clone() {
                Some(value) => Ok(value),
                None => args.next().ok_or_else(|| ConfigError::MissingValue(option.clone())),
            }
        };

        match option.as_str() {
            "--root" => builder.root = Some(PathBuf::from(value()?)),
            "--descriptor" => builder.descriptor = Some(PathBuf::from(value()?)),
            "--jobs" | "-j" => {
                let raw = value()?;
                let jobs = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|&jobs| jobs > 0)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        option: option.clone(),
                        value: raw,
                    })?;
                builder.jobs = Some(jobs);
            }
            "--apply" => builder.apply = true,
            "--dry-run" => builder.apply = false,
            "--no-header" => builder.no_header = true,
            "-q" | "--quiet" => builder.verbosity -= 1,
            "-h" | "--help" => builder.help = true,
            flag if is_verbose_flag(flag) => builder.verbosity += (flag.len() - 1) as i32,
            "--verbose" => builder.verbosity += 1,
            _ => return Err(ConfigError::UnknownArgument(arg)),
        }
    }

    if builder.help {
        return Ok(Command::Help);
    }

    let libc_root = match builder.root {
        Some(root) => root,
        None => resolve_root(&env).ok_or(ConfigError::MissingRoot)?,
    };
    let descriptor = builder
        .descriptor
        .unwrap_or_else(|| libc_root.join(DESCRIPTOR_FILE_NAME));
    let jobs = builder.jobs.unwrap_or_else(default_jobs);

    Ok(Command::Run(Config {
        libc_root,
        descriptor,
        dry_run: !builder.apply,
        verbosity: KlogLevel::from_verbosity(builder.verbosity),
        jobs,
        compat_header: !builder.no_header,
    }))
}

/// `-v`, `-vv`, `-vvv`...
fn is_verbose_flag(flag: &str) -> bool {
    flag.len() > 1 && flag.starts_with('-') && flag[1..].bytes().all(|b| b == b'v')
}

fn resolve_root<F: Fn(&str) -> Option<String>>(env: &F) -> Option<PathBuf> {
    let non_empty = |name: &str| env(name).filter(|value| !value.is_empty());
    non_empty(ENV_LIBC_ROOT)
        .map(PathBuf::from)
        .or_else(|| {
            non_empty(ENV_ANDROID_BUILD_TOP).map(|top| PathBuf::from(top).join(ANDROID_LIBC_SUBDIR))
        })
}

fn default_jobs() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
