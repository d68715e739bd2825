//! Leveled diagnostic logging.
//!
//! `klog` is the process logger for the generator. It sits behind the `log`
//! facade so every crate can log through the `klog_*!` macros (or plain
//! `log` macros) while the verbosity is controlled in one place.
//!
//! Records are written to stderr as `[LEVEL] message`, one per line. Each
//! line is formatted first and written whole under the sink lock.

use std::io::Write;
use std::sync::atomic::{AtomicU8, Ordering};

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::init_flag::InitFlag;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum KlogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl KlogLevel {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => KlogLevel::Error,
            1 => KlogLevel::Warn,
            2 => KlogLevel::Info,
            3 => KlogLevel::Debug,
            _ => KlogLevel::Trace,
        }
    }

    /// Map a verbosity delta (`-q` = -1, `-v` = +1, ...) onto a level,
    /// starting from `Info`.
    pub fn from_verbosity(delta: i32) -> Self {
        let raw = (KlogLevel::Info as i32 + delta).clamp(0, KlogLevel::Trace as i32);
        Self::from_raw(raw as u8)
    }

    const fn filter(self) -> LevelFilter {
        match self {
            KlogLevel::Error => LevelFilter::Error,
            KlogLevel::Warn => LevelFilter::Warn,
            KlogLevel::Info => LevelFilter::Info,
            KlogLevel::Debug => LevelFilter::Debug,
            KlogLevel::Trace => LevelFilter::Trace,
        }
    }

    fn from_log(level: log::Level) -> Self {
        match level {
            log::Level::Error => KlogLevel::Error,
            log::Level::Warn => KlogLevel::Warn,
            log::Level::Info => KlogLevel::Info,
            log::Level::Debug => KlogLevel::Debug,
            log::Level::Trace => KlogLevel::Trace,
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            KlogLevel::Error => "ERROR",
            KlogLevel::Warn => "WARN",
            KlogLevel::Info => "INFO",
            KlogLevel::Debug => "DEBUG",
            KlogLevel::Trace => "TRACE",
        }
    }
}

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(KlogLevel::Info as u8);
static LOGGER_INSTALLED: InitFlag = InitFlag::new();
static SINK: KlogSink = KlogSink;
static WRITE_LOCK: Mutex<()> = Mutex::new(());

#[inline(always)]
fn is_enabled(level: KlogLevel) -> bool {
    level as u8 <= CURRENT_LEVEL.load(Ordering::Relaxed)
}

struct KlogSink;

impl Log for KlogSink {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        is_enabled(KlogLevel::from_log(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = KlogLevel::from_log(record.level());
        let line = format!("[{}] {}\n", level.tag(), record.args());
        let _guard = WRITE_LOCK.lock();
        let _ = std::io::stderr().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the logger (first call only) and set the active level.
pub fn klog_init(level: KlogLevel) {
    if LOGGER_INSTALLED.init_once() {
        // Another logger may already own the facade (e.g. under a test
        // harness); klog then only tracks the level.
        let _ = log::set_logger(&SINK);
    }
    klog_set_level(level);
}

pub fn klog_set_level(level: KlogLevel) {
    CURRENT_LEVEL.store(level as u8, Ordering::Relaxed);
    log::set_max_level(level.filter());
}

pub fn klog_is_enabled(level: KlogLevel) -> bool {
    is_enabled(level)
}

#[macro_export]
macro_rules! klog_error {
    ($($arg:tt)*) => {
        $crate::log::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! klog_warn {
    ($($arg:tt)*) => {
        $crate::log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! klog_info {
    ($($arg:tt)*) => {
        $crate::log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! klog_debug {
    ($($arg:tt)*) => {
        $crate::log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! klog_trace {
    ($($arg:tt)*) => {
        $crate::log::trace!($($arg)*)
    };
}
