//! Atomic init-once flag.
//!
//! `InitFlag` tracks whether a process-wide facility has been set up, without
//! the boilerplate of a bare `AtomicBool` plus accessor functions.
//!
//! ```ignore
//! static LOGGER_INIT: InitFlag = InitFlag::new();
//!
//! if LOGGER_INIT.init_once() {
//!     // first caller performs the setup
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

#[repr(transparent)]
pub struct InitFlag {
    flag: AtomicBool,
}

impl InitFlag {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Returns `true` for exactly one caller: the one that flipped the flag.
    #[inline]
    pub fn init_once(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }
}

impl Default for InitFlag {
    fn default() -> Self {
        Self::new()
    }
}
