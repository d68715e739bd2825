pub mod init_flag;
pub mod klog;

pub use init_flag::InitFlag;
pub use klog::{klog_init, klog_is_enabled, klog_set_level, KlogLevel};

#[doc(hidden)]
pub use log;
