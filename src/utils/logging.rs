//! Logging macros gated on a per-module `ENABLE_LOGS` const.
//!
//! Poll-loop modules log on every tick worth mentioning; the const lets a
//! chatty module be silenced at compile time without touching the global
//! `RUST_LOG` filter. Each module using these defines its own flag:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_info, log_warn};
//! ```

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}
