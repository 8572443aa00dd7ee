/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// Usage:
/// ```ignore
/// log_status!("run", "Building image {}", image);
/// log_status!("copy", "Extracting {} to {}", source, dest);
/// ```
///
/// Lines also go to the log file once `logging::init_log_file` has been called.
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        $crate::logging::emit($crate::logging::Level::Status, $prefix, &format!($($arg)*))
    };
}

/// Like `log_status!`, but only emitted after `set_debug(true)`.
#[macro_export]
macro_rules! log_debug {
    ($prefix:expr, $($arg:tt)*) => {
        if $crate::logging::is_debug() {
            $crate::logging::emit($crate::logging::Level::Debug, $prefix, &format!($($arg)*))
        }
    };
}

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `rpmbox::config` instead of `rpmbox::core::config`
pub use core::*;
pub use utils::*;
