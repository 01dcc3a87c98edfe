//! Debug macros for the storage subsystem
//!
//! These macros compile to nothing when debug features are disabled.

#[doc(hidden)]
pub use log as _log;

/// Debug print for storage subsystem
#[macro_export]
#[cfg(feature = "debug-storage")]
macro_rules! debug_storage {
    ($($arg:tt)*) => {
        $crate::_log::debug!(target: "storage", $($arg)*)
    };
}

#[macro_export]
#[cfg(not(feature = "debug-storage"))]
macro_rules! debug_storage {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}
