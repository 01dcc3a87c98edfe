//! Storage Driver Traits for the BL2 I/O layer
//!
//! This crate defines the capabilities a storage driver consumes from the
//! platform: raw sector transfer, partition selection and the boot
//! configuration bits of the device. Drivers are generic over these traits so
//! they can be exercised against in-memory hosts.
//!
//! # Debug Features
//!
//! Enable debug output at compile time:
//! ```toml
//! bl2-driver-traits = { path = "...", features = ["debug-storage"] }
//! ```
//!
//! Available features:
//! - `debug-all`: Enable all debug output
//! - `debug-storage`: sector transfers and partition selection

#![cfg_attr(not(test), no_std)]

pub mod block;
pub mod emmc;
mod debug;

pub use block::*;
pub use emmc::*;
pub use debug::*;

/// Common error type for driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Operation timed out
    Timeout,
    /// Invalid parameter
    InvalidParameter,
    /// I/O error
    IoError,
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::Timeout => write!(f, "operation timed out"),
            DriverError::InvalidParameter => write!(f, "invalid parameter"),
            DriverError::IoError => write!(f, "I/O error"),
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Static driver information
#[derive(Debug, Clone, Copy)]
pub struct DriverInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}
