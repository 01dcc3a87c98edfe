//! BL2 I/O layer
//!
//! Provides a uniform open/seek/read/close interface over the storage
//! drivers available during boot.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │             Image loader             │
//! └──────────────────┬───────────────────┘
//!                    │ open/seek/read/close
//! ┌──────────────────▼───────────────────┐
//! │             IoRegistry               │
//! │  - Device table                      │
//! │  - Entity (open handle) table        │
//! └──────────────────┬───────────────────┘
//!                    │ IoDevice trait
//! ┌─────────┬────────┴────────┬──────────┐
//! │  eMMC   │     memmap      │   ...    │
//! └─────────┴─────────────────┴──────────┘
//! ```
//!
//! Nothing in this crate allocates; both tables are fixed-size.

#![cfg_attr(not(test), no_std)]

pub mod device;
pub mod error;
pub mod registry;

pub use device::{DrvSpec, IoDevice, IoType, ReadReport, SeekMode};
pub use error::{result_code, IoError, IoResult, IO_SUCCESS};
pub use registry::{DevHandle, EntityHandle, IoRegistry};

/// Maximum number of registered devices
pub const MAX_IO_DEVICES: usize = 3;

/// Maximum number of simultaneously open entities
pub const MAX_IO_HANDLES: usize = 4;
