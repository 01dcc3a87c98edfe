//! Device interface and the types passed through it

use crate::error::{IoError, IoResult};

/// Device type tag reported by a registered driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoType {
    /// Host file access through a debugger
    Semihosting,
    /// Memory-mapped storage
    Memmap,
    /// Placeholder device
    Dummy,
    /// Firmware image package container
    FirmwareImagePackage,
    /// Generic block device
    Block,
    /// MMC/SD card
    Mmc,
}

/// Seek origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    /// Absolute position
    Set,
    /// From end of file
    End,
    /// From current position
    Current,
}

/// Open request passed to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrvSpec {
    /// Byte offset of the image on the device
    pub offset: usize,
    /// Raw partition number, if the caller wants a specific one
    pub partition: Option<u32>,
}

impl DrvSpec {
    pub const fn new(offset: usize) -> Self {
        DrvSpec { offset, partition: None }
    }

    pub const fn with_partition(mut self, partition: u32) -> Self {
        self.partition = Some(partition);
        self
    }
}

/// Outcome of a read
///
/// `bytes_read` is what the device reports as consumed and may be non-zero
/// even when `status` is an error. Callers must check `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ReadReport {
    pub bytes_read: usize,
    pub status: IoResult<()>,
}

impl ReadReport {
    pub const fn ok(bytes_read: usize) -> Self {
        ReadReport { bytes_read, status: Ok(()) }
    }

    pub const fn failed(bytes_read: usize, error: IoError) -> Self {
        ReadReport { bytes_read, status: Err(error) }
    }

    /// Byte count on success, error otherwise
    pub fn into_result(self) -> IoResult<usize> {
        self.status.map(|()| self.bytes_read)
    }
}

/// Device operations trait - implemented by every registered driver
///
/// `info` is the opaque per-entity value returned by `open`. Devices are
/// `Send` so a registry can sit behind a lock shared between contexts.
pub trait IoDevice: Send {
    /// Device type tag
    fn device_type(&self) -> IoType;

    /// Open an entity on the device
    fn open(&mut self, spec: &DrvSpec) -> IoResult<usize>;

    /// Seek within an open entity
    fn seek(&mut self, info: usize, mode: SeekMode, offset: i64) -> IoResult<()>;

    /// Read from an open entity into `buffer`
    fn read(&mut self, info: usize, buffer: &mut [u8]) -> ReadReport;

    /// Close an open entity
    fn close(&mut self, info: usize) -> IoResult<()>;

    /// Close the device connection
    fn dev_close(&mut self) -> IoResult<()> {
        Ok(())
    }
}
