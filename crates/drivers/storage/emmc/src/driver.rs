//! eMMC driver: open/seek/read/close over the single file slot

use bl2_driver_traits::debug_storage;
use bl2_driver_traits::emmc::{EmmcHost, PartitionId};
use bl2_driver_traits::{DriverError, LoadFlags};
use bl2_io::{DrvSpec, IoError, IoResult, ReadReport, SeekMode};

use crate::file::{EmmcFile, FileSlot, FileState};
use crate::partition::{self, BootPartition, ResolveError};
use crate::sector::SectorRange;

/// Why an open did not produce a usable file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum OpenError {
    /// Another file is open; nothing changed
    Busy,
    /// The slot was bound but the partition could not be resolved or
    /// selected. It stays bound until [`EmmcDriver::release_failed`].
    Failed,
}

impl OpenError {
    pub fn error(self) -> IoError {
        match self {
            OpenError::Busy => IoError::ResourcesExhausted,
            OpenError::Failed => IoError::Fail,
        }
    }
}

fn transfer_failed(err: DriverError) -> IoError {
    debug_storage!("emmc: transfer failed: {}", err);
    IoError::Fail
}

/// eMMC storage driver
///
/// Owns the platform host, the cached boot partition and the one file slot.
pub struct EmmcDriver<H> {
    host: H,
    boot_partition: BootPartition,
    slot: FileSlot,
    /// Token of an open that bound the slot and then failed
    failed: Option<EmmcFile>,
}

impl<H: EmmcHost> EmmcDriver<H> {
    pub const fn new(host: H) -> Self {
        EmmcDriver {
            host,
            boot_partition: BootPartition::Unresolved,
            slot: FileSlot::new(),
            failed: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Cached default boot partition
    pub fn boot_partition(&self) -> BootPartition {
        self.boot_partition
    }

    pub fn is_open(&self) -> bool {
        self.slot.in_use()
    }

    /// State of the open file, if any
    pub fn file_state(&self) -> Option<&FileState> {
        self.slot.state()
    }

    /// Open the device for reading
    ///
    /// The first open reads the boot partition from PARTITION_CONFIG and
    /// caches it; later opens may name another partition in `spec`. After
    /// `OpenError::Failed` the slot stays bound until `release_failed`.
    pub fn open(&mut self, spec: &DrvSpec) -> Result<EmmcFile, OpenError> {
        let (file, state) = match self.slot.bind(spec.offset, PartitionId::User) {
            Ok(bound) => bound,
            Err(_) => {
                log::warn!("A emmcdrv device is already active. Close first.");
                return Err(OpenError::Busy);
            }
        };

        let host = &self.host;
        let id = match partition::resolve(&mut self.boot_partition, spec.partition, || {
            host.partition_config()
        }) {
            Ok(id) => id,
            Err(ResolveError::InvalidBootPartition(raw)) => {
                log::warn!("BL2: eMMC boot partition error (BOOT_PARTITION_ENABLE={})", raw);
                self.failed = Some(file);
                return Err(OpenError::Failed);
            }
        };
        state.partition = id;

        if let Err(err) = self.host.select_partition(id) {
            debug_storage!("emmc: select {:?} failed: {}", id, err);
            self.failed = Some(file);
            return Err(OpenError::Failed);
        }

        debug_storage!("emmc: opened {:?} base={:#x}", id, spec.offset);
        Ok(file)
    }

    /// Move the cursor
    ///
    /// Only absolute positioning is supported. The offset is not range
    /// checked.
    pub fn seek(&mut self, file: &EmmcFile, mode: SeekMode, offset: i64) -> IoResult<()> {
        match mode {
            SeekMode::Set => {
                self.slot.bound(file).cursor = offset;
                Ok(())
            }
            SeekMode::End | SeekMode::Current => Err(IoError::Fail),
        }
    }

    /// Read `buffer.len()` bytes at the cursor
    ///
    /// The report always carries the requested length and the cursor always
    /// advances by it, whether or not the transfer succeeded. Only
    /// `status` tells the two apart.
    pub fn read(&mut self, file: &EmmcFile, buffer: &mut [u8]) -> ReadReport {
        let length = buffer.len();
        let FileState { cursor, partition, .. } = *self.slot.bound(file);
        // Negative cursors keep their two's complement sector bits
        let range = SectorRange::from_bytes(cursor as u64, length);

        log::info!(
            "BL2: Load dst={:#x} src=(p:{}){:#x}({}) len={:#x}({})",
            buffer.as_ptr() as usize,
            partition.as_raw(),
            cursor,
            range.start,
            length,
            range.count
        );

        let status = if cursor < 0 {
            debug_storage!("emmc: read at negative offset {}", cursor);
            Err(IoError::Fail)
        } else {
            self.transfer(buffer, range)
        };

        self.slot.bound(file).cursor = cursor.wrapping_add(length as i64);
        ReadReport { bytes_read: length, status }
    }

    fn transfer(&mut self, buffer: &mut [u8], range: SectorRange) -> IoResult<()> {
        if range.is_empty() {
            return Ok(());
        }

        let flags = LoadFlags::for_destination(buffer.as_ptr() as usize, buffer.len());
        self.host
            .read_sectors(buffer, range.start, range.count, flags)
            .map_err(transfer_failed)
    }

    /// Close the file and release the slot
    pub fn close(&mut self, file: EmmcFile) {
        self.slot.release(file);
    }

    /// Release the slot left bound by a failed open
    ///
    /// Returns `false` if there was no failed open to release.
    pub fn release_failed(&mut self) -> bool {
        match self.failed.take() {
            Some(file) => {
                self.slot.release(file);
                true
            }
            None => false,
        }
    }
}
