//! Sector Transfer Trait
//!
//! Implemented by the platform's storage host controller glue.
//! Used by storage drivers (eMMC, etc.)

use bitflags::bitflags;

use crate::DriverResult;

/// Sector size as a shift (512 bytes)
pub const SECTOR_SIZE_SHIFT: u32 = 9;

/// Sector size in bytes
pub const SECTOR_SIZE: usize = 1 << SECTOR_SIZE_SHIFT;

bitflags! {
    /// Flags passed along with a sector transfer
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LoadFlags: u32 {
        /// The destination is reachable by the 32-bit DMA engine
        const DMA_ENABLE = 0x0000_0001;
    }
}

impl LoadFlags {
    /// Flags for a transfer into `length` bytes starting at address `dest`.
    ///
    /// DMA is only requested when the whole destination range ends inside
    /// the 32-bit address space.
    pub fn for_destination(dest: usize, length: usize) -> Self {
        match (dest as u64).checked_add(length as u64) {
            Some(end) if end <= u64::from(u32::MAX) => LoadFlags::DMA_ENABLE,
            _ => LoadFlags::empty(),
        }
    }
}

/// Raw sector transfer interface
pub trait SectorRead {
    /// Read sectors from the currently selected partition
    ///
    /// # Arguments
    /// * `dest` - Buffer to read into
    /// * `start` - Starting sector
    /// * `count` - Number of sectors covering `dest`
    /// * `flags` - Transfer hints
    ///
    /// `dest` is filled from the start of sector `start`. The last sector may
    /// be partially copied; implementors never write past `dest.len()`.
    fn read_sectors(
        &mut self,
        dest: &mut [u8],
        start: u32,
        count: u32,
        flags: LoadFlags,
    ) -> DriverResult<()>;
}
