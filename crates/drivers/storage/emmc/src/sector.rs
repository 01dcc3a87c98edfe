//! Byte range to sector range translation

use bl2_driver_traits::block::{SECTOR_SIZE, SECTOR_SIZE_SHIFT};

/// Sectors covering a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorRange {
    /// Sector containing the first byte
    pub start: u32,
    /// Number of sectors, rounded up
    pub count: u32,
}

impl SectorRange {
    /// Map `length` bytes at `offset` onto sectors.
    ///
    /// The offset is not required to be sector aligned; it simply selects
    /// the sector that contains it. eMMC sector addresses are 32 bits wide,
    /// so the start is truncated to that width.
    pub fn from_bytes(offset: u64, length: usize) -> Self {
        let start = (offset >> SECTOR_SIZE_SHIFT) as u32;
        let count = (length as u64).div_ceil(SECTOR_SIZE as u64) as u32;
        SectorRange { start, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
