//! eMMC Host Traits
//!
//! Partition selection and boot configuration access for eMMC devices.

use crate::block::SectorRead;
use crate::DriverResult;

/// Index of PARTITION_CONFIG in the EXT_CSD register block
pub const EXT_CSD_PARTITION_CONFIG: usize = 179;

/// BOOT_PARTITION_ENABLE field of PARTITION_CONFIG (bits 5:3)
pub const PARTITION_CONFIG_BOOT_ENABLE_MASK: u8 = 0x38;
pub const PARTITION_CONFIG_BOOT_ENABLE_SHIFT: u32 = 3;

/// eMMC hardware partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PartitionId {
    /// User data area
    User = 0,
    /// Boot area partition 1
    Boot1 = 1,
    /// Boot area partition 2
    Boot2 = 2,
}

impl PartitionId {
    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    pub const fn is_boot(self) -> bool {
        matches!(self, PartitionId::Boot1 | PartitionId::Boot2)
    }
}

impl TryFrom<u32> for PartitionId {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(PartitionId::User),
            1 => Ok(PartitionId::Boot1),
            2 => Ok(PartitionId::Boot2),
            other => Err(other),
        }
    }
}

/// Extract BOOT_PARTITION_ENABLE from a raw PARTITION_CONFIG byte
pub const fn boot_partition_enable(partition_config: u8) -> u8 {
    (partition_config & PARTITION_CONFIG_BOOT_ENABLE_MASK) >> PARTITION_CONFIG_BOOT_ENABLE_SHIFT
}

/// Partition switching
pub trait PartitionSelect {
    /// Switch subsequent transfers to `id`
    ///
    /// Selecting the partition that is already active must succeed.
    fn select_partition(&mut self, id: PartitionId) -> DriverResult<()>;
}

/// Device configuration captured during card identification
pub trait BootConfig {
    /// Raw PARTITION_CONFIG byte (EXT_CSD[179])
    fn partition_config(&self) -> u8;
}

/// Everything an eMMC storage driver needs from the platform
pub trait EmmcHost: SectorRead + PartitionSelect + BootConfig {}

impl<T: SectorRead + PartitionSelect + BootConfig + ?Sized> EmmcHost for T {}
