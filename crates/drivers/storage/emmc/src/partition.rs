//! Partition resolution for open requests

use bl2_driver_traits::emmc::{boot_partition_enable, PartitionId};

/// Cached default boot partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootPartition {
    /// PARTITION_CONFIG has not been consulted successfully yet
    #[default]
    Unresolved,
    /// Boot partition the device is configured to boot from
    Resolved(PartitionId),
}

/// Why a partition could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// BOOT_PARTITION_ENABLE does not name a boot partition (raw field value)
    InvalidBootPartition(u8),
}

/// Pick the partition for an open request.
///
/// While the default is unresolved the request is ignored and the
/// partition comes from `partition_config` (only read in that case). A
/// resolved default is used when nothing is requested or the request is not
/// a valid partition number. A valid request applies to this open only and
/// never changes the cached default.
pub fn resolve(
    cache: &mut BootPartition,
    requested: Option<u32>,
    partition_config: impl FnOnce() -> u8,
) -> Result<PartitionId, ResolveError> {
    let default = match *cache {
        BootPartition::Resolved(id) => id,
        BootPartition::Unresolved => {
            let raw = boot_partition_enable(partition_config());
            return match PartitionId::try_from(u32::from(raw)) {
                Ok(id) if id.is_boot() => {
                    *cache = BootPartition::Resolved(id);
                    Ok(id)
                }
                _ => Err(ResolveError::InvalidBootPartition(raw)),
            };
        }
    };

    Ok(requested
        .and_then(|raw| PartitionId::try_from(raw).ok())
        .unwrap_or(default))
}
