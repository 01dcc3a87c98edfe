//! BL2 eMMC Driver
//!
//! Reads boot images from an eMMC device through the BL2 I/O layer. Only one
//! file can be open at a time: there is no allocator this early, so the
//! driver keeps a single pre-allocated file slot.
//!
//! On first open the boot partition is taken from the device's
//! PARTITION_CONFIG (EXT_CSD[179]) and cached. Later opens can name the user
//! area or either boot partition explicitly; an unknown partition number
//! falls back to the cached one.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bl2_driver_emmc::EmmcDevice;
//! use bl2_io::{DrvSpec, IoRegistry, SeekMode};
//!
//! let mut emmc = EmmcDevice::new(host);
//! let mut io = IoRegistry::new();
//! let dev = bl2_driver_emmc::register(&mut io, &mut emmc).expect("register failed");
//!
//! let file = io.open(dev, &DrvSpec::new(0x4_0000)).expect("open failed");
//! io.seek(&file, SeekMode::Set, 0x4_0000).expect("seek failed");
//! let mut image = [0u8; 0x1000];
//! io.read(&file, &mut image).into_result().expect("read failed");
//! io.close(file).expect("close failed");
//! ```

#![cfg_attr(not(test), no_std)]

pub mod device;
pub mod driver;
pub mod file;
pub mod partition;
pub mod sector;


use bl2_driver_traits::emmc::EmmcHost;
use bl2_driver_traits::DriverInfo;
use bl2_io::{DevHandle, IoRegistry, IoResult};

pub use device::EmmcDevice;
pub use driver::{EmmcDriver, OpenError};
pub use file::{EmmcFile, FileState};
pub use partition::{BootPartition, ResolveError};
pub use sector::SectorRange;

pub const DRIVER_INFO: DriverInfo = DriverInfo {
    name: "emmcdrv",
    version: "0.1.0",
    description: "eMMC boot partition driver",
};

/// Register an eMMC device with the I/O layer
pub fn register<'a, H: EmmcHost + Send>(
    registry: &mut IoRegistry<'a>,
    device: &'a mut EmmcDevice<H>,
) -> IoResult<DevHandle> {
    let handle = registry.register(device)?;
    log::info!(
        "{} {} ({}): registered as device {}",
        DRIVER_INFO.name,
        DRIVER_INFO.version,
        DRIVER_INFO.description,
        handle.index()
    );
    Ok(handle)
}
