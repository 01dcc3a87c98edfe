//! BL2 image loading
//!
//! Wires the eMMC driver into the I/O layer and loads boot images from it.
//!
//! ```rust,ignore
//! let mut emmc = bl2::EmmcDevice::new(host);
//! let mut io = bl2::IoRegistry::new();
//! let dev = bl2_driver_emmc::register(&mut io, &mut emmc)?;
//!
//! let loader = bl2::ImageLoader::new(io, dev);
//! loader.load(&ImageDesc::new("bl31", 0x4_0000, 0x2_0000), bl31_region)?;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod image;
pub mod loader;

pub use bl2_driver_emmc::EmmcDevice;
pub use bl2_io::{IoError, IoRegistry, IoResult};
pub use image::ImageDesc;
pub use loader::ImageLoader;
