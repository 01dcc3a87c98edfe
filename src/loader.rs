//! Image loading through the I/O layer

use spin::Mutex;

use bl2_io::{DevHandle, EntityHandle, IoError, IoRegistry, IoResult, IoType, SeekMode};

use crate::image::ImageDesc;

/// Loads images from one boot device
///
/// The registry sits behind a lock, so a loader shared between contexts
/// (it is `Sync`) still performs each open/seek/read/close sequence as one
/// unit.
pub struct ImageLoader<'a> {
    io: Mutex<IoRegistry<'a>>,
    dev: DevHandle,
}

impl<'a> ImageLoader<'a> {
    pub fn new(io: IoRegistry<'a>, dev: DevHandle) -> Self {
        ImageLoader {
            io: Mutex::new(io),
            dev,
        }
    }

    pub fn device_type(&self) -> IoType {
        self.io.lock().device_type(self.dev)
    }

    /// Load one image into the start of `dest`
    ///
    /// The entity is closed on every path once it has been opened. Returns
    /// the number of bytes read.
    pub fn load(&self, image: &ImageDesc, dest: &mut [u8]) -> IoResult<usize> {
        let available = dest.len();
        let dest = match dest.get_mut(..image.length) {
            Some(dest) => dest,
            None => {
                log::warn!(
                    "BL2: {} needs {:#x} bytes, buffer holds {:#x}",
                    image.name,
                    image.length,
                    available
                );
                return Err(IoError::Fail);
            }
        };

        let mut io = self.io.lock();
        let entity = io.open(self.dev, &image.spec())?;
        let loaded = Self::read_image(&mut io, &entity, image, dest);
        let closed = io.close(entity);

        let bytes = loaded?;
        closed?;
        log::info!("BL2: loaded {} ({:#x} bytes)", image.name, bytes);
        Ok(bytes)
    }

    fn read_image(
        io: &mut IoRegistry<'a>,
        entity: &EntityHandle,
        image: &ImageDesc,
        dest: &mut [u8],
    ) -> IoResult<usize> {
        io.seek(entity, SeekMode::Set, image.offset as i64)?;
        io.read(entity, dest).into_result()
    }

    /// Load images in order, stopping at the first failure
    ///
    /// Returns how many images were loaded.
    pub fn load_all(&self, images: &mut [(ImageDesc, &mut [u8])]) -> IoResult<usize> {
        for (image, dest) in images.iter_mut() {
            if let Err(err) = self.load(image, dest) {
                log::warn!("BL2: failed to load {}: {}", image.name, err);
                return Err(err);
            }
        }
        Ok(images.len())
    }

    /// Give the registry back
    pub fn into_inner(self) -> IoRegistry<'a> {
        self.io.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl2_driver_emmc::EmmcDevice;
    use bl2_driver_traits::block::{SectorRead, SECTOR_SIZE};
    use bl2_driver_traits::emmc::{BootConfig, PartitionId, PartitionSelect};
    use bl2_driver_traits::{DriverError, DriverResult, LoadFlags};

    /// Host whose sector `n` of partition `p` is filled with `p * 0x40 + n`
    struct PatternHost {
        active: PartitionId,
        fail_reads: usize,
        reads: usize,
    }

    impl PatternHost {
        fn new() -> Self {
            Self { active: PartitionId::User, fail_reads: 0, reads: 0 }
        }
    }

    fn pattern(partition: PartitionId, sector: usize) -> u8 {
        (partition.as_raw() as usize * 0x40 + sector) as u8
    }

    impl SectorRead for PatternHost {
        fn read_sectors(&mut self, dest: &mut [u8], start: u32, _count: u32, _flags: LoadFlags) -> DriverResult<()> {
            self.reads += 1;
            if self.fail_reads > 0 {
                self.fail_reads -= 1;
                return Err(DriverError::IoError);
            }
            for (i, byte) in dest.iter_mut().enumerate() {
                *byte = pattern(self.active, start as usize + i / SECTOR_SIZE);
            }
            Ok(())
        }
    }

    impl PartitionSelect for PatternHost {
        fn select_partition(&mut self, id: PartitionId) -> DriverResult<()> {
            self.active = id;
            Ok(())
        }
    }

    impl BootConfig for PatternHost {
        fn partition_config(&self) -> u8 {
            0x10 // boot partition 2
        }
    }

    fn loader<'a>(emmc: &'a mut EmmcDevice<PatternHost>) -> ImageLoader<'a> {
        let mut io = IoRegistry::new();
        let dev = bl2_driver_emmc::register(&mut io, emmc).unwrap();
        ImageLoader::new(io, dev)
    }

    #[test]
    fn test_loader_is_shareable() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<ImageLoader<'static>>();
    }

    #[test]
    fn test_shared_loader_serialises_loads() {
        let mut emmc = EmmcDevice::new(PatternHost::new());
        let loader = loader(&mut emmc);

        // Unserialised, the second open would find the driver busy
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let mut dest = [0u8; 512];
                    let image = ImageDesc::new("bl31", 0x200, 512);
                    assert_eq!(loader.load(&image, &mut dest), Ok(512));
                });
            }
        });

        assert_eq!(loader.into_inner().open_entities(), 0);
        assert_eq!(emmc.driver().host().reads, 4);
    }

    #[test]
    fn test_load_from_boot_partition() {
        let mut emmc = EmmcDevice::new(PatternHost::new());
        let loader = loader(&mut emmc);
        assert_eq!(loader.device_type(), IoType::Memmap);

        let image = ImageDesc::new("bl31", 0x400, 0x300);
        let mut dest = [0u8; 0x400];
        assert_eq!(loader.load(&image, &mut dest), Ok(0x300));

        assert!(dest[..0x200].iter().all(|&b| b == pattern(PartitionId::Boot2, 2)));
        assert!(dest[0x200..0x300].iter().all(|&b| b == pattern(PartitionId::Boot2, 3)));
        assert!(dest[0x300..].iter().all(|&b| b == 0));

        drop(loader);
        assert!(!emmc.driver().is_open());
    }

    #[test]
    fn test_load_from_named_partition() {
        let mut emmc = EmmcDevice::new(PatternHost::new());
        let loader = loader(&mut emmc);

        // The first open always resolves the boot partition
        let mut dest = [0u8; 16];
        loader.load(&ImageDesc::new("cert", 0, 16), &mut dest).unwrap();

        let image = ImageDesc::new("user", 0x200, 16).with_partition(0);
        loader.load(&image, &mut dest).unwrap();
        assert!(dest.iter().all(|&b| b == pattern(PartitionId::User, 1)));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut emmc = EmmcDevice::new(PatternHost::new());
        let loader = loader(&mut emmc);

        let mut dest = [0u8; 8];
        assert_eq!(loader.load(&ImageDesc::new("big", 0, 9), &mut dest), Err(IoError::Fail));
        drop(loader);
        assert_eq!(emmc.driver().host().reads, 0);
    }

    #[test]
    fn test_failed_read_still_closes() {
        let mut host = PatternHost::new();
        host.fail_reads = 1;
        let mut emmc = EmmcDevice::new(host);
        let loader = loader(&mut emmc);

        let image = ImageDesc::new("bl33", 0, 512);
        let mut dest = [0u8; 512];
        assert_eq!(loader.load(&image, &mut dest), Err(IoError::Fail));
        assert_eq!(loader.load(&image, &mut dest), Ok(512));

        let io = loader.into_inner();
        assert_eq!(io.open_entities(), 0);
    }

    #[test]
    fn test_load_all_stops_at_failure() {
        let mut emmc = EmmcDevice::new(PatternHost::new());
        let loader = loader(&mut emmc);

        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        let mut c = [0u8; 32];
        let mut images = [
            (ImageDesc::new("a", 0, 32), &mut a[..]),
            (ImageDesc::new("b", 0, 64), &mut b[..]),
            (ImageDesc::new("c", 0, 32), &mut c[..]),
        ];
        assert_eq!(loader.load_all(&mut images), Err(IoError::Fail));
        drop(loader);

        assert_eq!(emmc.driver().host().reads, 1);
        assert!(a.iter().all(|&x| x == pattern(PartitionId::Boot2, 0)));
        assert!(c.iter().all(|&x| x == 0));
    }

    #[test]
    fn test_load_all() {
        let mut emmc = EmmcDevice::new(PatternHost::new());
        let loader = loader(&mut emmc);

        let mut a = [0u8; 512];
        let mut b = [0u8; 100];
        let mut images = [
            (ImageDesc::new("a", 0, 512), &mut a[..]),
            (ImageDesc::new("b", 0x1000, 100), &mut b[..]),
        ];
        assert_eq!(loader.load_all(&mut images), Ok(2));
        assert!(b.iter().all(|&x| x == pattern(PartitionId::Boot2, 8)));
    }
}
