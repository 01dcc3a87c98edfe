//! Device and entity tables
//!
//! Both tables are fixed-size arrays; nothing here allocates.

use crate::device::{DrvSpec, IoDevice, IoType, ReadReport, SeekMode};
use crate::error::{IoError, IoResult};
use crate::{MAX_IO_DEVICES, MAX_IO_HANDLES};

/// Handle to a registered device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevHandle(usize);

impl DevHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Handle to an open entity
///
/// Not `Copy`: `close` consumes it, so a closed entity cannot be used again.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct EntityHandle(usize);

impl EntityHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An open entity: the device it lives on and the device's opaque state
#[derive(Debug, Clone, Copy)]
struct Entity {
    dev: usize,
    info: usize,
}

/// Registry of devices and the entities open on them
pub struct IoRegistry<'a> {
    devices: [Option<&'a mut dyn IoDevice>; MAX_IO_DEVICES],
    entities: [Option<Entity>; MAX_IO_HANDLES],
}

impl<'a> IoRegistry<'a> {
    /// Create an empty registry
    pub fn new() -> Self {
        IoRegistry {
            devices: core::array::from_fn(|_| None),
            entities: [None; MAX_IO_HANDLES],
        }
    }

    /// Register a device
    ///
    /// Fails with `ResourcesExhausted` once `MAX_IO_DEVICES` are registered.
    pub fn register(&mut self, device: &'a mut dyn IoDevice) -> IoResult<DevHandle> {
        let slot = self
            .devices
            .iter()
            .position(|d| d.is_none())
            .ok_or(IoError::ResourcesExhausted)?;
        self.devices[slot] = Some(device);
        Ok(DevHandle(slot))
    }

    /// Number of registered devices
    pub fn device_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_some()).count()
    }

    /// Number of open entities
    pub fn open_entities(&self) -> usize {
        self.entities.iter().filter(|e| e.is_some()).count()
    }

    /// Device type of a registered device
    pub fn device_type(&self, dev: DevHandle) -> IoType {
        match self.devices.get(dev.0) {
            Some(Some(device)) => device.device_type(),
            _ => panic!("io: unknown device handle {}", dev.0),
        }
    }

    /// Open an entity on a device
    ///
    /// An entity slot is reserved before the device is asked; it is
    /// released again if the device refuses the open.
    pub fn open(&mut self, dev: DevHandle, spec: &DrvSpec) -> IoResult<EntityHandle> {
        let slot = match self.entities.iter().position(|e| e.is_none()) {
            Some(slot) => slot,
            None => {
                log::warn!("io: no free entity for device {}", dev.0);
                return Err(IoError::ResourcesExhausted);
            }
        };

        let info = self.device_mut(dev.0).open(spec)?;
        self.entities[slot] = Some(Entity { dev: dev.0, info });
        Ok(EntityHandle(slot))
    }

    /// Seek within an open entity
    pub fn seek(&mut self, handle: &EntityHandle, mode: SeekMode, offset: i64) -> IoResult<()> {
        let entity = self.entity(handle);
        self.device_mut(entity.dev).seek(entity.info, mode, offset)
    }

    /// Read from an open entity
    pub fn read(&mut self, handle: &EntityHandle, buffer: &mut [u8]) -> ReadReport {
        let entity = self.entity(handle);
        self.device_mut(entity.dev).read(entity.info, buffer)
    }

    /// Close an open entity
    ///
    /// The entity slot is freed even if the device reports a failure.
    pub fn close(&mut self, handle: EntityHandle) -> IoResult<()> {
        let entity = self.entity(&handle);
        let result = self.device_mut(entity.dev).close(entity.info);
        self.entities[handle.0] = None;
        result
    }

    /// Close the connection to a device
    pub fn dev_close(&mut self, dev: DevHandle) -> IoResult<()> {
        self.device_mut(dev.0).dev_close()
    }

    fn entity(&self, handle: &EntityHandle) -> Entity {
        match self.entities.get(handle.0) {
            Some(Some(entity)) => *entity,
            _ => panic!("io: stale entity handle {}", handle.0),
        }
    }

    fn device_mut(&mut self, index: usize) -> &mut (dyn IoDevice + 'a) {
        match self.devices.get_mut(index) {
            Some(Some(device)) => &mut **device,
            _ => panic!("io: unknown device handle {}", index),
        }
    }
}

impl Default for IoRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Device that hands out increasing info values and counts calls
    struct CountingDevice {
        opens: usize,
        closes: usize,
        fail_open: bool,
        fail_close: bool,
        last_seek: Option<(usize, SeekMode, i64)>,
    }

    impl CountingDevice {
        fn new() -> Self {
            Self {
                opens: 0,
                closes: 0,
                fail_open: false,
                fail_close: false,
                last_seek: None,
            }
        }
    }

    impl IoDevice for CountingDevice {
        fn device_type(&self) -> IoType {
            IoType::Dummy
        }

        fn open(&mut self, _spec: &DrvSpec) -> IoResult<usize> {
            if self.fail_open {
                return Err(IoError::Fail);
            }
            self.opens += 1;
            Ok(100 + self.opens)
        }

        fn seek(&mut self, info: usize, mode: SeekMode, offset: i64) -> IoResult<()> {
            self.last_seek = Some((info, mode, offset));
            Ok(())
        }

        fn read(&mut self, _info: usize, buffer: &mut [u8]) -> ReadReport {
            buffer.fill(0xA5);
            ReadReport::ok(buffer.len())
        }

        fn close(&mut self, _info: usize) -> IoResult<()> {
            self.closes += 1;
            if self.fail_close {
                Err(IoError::Fail)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_register_until_full() {
        let mut a = CountingDevice::new();
        let mut b = CountingDevice::new();
        let mut c = CountingDevice::new();
        let mut d = CountingDevice::new();
        let mut io = IoRegistry::new();

        assert_eq!(io.register(&mut a).map(|h| h.index()), Ok(0));
        assert_eq!(io.register(&mut b).map(|h| h.index()), Ok(1));
        assert_eq!(io.register(&mut c).map(|h| h.index()), Ok(2));
        assert_eq!(io.register(&mut d), Err(IoError::ResourcesExhausted));
        assert_eq!(io.device_count(), MAX_IO_DEVICES);
    }

    #[test]
    fn test_open_dispatch() {
        let mut dev = CountingDevice::new();
        let mut io = IoRegistry::new();
        let h = io.register(&mut dev).unwrap();
        assert_eq!(io.device_type(h), IoType::Dummy);

        let e = io.open(h, &DrvSpec::new(0)).unwrap();
        io.seek(&e, SeekMode::Set, 0x200).unwrap();

        let mut buf = [0u8; 16];
        let report = io.read(&e, &mut buf);
        assert_eq!(report.into_result(), Ok(16));
        assert!(buf.iter().all(|&b| b == 0xA5));

        assert_eq!(io.close(e), Ok(()));
        assert_eq!(io.open_entities(), 0);
        drop(io);

        assert_eq!(dev.opens, 1);
        assert_eq!(dev.closes, 1);
        assert_eq!(dev.last_seek, Some((101, SeekMode::Set, 0x200)));
    }

    #[test]
    fn test_entity_table_exhausted() {
        let mut dev = CountingDevice::new();
        let mut io = IoRegistry::new();
        let h = io.register(&mut dev).unwrap();

        let mut handles = [None, None, None, None];
        for slot in handles.iter_mut() {
            *slot = Some(io.open(h, &DrvSpec::default()).unwrap());
        }
        assert_eq!(io.open(h, &DrvSpec::default()), Err(IoError::ResourcesExhausted));

        // Freeing one entity makes room again
        let first = handles[0].take().unwrap();
        io.close(first).unwrap();
        let again = io.open(h, &DrvSpec::default()).unwrap();
        assert_eq!(again.index(), 0);
    }

    #[test]
    fn test_failed_open_frees_entity() {
        let mut dev = CountingDevice::new();
        dev.fail_open = true;
        let mut io = IoRegistry::new();
        let h = io.register(&mut dev).unwrap();

        assert_eq!(io.open(h, &DrvSpec::default()), Err(IoError::Fail));
        assert_eq!(io.open_entities(), 0);
    }

    #[test]
    fn test_close_failure_still_frees_entity() {
        let mut dev = CountingDevice::new();
        dev.fail_close = true;
        let mut io = IoRegistry::new();
        let h = io.register(&mut dev).unwrap();

        let e = io.open(h, &DrvSpec::default()).unwrap();
        assert_eq!(io.close(e), Err(IoError::Fail));
        assert_eq!(io.open_entities(), 0);
    }

    #[test]
    #[should_panic(expected = "unknown device handle")]
    fn test_unknown_device_panics() {
        let io = IoRegistry::new();
        io.device_type(DevHandle(1));
    }
}
