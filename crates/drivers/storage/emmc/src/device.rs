//! I/O layer glue for the eMMC driver

use bl2_driver_traits::emmc::EmmcHost;
use bl2_io::{DrvSpec, IoDevice, IoError, IoResult, IoType, ReadReport, SeekMode};

use crate::driver::{EmmcDriver, OpenError};
use crate::file::EmmcFile;

/// eMMC driver as a registrable I/O device
///
/// Holds the open file on behalf of the entity the registry hands out.
pub struct EmmcDevice<H> {
    driver: EmmcDriver<H>,
    file: Option<EmmcFile>,
}

impl<H: EmmcHost> EmmcDevice<H> {
    pub const fn new(host: H) -> Self {
        EmmcDevice {
            driver: EmmcDriver::new(host),
            file: None,
        }
    }

    pub fn driver(&self) -> &EmmcDriver<H> {
        &self.driver
    }
}

impl<H: EmmcHost + Send> IoDevice for EmmcDevice<H> {
    fn device_type(&self) -> IoType {
        IoType::Memmap
    }

    /// A bound-but-failed open is closed here, so the registry never leaves
    /// the slot stranded without an entity to close it through.
    fn open(&mut self, spec: &DrvSpec) -> IoResult<usize> {
        match self.driver.open(spec) {
            Ok(file) => {
                self.file = Some(file);
                Ok(spec.offset)
            }
            Err(OpenError::Busy) => Err(IoError::ResourcesExhausted),
            Err(OpenError::Failed) => {
                self.driver.release_failed();
                Err(IoError::Fail)
            }
        }
    }

    fn seek(&mut self, _info: usize, mode: SeekMode, offset: i64) -> IoResult<()> {
        match self.file.as_ref() {
            Some(file) => self.driver.seek(file, mode, offset),
            None => panic!("emmc: seek without an open file"),
        }
    }

    fn read(&mut self, _info: usize, buffer: &mut [u8]) -> ReadReport {
        match self.file.as_ref() {
            Some(file) => self.driver.read(file, buffer),
            None => panic!("emmc: read without an open file"),
        }
    }

    fn close(&mut self, _info: usize) -> IoResult<()> {
        if let Some(file) = self.file.take() {
            self.driver.close(file);
        }
        Ok(())
    }

    fn dev_close(&mut self) -> IoResult<()> {
        // NOP
        Ok(())
    }
}
