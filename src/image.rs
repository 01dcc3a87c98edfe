//! Boot image descriptors

use bl2_io::DrvSpec;

/// Where an image lives on the boot device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDesc {
    /// Name used in log output
    pub name: &'static str,
    /// Raw partition number; `None` loads from the device's boot partition
    pub partition: Option<u32>,
    /// Byte offset within the partition
    pub offset: usize,
    /// Image length in bytes
    pub length: usize,
}

impl ImageDesc {
    pub const fn new(name: &'static str, offset: usize, length: usize) -> Self {
        ImageDesc {
            name,
            partition: None,
            offset,
            length,
        }
    }

    pub const fn with_partition(mut self, partition: u32) -> Self {
        self.partition = Some(partition);
        self
    }

    /// Open request for this image
    pub fn spec(&self) -> DrvSpec {
        DrvSpec {
            offset: self.offset,
            partition: self.partition,
        }
    }
}
