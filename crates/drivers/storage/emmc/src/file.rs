//! The single open-file slot
//!
//! There is no allocator during boot, so the driver keeps exactly one
//! pre-allocated file state. Binding it hands out an [`EmmcFile`] token;
//! only consuming that token releases the slot again.

use bl2_driver_traits::emmc::PartitionId;
use bl2_io::{IoError, IoResult};

/// State of the open file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileState {
    /// Opaque base handle of the open target
    pub base: usize,
    /// Byte offset of the next read. Seek may set any value.
    pub cursor: i64,
    /// Partition bound at open
    pub partition: PartitionId,
}

/// Proof that the driver's file slot is bound
///
/// Returned by open and consumed by close. It cannot be cloned or built
/// outside this crate.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the file slot stays bound until the file is closed"]
pub struct EmmcFile {
    _bound: (),
}

/// Pre-allocated slot for the one open file
#[derive(Debug, Default)]
pub struct FileSlot {
    state: Option<FileState>,
}

impl FileSlot {
    pub const fn new() -> Self {
        FileSlot { state: None }
    }

    pub fn in_use(&self) -> bool {
        self.state.is_some()
    }

    /// Bind the slot with a zeroed cursor
    ///
    /// `partition` is provisional until the caller has resolved the real one.
    pub(crate) fn bind(&mut self, base: usize, partition: PartitionId) -> IoResult<(EmmcFile, &mut FileState)> {
        if self.state.is_some() {
            return Err(IoError::ResourcesExhausted);
        }
        let state = self.state.insert(FileState { base, cursor: 0, partition });
        Ok((EmmcFile { _bound: () }, state))
    }

    /// State of the bound file
    ///
    /// # Panics
    /// If the slot is not bound. Holding an [`EmmcFile`] guarantees it is.
    pub(crate) fn bound(&mut self, _file: &EmmcFile) -> &mut FileState {
        match self.state.as_mut() {
            Some(state) => state,
            None => panic!("emmc: file slot used while unbound"),
        }
    }

    /// Release the slot
    pub(crate) fn release(&mut self, file: EmmcFile) {
        let EmmcFile { _bound: () } = file;
        self.state = None;
    }

    /// Snapshot of the bound state, if any
    pub fn state(&self) -> Option<&FileState> {
        self.state.as_ref()
    }
}
