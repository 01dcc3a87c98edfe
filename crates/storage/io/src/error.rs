//! I/O Error types

/// Result code for a successful operation
pub const IO_SUCCESS: i32 = 0;

/// I/O Result type
pub type IoResult<T> = Result<T, IoError>;

/// I/O Error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// Bad parameter, unsupported operation or device failure
    Fail,
    /// No free slot (device table, entity table or driver file slot)
    ResourcesExhausted,
}

impl IoError {
    /// Convert to the numeric result code used by boot firmware callers
    pub fn code(&self) -> i32 {
        match self {
            IoError::Fail => -1,
            IoError::ResourcesExhausted => -3,
        }
    }
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IoError::Fail => write!(f, "I/O failure"),
            IoError::ResourcesExhausted => write!(f, "resources exhausted"),
        }
    }
}

/// Collapse a result into its numeric result code
pub fn result_code<T>(result: &IoResult<T>) -> i32 {
    match result {
        Ok(_) => IO_SUCCESS,
        Err(e) => e.code(),
    }
}
