//! Error types for driver operations

use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// `done` was not observed within the polling window
    #[error("timed out after {cycles} cycles waiting for done ({op})")]
    Timeout {
        /// Transaction being waited on
        op: &'static str,
        /// Size of the polling window
        cycles: u64,
    },

    /// A checked read returned something other than the expected value
    #[error("read of register {addr:#x} returned {actual:#04x}, expected {expected:#04x}")]
    Mismatch { addr: u8, expected: u8, actual: u8 },
}
