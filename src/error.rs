//! Errors raised to the host.

use thiserror::Error;

/// An error raised by one of the conversion entry points.
///
/// Every variant displays as a non-empty, human readable message, which is
/// what hosts surface as their exception message.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A string could not be marshaled to or from NUL-terminated UTF-8. Input
    /// strings failing this way never reach the engine.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The engine rejected the input; the message comes from its error slot.
    #[error("{0}")]
    Conversion(String),

    /// The engine failed without recording a message.
    #[error("unknown error")]
    Unknown,

    /// A native input buffer could not be allocated.
    #[error("failed to allocate {0} bytes for a native string")]
    Allocation(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
