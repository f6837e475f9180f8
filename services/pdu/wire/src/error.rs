//! Wire error types shared by every layer of a PDU chain.

use thiserror::Error;

/// Result type for wire operations
pub type WireResult<T> = Result<T, WireError>;

/// Wire errors
///
/// This is a closed set: decoding and serializing a chain can only fail in
/// one of these three ways. An unknown type code is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Buffer is shorter than the fixed header being decoded
    #[error("malformed packet: header needs {needed} bytes, {available} available")]
    MalformedPacket {
        /// Bytes the header occupies on the wire
        needed: usize,
        /// Bytes that were supplied
        available: usize,
    },

    /// Output buffer cannot hold the bytes being serialized
    #[error("buffer too small: need {needed} bytes, {available} available")]
    BufferTooSmall {
        /// Bytes required by the write
        needed: usize,
        /// Capacity left in the buffer
        available: usize,
    },

    /// Reader was asked for more bytes than remain
    #[error("insufficient data: requested {requested} bytes, {available} remaining")]
    InsufficientData {
        /// Bytes requested by the read
        requested: usize,
        /// Bytes left in the stream
        available: usize,
    },
}

impl WireError {
    /// Convert a reader signal into the error a header node reports.
    ///
    /// `InsufficientData` never leaves a node's decode routine; it surfaces
    /// as `MalformedPacket`. Other variants pass through unchanged. Nodes
    /// check their fixed header with `InputStream::require_header` first, so
    /// this only reports reads past it.
    pub fn at_node_boundary(self) -> Self {
        match self {
            WireError::InsufficientData {
                requested,
                available,
            } => WireError::MalformedPacket {
                needed: requested,
                available,
            },
            other => other,
        }
    }
}
