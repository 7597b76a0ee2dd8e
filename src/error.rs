//! Error types for U3D stream parsing.
//!
//! This module provides the [`U3dError`] type returned by the block
//! container parser and the block decoders.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Framing | [`Misaligned`], [`BufferTooSmall`] | Container sections do not fit the stream |
//! | Structure | [`InvalidCount`], [`TooManyBlocks`] | Decoded counts exceed what the input can hold |
//! | Unsupported | [`UnsupportedMetadata`] | Block metadata sections are not decoded |
//!
//! Truncated bit reads are not errors: the bit cursor yields zero bits past
//! the end, so a short payload shows up as wrong values rather than a
//! failure. Unrecognized block types are not errors either.
//!
//! ## Example
//!
//! ```rust
//! use u3d_stream::{U3dDocument, U3dError};
//!
//! // Declares 16 bytes of block data but carries none.
//! let stream = [0x01, 0, 0, 0, 0x10, 0, 0, 0, 0, 0, 0, 0];
//! match U3dDocument::parse(&stream) {
//!     Err(U3dError::BufferTooSmall { needed, have }) => {
//!         assert_eq!((needed, have), (16, 0));
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```
//!
//! [`Misaligned`]: U3dError::Misaligned
//! [`BufferTooSmall`]: U3dError::BufferTooSmall
//! [`InvalidCount`]: U3dError::InvalidCount
//! [`TooManyBlocks`]: U3dError::TooManyBlocks
//! [`UnsupportedMetadata`]: U3dError::UnsupportedMetadata

use std::fmt;

use crate::decode::DecodeError;

/// Error type for U3D parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum U3dError {
    /// A byte-span read was requested while the bit cursor was mid-byte.
    Misaligned {
        /// Bit position of the cursor at the time of the request.
        bit_position: usize,
    },

    /// A container section declares more bytes than the stream holds.
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        have: usize,
    },

    /// A block carries a metadata section.
    ///
    /// Metadata key/value decoding is not implemented, so any block decoder
    /// that meets a non-empty metadata section stops the parse.
    UnsupportedMetadata {
        /// Type id of the block carrying the metadata.
        block_type: u32,
        /// Size of the metadata section in bytes.
        size: usize,
    },

    /// A decoded element count cannot be satisfied by the remaining payload.
    InvalidCount {
        /// Name of the count field.
        field: &'static str,
        /// The decoded count.
        count: u32,
        /// Payload bytes left when the count was read.
        remaining: usize,
    },

    /// The stream holds more blocks than [`ParseOptions::max_blocks`] allows.
    ///
    /// [`ParseOptions::max_blocks`]: crate::ParseOptions::max_blocks
    TooManyBlocks {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for U3dError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misaligned { bit_position } => {
                write!(f, "Byte read at unaligned bit position {}", bit_position)
            }
            Self::BufferTooSmall { needed, have } => {
                write!(f, "Buffer too small: need {} bytes, have {}", needed, have)
            }
            Self::UnsupportedMetadata { block_type, size } => write!(
                f,
                "Metadata of block 0x{:08x} is not supported ({} bytes)",
                block_type, size
            ),
            Self::InvalidCount {
                field,
                count,
                remaining,
            } => write!(
                f,
                "Invalid {}: {} exceeds the {} remaining bytes",
                field, count, remaining
            ),
            Self::TooManyBlocks { limit } => {
                write!(f, "Stream holds more than {} blocks", limit)
            }
        }
    }
}

impl std::error::Error for U3dError {}

impl From<DecodeError> for U3dError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Misaligned { bit_position } => Self::Misaligned { bit_position },
            DecodeError::UnexpectedEof { needed, have } => Self::BufferTooSmall { needed, have },
        }
    }
}

pub type Result<T> = std::result::Result<T, U3dError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_conversion() {
        let err: U3dError = DecodeError::UnexpectedEof { needed: 8, have: 3 }.into();
        assert_eq!(err, U3dError::BufferTooSmall { needed: 8, have: 3 });

        let err: U3dError = DecodeError::Misaligned { bit_position: 13 }.into();
        assert_eq!(err, U3dError::Misaligned { bit_position: 13 });
    }

    #[test]
    fn test_display() {
        let err = U3dError::UnsupportedMetadata {
            block_type: 0x0044_3355,
            size: 12,
        };
        assert_eq!(
            err.to_string(),
            "Metadata of block 0x00443355 is not supported (12 bytes)"
        );
    }
}
