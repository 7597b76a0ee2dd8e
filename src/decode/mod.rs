//! U3D value decoding.
//!
//! Every value in a U3D stream, compressed or not, passes through an
//! adaptive range decoder. Uncompressed values use the static 8-bit
//! literal context, whose uniform distribution makes the decoder a plain
//! pass-through of the underlying bits.
//!
//! ## Contexts
//!
//! | Id range | Kind | Total frequency |
//! |----------|------|-----------------|
//! | `0` | Literal byte | 256 |
//! | `1..0x400` | Adaptive, with histogram | learned |
//! | `0x400..0x43FF` | Adaptive, id-derived | `id - 0x400` |
//! | `0x43FF..` | Not compressible | - |
//!
//! ## Architecture
//!
//! ```text
//! Block payload
//!       ↓
//! ┌──────────────┐
//! │ BitCursor    │ ← Bit-level access, LSB first within a byte
//! └──────────────┘
//!       ↓
//! ┌──────────────┐
//! │ RangeDecoder │ ← Interval narrowing + ContextTable statistics
//! └──────────────┘
//!       ↓
//! ┌──────────────┐
//! │ DataReader   │ ← Integers, floats, strings, compressed-or-raw values
//! └──────────────┘
//! ```

mod bit_reader;
mod context;
mod data_reader;
mod range_coder;


pub use bit_reader::BitCursor;
pub use context::{
    ContextTable, SymbolCount, SymbolStats, LITERAL_CONTEXT, MAX_CUMULATIVE_COUNT,
    MAX_HISTOGRAM_SYMBOL, MAX_RANGE, STATIC_FULL,
};
pub use data_reader::DataReader;
pub use range_coder::{RangeDecoder, RangeState};

use std::fmt;

/// Errors raised by byte-span reads on the bit cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The cursor is not on a byte boundary.
    Misaligned { bit_position: usize },
    /// Fewer whole bytes remain than were requested.
    UnexpectedEof { needed: usize, have: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misaligned { bit_position } => {
                write!(f, "Cursor not byte aligned (bit {})", bit_position)
            }
            Self::UnexpectedEof { needed, have } => {
                write!(f, "Unexpected end of data: need {} bytes, have {}", needed, have)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

pub type Result<T> = std::result::Result<T, DecodeError>;
