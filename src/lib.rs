//! U3D stream decoding library.
//!
//! Reads the Universal 3D (ECMA-363) streams that documents embed as 3D
//! annotations: a bit-level reader, the adaptive range decoder U3D uses for
//! every value, and the block container layered on top of it.
//!
//! ## Layers
//! - [`decode`] - bit cursor, context statistics, range decoder, typed reads
//! - [`parsing`] - block container, File and File Reference blocks
//! - [`text`] - byte to text conversion selected by MIB encoding id
//!
//! ## Example
//!
//! ```rust
//! use u3d_stream::{Block, U3dDocument};
//!
//! // One unknown block with empty data and metadata sections.
//! let stream = [0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
//! let document = U3dDocument::parse(&stream).unwrap();
//! assert!(matches!(document.blocks(), [Block::Unknown { block_type: 1 }]));
//! assert!(document.file_block().is_none());
//! ```

pub mod decode;
pub mod error;
pub mod parsing;
pub mod text;

pub use decode::{DataReader, DecodeError};
pub use error::U3dError;
pub use parsing::{
    Block, DecodeContext, FileBlock, FileReferenceBlock, ParseOptions, U3dDocument,
};
pub use text::{EncodingRsCodec, TextCodec};
