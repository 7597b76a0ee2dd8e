//! U3D block parsing modules.
//!
//! A U3D stream is a flat sequence of blocks. Each block carries a type id,
//! a data section and a metadata section, both padded to 4 bytes. Block
//! decoders read their data section through a fresh
//! [`DataReader`](crate::decode::DataReader), using the decoding parameters
//! established by the File Block.

pub mod container;
pub mod document;
pub mod file_block;
pub mod file_reference_block;

pub use container::{block_padding, ContainerReader, RawBlock};
pub use document::{ParseOptions, U3dDocument};
pub use file_block::{FileBlock, FileBlockParser};
pub use file_reference_block::{
    AxisAlignedBoundingBox, BoundingSphere, FileReferenceBlock, FileReferenceBlockParser, Filter,
};

use crate::error::{Result, U3dError};
use crate::text::{EncodingRsCodec, TextCodec, MIB_UTF_8};

/// U3D block type ids.
pub mod block_type {
    /// File Block, only meaningful as the first block of a stream.
    pub const FILE: u32 = 0x0044_3355;
    /// File Reference Block.
    pub const FILE_REFERENCE: u32 = 0xFFFF_FF12;
}

/// Decoded block.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    File(FileBlock),
    FileReference(FileReferenceBlock),
    /// A block whose type this decoder does not interpret.
    Unknown { block_type: u32 },
}

impl Block {
    /// Type id of the block as it appeared in the container.
    pub fn block_type(&self) -> u32 {
        match self {
            Self::File(_) => block_type::FILE,
            Self::FileReference(_) => block_type::FILE_REFERENCE,
            Self::Unknown { block_type } => *block_type,
        }
    }
}

/// Decoding parameters shared by all block decoders of one stream.
#[derive(Clone, Copy)]
pub struct DecodeContext<'c> {
    /// Whether context-coded values are range coded
    pub compressed: bool,
    /// MIB enum of the string encoding
    pub encoding: u32,
    pub codec: &'c dyn TextCodec,
}

impl<'c> DecodeContext<'c> {
    pub fn new(codec: &'c dyn TextCodec) -> Self {
        Self {
            compressed: true,
            encoding: MIB_UTF_8,
            codec,
        }
    }

    /// Adopt the parameters declared by a File Block.
    pub fn apply_file_block(&mut self, file_block: &FileBlock) {
        self.compressed = !file_block.is_no_compression_mode();
        self.encoding = file_block.character_encoding;
    }
}

impl Default for DecodeContext<'static> {
    fn default() -> Self {
        Self::new(&EncodingRsCodec)
    }
}

impl std::fmt::Debug for DecodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeContext")
            .field("compressed", &self.compressed)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

/// Reject a metadata section; its key/value format is not decoded.
pub(crate) fn parse_metadata(block_type: u32, metadata: &[u8]) -> Result<()> {
    if metadata.is_empty() {
        return Ok(());
    }
    Err(U3dError::UnsupportedMetadata {
        block_type,
        size: metadata.len(),
    })
}

/// Reject a decoded element count the remaining payload cannot hold.
///
/// Every element consumes at least one byte, so `count` may not exceed the
/// bytes left in the reader.
pub(crate) fn check_count(field: &'static str, count: u32, remaining: usize) -> Result<()> {
    if count as usize > remaining {
        return Err(U3dError::InvalidCount {
            field,
            count,
            remaining,
        });
    }
    Ok(())
}
