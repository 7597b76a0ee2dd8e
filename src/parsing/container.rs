//! Block container framing.
//!
//! Each entry is laid out as:
//!
//! ```text
//! u32 block type
//! u32 data size
//! u32 metadata size
//! data      (data size bytes, padded to 4)
//! metadata  (metadata size bytes, padded to 4)
//! ```
//!
//! The three header fields are plain 32-bit reads through the literal
//! context, never context coded.

use std::iter::FusedIterator;

use crate::decode::DataReader;
use crate::error::Result;

/// Padding after a section of `size` bytes.
#[inline]
pub const fn block_padding(size: u32) -> u32 {
    (4 - size % 4) % 4
}

/// One framed block with its payload still undecoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    pub block_type: u32,
    pub data: &'a [u8],
    pub metadata: &'a [u8],
}

/// Iterates the framed blocks of a U3D stream.
///
/// The iterator is fused: after the end of the stream or the first error it
/// yields `None`.
pub struct ContainerReader<'a> {
    reader: DataReader<'a>,
    done: bool,
}

impl<'a> ContainerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: DataReader::new(data, true),
            done: false,
        }
    }

    /// Read the next block, or `None` once the stream is consumed.
    ///
    /// After an error every later call returns `Ok(None)`.
    pub fn next_block(&mut self) -> Result<Option<RawBlock<'a>>> {
        if self.done || self.reader.is_at_end() {
            self.done = true;
            return Ok(None);
        }

        let block = self.read_block();
        if block.is_err() {
            self.done = true;
        }
        block.map(Some)
    }

    fn read_block(&mut self) -> Result<RawBlock<'a>> {
        let block_type = self.reader.read_u32();
        let data_size = self.reader.read_u32();
        let metadata_size = self.reader.read_u32();

        let data = self.reader.read_byte_array(data_size as usize)?;
        self.reader.skip_bytes(block_padding(data_size) as usize)?;

        let metadata = self.reader.read_byte_array(metadata_size as usize)?;
        self.reader.skip_bytes(block_padding(metadata_size) as usize)?;

        Ok(RawBlock {
            block_type,
            data,
            metadata,
        })
    }
}

impl<'a> Iterator for ContainerReader<'a> {
    type Item = Result<RawBlock<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block().transpose()
    }
}

impl FusedIterator for ContainerReader<'_> {}
