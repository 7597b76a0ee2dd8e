//! Top-level U3D stream parse.

use super::container::{ContainerReader, RawBlock};
use super::file_block::{FileBlock, FileBlockParser};
use super::file_reference_block::{FileReferenceBlock, FileReferenceBlockParser};
use super::{block_type, Block, DecodeContext};
use crate::error::{Result, U3dError};
use crate::text::{EncodingRsCodec, TextCodec, MIB_UTF_8};

/// Options for [`U3dDocument::parse_with`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// MIB enum used for strings until a File Block declares one.
    /// `None` means UTF-8.
    pub default_encoding: Option<u32>,
    /// Upper bound on the number of blocks; `None` means unbounded.
    pub max_blocks: Option<usize>,
}

/// A parsed U3D stream.
#[derive(Debug, Clone, PartialEq)]
pub struct U3dDocument {
    blocks: Vec<Block>,
    compressed: bool,
    encoding: u32,
}

impl U3dDocument {
    /// Parse a stream with default options and the `encoding_rs` codec.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &ParseOptions::default(), &EncodingRsCodec)
    }

    /// Parse a stream with explicit options and text codec.
    ///
    /// Any error aborts the whole parse.
    pub fn parse_with(
        data: &[u8],
        options: &ParseOptions,
        codec: &dyn TextCodec,
    ) -> Result<Self> {
        let mut context = DecodeContext::new(codec);
        context.encoding = options.default_encoding.unwrap_or(MIB_UTF_8);

        let mut blocks = Vec::new();
        for raw in ContainerReader::new(data) {
            let raw = raw?;
            if let Some(limit) = options.max_blocks {
                if blocks.len() >= limit {
                    return Err(U3dError::TooManyBlocks { limit });
                }
            }

            let block = parse_block(&raw, blocks.is_empty(), &context)?;
            if let Block::File(file_block) = &block {
                context.apply_file_block(file_block);
            }
            blocks.push(block);
        }

        log::debug!(
            "Parsed U3D stream: {} blocks, compressed={}, encoding={}",
            blocks.len(),
            context.compressed,
            context.encoding
        );

        Ok(Self {
            blocks,
            compressed: context.compressed,
            encoding: context.encoding,
        })
    }

    /// All blocks in stream order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The File Block, if the stream opens with one.
    pub fn file_block(&self) -> Option<&FileBlock> {
        match self.blocks.first() {
            Some(Block::File(file_block)) => Some(file_block),
            _ => None,
        }
    }

    pub fn file_reference_blocks(&self) -> impl Iterator<Item = &FileReferenceBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::FileReference(reference) => Some(reference),
            _ => None,
        })
    }

    /// Whether context-coded values were range coded.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// MIB enum of the string encoding in effect after parsing.
    pub fn text_encoding(&self) -> u32 {
        self.encoding
    }
}

/// Decode one framed block.
///
/// Only the first block of a stream is read as a File Block; later blocks
/// with the same type id are left uninterpreted.
fn parse_block(raw: &RawBlock<'_>, is_first: bool, context: &DecodeContext<'_>) -> Result<Block> {
    let block = match raw.block_type {
        block_type::FILE if is_first => Block::File(FileBlockParser::parse(
            raw.data,
            raw.metadata,
            context,
        )?),
        block_type::FILE_REFERENCE => Block::FileReference(FileReferenceBlockParser::parse(
            raw.data,
            raw.metadata,
            context,
        )?),
        other => {
            log::trace!(
                "Skipping block 0x{:08x} ({} data bytes)",
                other,
                raw.data.len()
            );
            return Ok(Block::Unknown { block_type: other });
        }
    };

    log::debug!("Parsed block 0x{:08x}", raw.block_type);
    Ok(block)
}
