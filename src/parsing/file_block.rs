//! File Block parser.
//!
//! The File Block opens a U3D stream and declares the parameters every
//! later block is decoded with: whether values are range coded and which
//! character encoding strings use.

use super::{block_type, parse_metadata, DecodeContext};
use crate::decode::DataReader;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct FileBlock {
    pub major_version: i16,
    pub minor_version: i16,
    pub profile_identifier: u32,
    pub declaration_size: u32,
    pub file_size: u64,
    /// MIB enum of the string encoding
    pub character_encoding: u32,
    /// Present when the profile defines units
    pub unit_scaling_factor: Option<f64>,
}

impl FileBlock {
    /// Profile uses extension blocks.
    pub const PROFILE_EXTENSIBLE: u32 = 0x0000_0002;
    /// Values are stored without range coding.
    pub const PROFILE_NO_COMPRESSION: u32 = 0x0000_0004;
    /// A unit scaling factor follows the encoding id.
    pub const PROFILE_DEFINES_UNITS: u32 = 0x0000_0008;

    pub fn is_extensible(&self) -> bool {
        self.profile_identifier & Self::PROFILE_EXTENSIBLE != 0
    }

    pub fn is_no_compression_mode(&self) -> bool {
        self.profile_identifier & Self::PROFILE_NO_COMPRESSION != 0
    }

    pub fn defines_units(&self) -> bool {
        self.profile_identifier & Self::PROFILE_DEFINES_UNITS != 0
    }

    /// Scaling factor applied to scene units, 1.0 unless declared.
    pub fn unit_scale(&self) -> f64 {
        self.unit_scaling_factor.unwrap_or(1.0)
    }
}

pub struct FileBlockParser;

impl FileBlockParser {
    pub fn parse(data: &[u8], metadata: &[u8], context: &DecodeContext<'_>) -> Result<FileBlock> {
        let mut reader = DataReader::new(data, context.compressed);

        let major_version = reader.read_i16();
        let minor_version = reader.read_i16();
        let profile_identifier = reader.read_u32();
        let declaration_size = reader.read_u32();
        let file_size = reader.read_u64();
        let character_encoding = reader.read_u32();

        let unit_scaling_factor = if profile_identifier & FileBlock::PROFILE_DEFINES_UNITS != 0 {
            Some(reader.read_f64())
        } else {
            None
        };

        parse_metadata(block_type::FILE, metadata)?;

        Ok(FileBlock {
            major_version,
            minor_version,
            profile_identifier,
            declaration_size,
            file_size,
            character_encoding,
            unit_scaling_factor,
        })
    }
}
