//! File Reference Block parser.
//!
//! A File Reference Block points at external U3D files whose contents are
//! merged into the scene, optionally restricted by object filters.

use super::{block_type, check_count, parse_metadata, DecodeContext};
use crate::decode::DataReader;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: [f32; 3],
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Restricts which objects of the referenced file are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Objects whose name matches the pattern
    ObjectName(String),
    /// Objects of the given block type
    ObjectType(u32),
    /// Filter type this decoder does not know; carries no payload
    Unknown(u8),
}

impl Filter {
    pub const OBJECT_NAME: u8 = 0x00;
    pub const OBJECT_TYPE: u8 = 0x01;

    pub fn filter_type(&self) -> u8 {
        match self {
            Self::ObjectName(_) => Self::OBJECT_NAME,
            Self::ObjectType(_) => Self::OBJECT_TYPE,
            Self::Unknown(t) => *t,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReferenceBlock {
    pub scope_name: String,
    pub attributes: u32,
    pub bounding_sphere: Option<BoundingSphere>,
    pub bounding_box: Option<AxisAlignedBoundingBox>,
    pub urls: Vec<String>,
    pub filters: Vec<Filter>,
    pub name_collision_policy: u8,
    pub world_alias_name: String,
}

impl FileReferenceBlock {
    pub const ATTRIBUTE_BOUNDING_SPHERE: u32 = 0x0000_0001;
    pub const ATTRIBUTE_BOUNDING_BOX: u32 = 0x0000_0002;
}

pub struct FileReferenceBlockParser;

impl FileReferenceBlockParser {
    pub fn parse(
        data: &[u8],
        metadata: &[u8],
        context: &DecodeContext<'_>,
    ) -> Result<FileReferenceBlock> {
        let mut reader = DataReader::new(data, context.compressed);
        let (codec, encoding) = (context.codec, context.encoding);

        let scope_name = reader.read_string(codec, encoding);
        let attributes = reader.read_u32();

        let bounding_sphere = (attributes & FileReferenceBlock::ATTRIBUTE_BOUNDING_SPHERE != 0)
            .then(|| {
                let [x, y, z, radius] = reader.read_f32_array::<4>();
                BoundingSphere {
                    center: [x, y, z],
                    radius,
                }
            });
        let bounding_box = (attributes & FileReferenceBlock::ATTRIBUTE_BOUNDING_BOX != 0).then(|| {
            let [x0, y0, z0, x1, y1, z1] = reader.read_f32_array::<6>();
            AxisAlignedBoundingBox {
                min: [x0, y0, z0],
                max: [x1, y1, z1],
            }
        });

        let url_count = reader.read_u32();
        check_count("URL count", url_count, reader.remaining_bytes())?;
        let urls = reader.read_string_list(url_count, codec, encoding);

        let filter_count = reader.read_u32();
        check_count("filter count", filter_count, reader.remaining_bytes())?;
        let mut filters = Vec::with_capacity(filter_count as usize);
        for _ in 0..filter_count {
            let filter = match reader.read_u8() {
                Filter::OBJECT_NAME => Filter::ObjectName(reader.read_string(codec, encoding)),
                Filter::OBJECT_TYPE => Filter::ObjectType(reader.read_u32()),
                other => Filter::Unknown(other),
            };
            filters.push(filter);
        }

        let name_collision_policy = reader.read_u8();
        let world_alias_name = reader.read_string(codec, encoding);

        parse_metadata(block_type::FILE_REFERENCE, metadata)?;

        Ok(FileReferenceBlock {
            scope_name,
            attributes,
            bounding_sphere,
            bounding_box,
            urls,
            filters,
            name_collision_policy,
            world_alias_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::U3dError;

    fn string(out: &mut Vec<u8>, text: &str) {
        out.extend_from_slice(&(text.len() as u16).to_le_bytes());
        out.extend_from_slice(text.as_bytes());
    }

    fn floats(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    #[test]
    fn test_parse_full_reference() {
        let mut data = Vec::new();
        string(&mut data, "scope");
        data.extend_from_slice(&3u32.to_le_bytes());
        floats(&mut data, &[1.0, 2.0, 3.0, 0.5]);
        floats(&mut data, &[-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]);
        data.extend_from_slice(&2u32.to_le_bytes());
        string(&mut data, "file:///a.u3d");
        string(&mut data, "http://example.com/b.u3d");
        data.extend_from_slice(&3u32.to_le_bytes());
        data.push(0x00);
        string(&mut data, "Box*");
        data.push(0x01);
        data.extend_from_slice(&0xFFFF_FF21u32.to_le_bytes());
        data.push(0x07);
        data.push(0x01);
        string(&mut data, "world");

        let block =
            FileReferenceBlockParser::parse(&data, &[], &DecodeContext::default()).unwrap();

        assert_eq!(block.scope_name, "scope");
        assert_eq!(
            block.bounding_sphere,
            Some(BoundingSphere {
                center: [1.0, 2.0, 3.0],
                radius: 0.5
            })
        );
        assert_eq!(
            block.bounding_box,
            Some(AxisAlignedBoundingBox {
                min: [-1.0; 3],
                max: [1.0; 3]
            })
        );
        assert_eq!(block.urls, vec!["file:///a.u3d", "http://example.com/b.u3d"]);
        assert_eq!(
            block.filters,
            vec![
                Filter::ObjectName("Box*".to_string()),
                Filter::ObjectType(0xFFFF_FF21),
                Filter::Unknown(0x07),
            ]
        );
        assert_eq!(block.filters[1].filter_type(), Filter::OBJECT_TYPE);
        assert_eq!(block.name_collision_policy, 1);
        assert_eq!(block.world_alias_name, "world");
    }

    #[test]
    fn test_optional_bounds_absent() {
        let mut data = Vec::new();
        string(&mut data, "");
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.push(0x00);
        string(&mut data, "");

        let block =
            FileReferenceBlockParser::parse(&data, &[], &DecodeContext::default()).unwrap();
        assert!(block.bounding_sphere.is_none());
        assert!(block.bounding_box.is_none());
        assert!(block.urls.is_empty());
        assert!(block.filters.is_empty());
    }

    #[test]
    fn test_rejects_oversized_count() {
        let mut data = Vec::new();
        string(&mut data, "s");
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0x7FFF_FFFFu32.to_le_bytes());

        let result = FileReferenceBlockParser::parse(&data, &[], &DecodeContext::default());
        assert_eq!(
            result,
            Err(U3dError::InvalidCount {
                field: "URL count",
                count: 0x7FFF_FFFF,
                remaining: 0,
            })
        );
    }
}
