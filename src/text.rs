//! Byte to text conversion for U3D strings.
//!
//! U3D strings are length-prefixed byte runs in the character encoding
//! declared by the File Block, given as an IANA MIB enum number. The parser
//! only depends on the [`TextCodec`] trait; [`EncodingRsCodec`] is the
//! default implementation.

use encoding_rs::Encoding;

/// MIB enum of UTF-8, the encoding assumed until a File Block says otherwise.
pub const MIB_UTF_8: u32 = 106;

/// Converts encoded bytes to text for a given MIB encoding id.
pub trait TextCodec {
    fn decode(&self, encoding: u32, bytes: &[u8]) -> String;
}

/// [`TextCodec`] backed by `encoding_rs`.
///
/// Unknown ids fall back to windows-1252, the legacy 8-bit Latin encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodingRsCodec;

impl TextCodec for EncodingRsCodec {
    fn decode(&self, encoding: u32, bytes: &[u8]) -> String {
        let encoding = encoding_for_mib(encoding).unwrap_or_else(|| {
            log::warn!(
                "Unknown character encoding {}, decoding as windows-1252",
                encoding
            );
            encoding_rs::WINDOWS_1252
        });
        let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
        if had_errors {
            log::debug!("Malformed {} sequence in string", encoding.name());
        }
        text.into_owned()
    }
}

/// Map an IANA MIB enum number to an `encoding_rs` encoding.
///
/// ASCII and ISO-8859-1 resolve to windows-1252, as browsers do.
pub fn encoding_for_mib(mib: u32) -> Option<&'static Encoding> {
    let encoding = match mib {
        3 | 4 => encoding_rs::WINDOWS_1252,
        5 => encoding_rs::ISO_8859_2,
        6 => encoding_rs::ISO_8859_3,
        7 => encoding_rs::ISO_8859_4,
        8 => encoding_rs::ISO_8859_5,
        9 => encoding_rs::ISO_8859_6,
        10 => encoding_rs::ISO_8859_7,
        11 => encoding_rs::ISO_8859_8,
        12 => encoding_rs::WINDOWS_1254,
        13 => encoding_rs::ISO_8859_10,
        17 => encoding_rs::SHIFT_JIS,
        18 => encoding_rs::EUC_JP,
        36 => encoding_rs::EUC_KR,
        39 => encoding_rs::ISO_2022_JP,
        MIB_UTF_8 => encoding_rs::UTF_8,
        109 => encoding_rs::ISO_8859_13,
        110 => encoding_rs::ISO_8859_14,
        111 => encoding_rs::ISO_8859_15,
        112 => encoding_rs::ISO_8859_16,
        113 => encoding_rs::GBK,
        114 => encoding_rs::GB18030,
        1013 => encoding_rs::UTF_16BE,
        1014 | 1015 => encoding_rs::UTF_16LE,
        2025 => encoding_rs::GBK,
        2026 => encoding_rs::BIG5,
        2084 => encoding_rs::KOI8_R,
        2088 => encoding_rs::KOI8_U,
        2250 => encoding_rs::WINDOWS_1250,
        2251 => encoding_rs::WINDOWS_1251,
        2252 => encoding_rs::WINDOWS_1252,
        2253 => encoding_rs::WINDOWS_1253,
        2254 => encoding_rs::WINDOWS_1254,
        2255 => encoding_rs::WINDOWS_1255,
        2256 => encoding_rs::WINDOWS_1256,
        2257 => encoding_rs::WINDOWS_1257,
        2258 => encoding_rs::WINDOWS_1258,
        2259 => encoding_rs::WINDOWS_874,
        _ => return None,
    };
    Some(encoding)
}
