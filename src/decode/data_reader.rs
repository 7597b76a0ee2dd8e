//! Typed value reads over the range decoder.
//!
//! Raw values are composed little-endian from 8-bit literal reads. Compressed
//! values go through an adaptive context when the stream is compressed; an
//! escape symbol means the value follows raw and is then learned by the
//! context.

use super::context::LITERAL_CONTEXT;
use super::range_coder::RangeDecoder;
use super::Result;
use crate::text::TextCodec;

/// One decoding session over a block payload.
#[derive(Debug, Clone)]
pub struct DataReader<'a> {
    decoder: RangeDecoder<'a>,
    compressed: bool,
}

impl<'a> DataReader<'a> {
    /// Create a reader. `compressed` enables context-coded reads.
    pub fn new(data: &'a [u8], compressed: bool) -> Self {
        Self {
            decoder: RangeDecoder::new(data),
            compressed,
        }
    }

    #[inline]
    pub fn read_u8(&mut self) -> u8 {
        let symbol = self.decoder.decode_symbol(LITERAL_CONTEXT);
        // The encoder stores literals bit-reversed and shifted by one
        (symbol.wrapping_sub(1) as u8).reverse_bits()
    }

    pub fn read_u16(&mut self) -> u16 {
        let low = u16::from(self.read_u8());
        let high = u16::from(self.read_u8());
        low | (high << 8)
    }

    pub fn read_u32(&mut self) -> u32 {
        let low = u32::from(self.read_u16());
        let high = u32::from(self.read_u16());
        low | (high << 16)
    }

    pub fn read_u64(&mut self) -> u64 {
        let low = u64::from(self.read_u32());
        let high = u64::from(self.read_u32());
        low | (high << 32)
    }

    pub fn read_i16(&mut self) -> i16 {
        self.read_u16() as i16
    }

    pub fn read_i32(&mut self) -> i32 {
        self.read_u32() as i32
    }

    pub fn read_f32(&mut self) -> f32 {
        f32::from_bits(self.read_u32())
    }

    pub fn read_f64(&mut self) -> f64 {
        f64::from_bits(self.read_u64())
    }

    /// Read `N` consecutive 32-bit floats.
    pub fn read_f32_array<const N: usize>(&mut self) -> [f32; N] {
        let mut values = [0.0; N];
        for value in &mut values {
            *value = self.read_f32();
        }
        values
    }

    /// Decode a context-coded symbol, or `None` when the raw path applies.
    ///
    /// Symbol 0 escapes to a raw value, which the caller reads and registers.
    fn decode_compressed(&mut self, context: u32) -> Option<u32> {
        if self.compressed && self.decoder.contexts().is_adaptive(context) {
            Some(self.decoder.decode_symbol(context))
        } else {
            None
        }
    }

    fn learn(&mut self, context: u32, value: u32) {
        self.decoder
            .contexts_mut()
            .record_symbol(context, value.wrapping_add(1));
    }

    pub fn read_compressed_u8(&mut self, context: u32) -> u8 {
        match self.decode_compressed(context) {
            Some(0) => {
                let value = self.read_u8();
                self.learn(context, u32::from(value));
                value
            }
            Some(symbol) => (symbol - 1) as u8,
            None => self.read_u8(),
        }
    }

    pub fn read_compressed_u16(&mut self, context: u32) -> u16 {
        match self.decode_compressed(context) {
            Some(0) => {
                let value = self.read_u16();
                self.learn(context, u32::from(value));
                value
            }
            Some(symbol) => (symbol - 1) as u16,
            None => self.read_u16(),
        }
    }

    pub fn read_compressed_u32(&mut self, context: u32) -> u32 {
        match self.decode_compressed(context) {
            Some(0) => {
                let value = self.read_u32();
                self.learn(context, value);
                value
            }
            Some(symbol) => symbol - 1,
            None => self.read_u32(),
        }
    }

    /// Read `size` bytes directly from the stream. Requires byte alignment.
    pub fn read_byte_array(&mut self, size: usize) -> Result<&'a [u8]> {
        self.decoder.cursor_mut().read_aligned_bytes(size)
    }

    /// Skip `size` bytes, stopping at the end of the data. Requires byte alignment.
    pub fn skip_bytes(&mut self, size: usize) -> Result<()> {
        let cursor = self.decoder.cursor_mut();
        if !cursor.is_aligned() {
            return Err(super::DecodeError::Misaligned {
                bit_position: cursor.bit_position(),
            });
        }
        cursor.skip_bits(size.saturating_mul(8));
        Ok(())
    }

    /// Read a `u16` length followed by that many characters.
    pub fn read_string(&mut self, codec: &dyn TextCodec, encoding: u32) -> String {
        let size = self.read_u16();
        let bytes: Vec<u8> = (0..size).map(|_| self.read_u8()).collect();
        codec.decode(encoding, &bytes)
    }

    pub fn read_string_list(
        &mut self,
        count: u32,
        codec: &dyn TextCodec,
        encoding: u32,
    ) -> Vec<String> {
        (0..count)
            .map(|_| self.read_string(codec, encoding))
            .collect()
    }

    pub fn is_at_end(&self) -> bool {
        self.decoder.cursor().at_end()
    }

    /// Whole bytes left in the payload.
    pub fn remaining_bytes(&self) -> usize {
        self.decoder.cursor().remaining_bytes()
    }

    pub fn decoder(&self) -> &RangeDecoder<'a> {
        &self.decoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodeError;
    use crate::text::{EncodingRsCodec, MIB_UTF_8};

    #[test]
    fn test_read_u8_every_value() {
        for v in 0..=255u8 {
            let data = [v];
            let mut reader = DataReader::new(&data, true);
            assert_eq!(reader.read_u8(), v);
            assert!(reader.is_at_end());
        }
    }

    #[test]
    fn test_little_endian_composition() {
        let data = [
            0x34, 0x12, // u16
            0x78, 0x56, 0x34, 0x12, // u32
            0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01, // u64
        ];
        let mut reader = DataReader::new(&data, false);
        assert_eq!(reader.read_u16(), 0x1234);
        assert_eq!(reader.read_u32(), 0x1234_5678);
        assert_eq!(reader.read_u64(), 0x0123_4567_89AB_CDEF);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_signed_and_float() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-2i16).to_le_bytes());
        data.extend_from_slice(&(-70000i32).to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-0.25f64).to_le_bytes());

        let mut reader = DataReader::new(&data, true);
        assert_eq!(reader.read_i16(), -2);
        assert_eq!(reader.read_i32(), -70000);
        assert_eq!(reader.read_f32(), 1.5);
        assert_eq!(reader.read_f64(), -0.25);
    }

    #[test]
    fn test_uncompressed_stream_reads_raw() {
        let data = [0x2A, 0x01, 0x02, 0x10, 0x20, 0x30, 0x40];
        let mut reader = DataReader::new(&data, false);
        assert_eq!(reader.read_compressed_u8(5), 0x2A);
        assert_eq!(reader.read_compressed_u16(5), 0x0201);
        assert_eq!(reader.read_compressed_u32(5), 0x4030_2010);
        assert!(reader.decoder().contexts().stats(5).is_none());
    }

    #[test]
    fn test_literal_context_is_never_compressed() {
        let data = [0x99];
        let mut reader = DataReader::new(&data, true);
        assert_eq!(reader.read_compressed_u8(LITERAL_CONTEXT), 0x99);
    }

    #[test]
    fn test_new_value_is_learned() {
        let data = [0x41];
        let mut reader = DataReader::new(&data, true);
        assert_eq!(reader.read_compressed_u8(9), 0x41);

        let stats = reader.decoder().contexts().stats(9).unwrap();
        assert_eq!(stats.frequency(0x42), 1);
        assert_eq!(stats.frequency(0), 2);
    }

    #[test]
    fn test_read_string() {
        let mut data = vec![5, 0];
        data.extend_from_slice(b"hello");
        data.extend_from_slice(&[2, 0, b'h', b'i']);

        let mut reader = DataReader::new(&data, true);
        let strings = reader.read_string_list(2, &EncodingRsCodec, MIB_UTF_8);
        assert_eq!(strings, vec!["hello".to_string(), "hi".to_string()]);
    }

    #[test]
    fn test_byte_array_after_values() {
        let data = [0x03, 0x00, 0xAA, 0xBB, 0xCC, 0xDD];
        let mut reader = DataReader::new(&data, true);
        assert_eq!(reader.read_u16(), 3);
        assert_eq!(reader.read_byte_array(3).unwrap(), &[0xAA, 0xBB, 0xCC]);
        reader.skip_bytes(10).unwrap();
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_misaligned_byte_array() {
        let data = [0xFF, 0xFF, 0xFF];
        let mut reader = DataReader::new(&data, true);
        // Fresh adaptive context: escape consumes nothing, the raw byte 8 bits.
        // Then a compressed read of the learned value shifts a single bit.
        assert_eq!(reader.read_compressed_u8(3), 0xFF);
        assert_eq!(reader.read_compressed_u8(3), 0xFF);
        assert_eq!(
            reader.read_byte_array(1),
            Err(DecodeError::Misaligned { bit_position: 9 })
        );
        assert!(reader.skip_bytes(1).is_err());
    }
}
