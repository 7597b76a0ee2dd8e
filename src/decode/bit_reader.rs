//! Bit cursor for U3D streams.
//!
//! Reads bits from a byte slice, LSB first within each byte. Multi-bit reads
//! place the first bit read in the most significant position.

use super::{DecodeError, Result};

/// Positional bit reader over an immutable byte slice.
///
/// Reads past the end yield zero bits and leave the position unchanged;
/// only whole-byte extraction reports a short read.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    /// Current bit position, never beyond `len_bits()`
    position: usize,
}

impl<'a> BitCursor<'a> {
    /// Create a cursor at bit 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bit at an absolute position, 0 past the end.
    #[inline]
    fn bit_at(&self, position: usize) -> u32 {
        match self.data.get(position / 8) {
            Some(&byte) => u32::from(byte >> (position % 8)) & 1,
            None => 0,
        }
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> u32 {
        if self.position >= self.len_bits() {
            return 0;
        }
        let bit = self.bit_at(self.position);
        self.position += 1;
        bit
    }

    /// Read `n` bits (at most 15), first bit read in the highest position.
    #[inline]
    pub fn read_bits(&mut self, n: u32) -> u32 {
        debug_assert!(n <= 15);
        let mut value = 0;
        for _ in 0..n {
            value = (value << 1) | self.read_bit();
        }
        value
    }

    /// Skip `n` bits, stopping at the end of the data.
    #[inline]
    pub fn skip_bits(&mut self, n: usize) {
        self.advance(n);
    }

    /// Commit `bits` consumed bits, clamped to the end of the data.
    #[inline]
    pub fn advance(&mut self, bits: usize) {
        self.position = self.position.saturating_add(bits).min(self.len_bits());
    }

    /// The 16-bit code window at the current position.
    ///
    /// One bit, then `pending` bits skipped, then 15 more bits. The position
    /// is not touched; the range decoder commits consumed bits separately.
    pub fn code_window(&self, pending: u32) -> u32 {
        let mut code = self.bit_at(self.position);
        let mut position = self.position + 1 + pending as usize;
        for _ in 0..15 {
            code = (code << 1) | self.bit_at(position);
            position += 1;
        }
        code
    }

    /// Read `count` whole bytes. The cursor must be byte aligned.
    pub fn read_aligned_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if !self.is_aligned() {
            return Err(DecodeError::Misaligned {
                bit_position: self.position,
            });
        }

        let start = self.position / 8;
        let have = self.data.len() - start;
        if count > have {
            return Err(DecodeError::UnexpectedEof {
                needed: count,
                have,
            });
        }

        self.position += count * 8;
        Ok(&self.data[start..start + count])
    }

    /// Whether the position sits on a byte boundary.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.position % 8 == 0
    }

    /// Check if all bits have been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.position >= self.len_bits()
    }

    /// Get the current bit position.
    pub fn bit_position(&self) -> usize {
        self.position
    }

    /// Whole bytes left after the current position.
    pub fn remaining_bytes(&self) -> usize {
        (self.len_bits() - self.position) / 8
    }

    /// Total length in bits.
    #[inline]
    pub fn len_bits(&self) -> usize {
        self.data.len() * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits_lsb_first() {
        let data = [0b1011_0100, 0b0000_0001];
        let mut cursor = BitCursor::new(&data);

        assert_eq!(cursor.read_bit(), 0);
        assert_eq!(cursor.read_bit(), 0);
        assert_eq!(cursor.read_bit(), 1);
        // Bits 3..8 are 0,1,1,0,1 in read order
        assert_eq!(cursor.read_bits(5), 0b01101);
        assert_eq!(cursor.read_bits(1), 1);
        assert_eq!(cursor.bit_position(), 9);
    }

    #[test]
    fn test_past_end_yields_zero() {
        let data = [0xFF];
        let mut cursor = BitCursor::new(&data);

        assert_eq!(cursor.read_bits(8), 0xFF);
        assert!(cursor.at_end());
        assert_eq!(cursor.read_bit(), 0);
        assert_eq!(cursor.read_bits(15), 0);
        assert_eq!(cursor.bit_position(), 8);
    }

    #[test]
    fn test_skip_clamps_to_end() {
        let data = [0u8; 2];
        let mut cursor = BitCursor::new(&data);

        cursor.skip_bits(3);
        assert_eq!(cursor.bit_position(), 3);
        cursor.skip_bits(100);
        assert_eq!(cursor.bit_position(), 16);
        assert!(cursor.at_end());
    }

    #[test]
    fn test_code_window_is_lookahead() {
        let data = [0xFF, 0xFF, 0x00];
        let cursor = BitCursor::new(&data);

        assert_eq!(cursor.code_window(0), 0xFFFF);
        // Skipping 4 pending bits pulls four zero bits from byte 2 into the window
        assert_eq!(cursor.code_window(4), 0xFFF0);
        assert_eq!(cursor.bit_position(), 0);
    }

    #[test]
    fn test_code_window_past_end() {
        let data = [0x01];
        let cursor = BitCursor::new(&data);
        assert_eq!(cursor.code_window(0), 0x8000);
    }

    #[test]
    fn test_read_aligned_bytes() {
        let data = [1, 2, 3, 4];
        let mut cursor = BitCursor::new(&data);

        assert_eq!(cursor.read_aligned_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.remaining_bytes(), 2);
        assert_eq!(
            cursor.read_aligned_bytes(3),
            Err(DecodeError::UnexpectedEof { needed: 3, have: 2 })
        );
        assert_eq!(cursor.read_aligned_bytes(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_read_aligned_bytes_misaligned() {
        let data = [1, 2, 3, 4];
        let mut cursor = BitCursor::new(&data);

        cursor.read_bit();
        assert_eq!(
            cursor.read_aligned_bytes(1),
            Err(DecodeError::Misaligned { bit_position: 1 })
        );
    }
}
