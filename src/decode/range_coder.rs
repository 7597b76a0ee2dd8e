//! Adaptive range decoder used by U3D.
//!
//! The interval `[low, high]` lives in a 16-bit domain. After each symbol
//! the settled leading bits are shifted out; the cursor only advances by the
//! number of bits the interval actually consumed.

use super::bit_reader::BitCursor;
use super::context::ContextTable;

const HALF_MASK: u32 = 0x0000_8000;
const NOT_HALF_MASK: u32 = 0x0000_7FFF;
const QUARTER_MASK: u32 = 0x0000_4000;
const NOT_THREE_QUARTER_MASK: u32 = 0x0000_3FFF;

/// Leading bits shared by `low` and `high`, indexed by the XOR of their top nibbles.
const BIT_COUNTS: [u32; 16] = [4, 3, 2, 2, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0];

/// Mask clearing the shared leading bits before the shift.
const FAST_NOT_MASK: [u32; 5] = [0x0000_FFFF, 0x0000_7FFF, 0x0000_3FFF, 0x0000_1FFF, 0x0000_0FFF];

/// Interval state of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeState {
    pub low: u32,
    pub high: u32,
    /// Bits deferred by underflow handling, paid off on the next shift
    pub underflow: u32,
}

impl Default for RangeState {
    fn default() -> Self {
        Self {
            low: 0,
            high: 0x0000_FFFF,
            underflow: 0,
        }
    }
}

/// Range decoder state plus the statistics it decodes against.
#[derive(Debug, Clone)]
pub struct RangeDecoder<'a> {
    cursor: BitCursor<'a>,
    contexts: ContextTable,
    state: RangeState,
}

impl<'a> RangeDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: BitCursor::new(data),
            contexts: ContextTable::new(),
            state: RangeState::default(),
        }
    }

    /// Decode one symbol in `context` and update its statistics.
    pub fn decode_symbol(&mut self, context: u32) -> u32 {
        let RangeState {
            mut low,
            mut high,
            underflow: pending,
        } = self.state;

        let code = self.cursor.code_window(pending);

        let total = self.contexts.total_frequency(context).max(1);
        let range = high + 1 - low;
        // A valid stream keeps the code inside the interval; clamp so that
        // corrupt input still selects an in-range target.
        let offset = code.saturating_sub(low).min(range - 1);
        let target = ((u64::from(total) * u64::from(offset + 1) - 1) / u64::from(range)) as u32;

        let symbol = self.contexts.symbol_for_cumulative_frequency(context, target);
        let cumulative = self.contexts.cumulative_frequency_below(context, symbol);
        let frequency = self.contexts.frequency(context, symbol);

        let scaled = |count: u32| (u64::from(range) * u64::from(count) / u64::from(total)) as u32;
        high = (low + scaled(cumulative.saturating_add(frequency).min(total)))
            .saturating_sub(1)
            .max(low);
        low += scaled(cumulative.min(total));
        high = high.max(low);
        self.contexts.record_symbol(context, symbol);

        // Shift out the leading bits that low and high already share
        let mut bit_count = BIT_COUNTS[(((low >> 12) ^ (high >> 12)) & 0xF) as usize];
        low &= FAST_NOT_MASK[bit_count as usize];
        high &= FAST_NOT_MASK[bit_count as usize];
        low <<= bit_count;
        high = (high << bit_count) | ((1 << bit_count) - 1);

        let mut masked_low = low & HALF_MASK;
        let mut masked_high = high & HALF_MASK;
        while (masked_low | masked_high) == 0
            || (masked_low == HALF_MASK && masked_high == HALF_MASK)
        {
            low = (low & NOT_HALF_MASK) << 1;
            high = ((high & NOT_HALF_MASK) << 1) | 1;
            masked_low = low & HALF_MASK;
            masked_high = high & HALF_MASK;
            bit_count += 1;
        }

        let saved_low = masked_low;
        let saved_high = masked_high;

        let mut underflow = pending;
        if bit_count > 0 {
            bit_count += underflow;
            underflow = 0;
        }

        // Interval straddles the midpoint without settling a bit: defer
        masked_low = low & QUARTER_MASK;
        masked_high = high & QUARTER_MASK;
        while masked_low == QUARTER_MASK && masked_high == 0 {
            low = (low & NOT_THREE_QUARTER_MASK) << 1;
            high = ((high & NOT_THREE_QUARTER_MASK) << 1) | 1;
            masked_low = low & QUARTER_MASK;
            masked_high = high & QUARTER_MASK;
            underflow += 1;
        }

        self.state = RangeState {
            low: low | saved_low,
            high: high | saved_high,
            underflow,
        };
        self.cursor.advance(bit_count as usize);

        symbol
    }

    pub fn state(&self) -> RangeState {
        self.state
    }

    pub fn contexts(&self) -> &ContextTable {
        &self.contexts
    }

    pub fn contexts_mut(&mut self) -> &mut ContextTable {
        &mut self.contexts
    }

    pub fn cursor(&self) -> &BitCursor<'a> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut BitCursor<'a> {
        &mut self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::LITERAL_CONTEXT;

    #[test]
    fn test_initial_state() {
        let decoder = RangeDecoder::new(&[]);
        assert_eq!(
            decoder.state(),
            RangeState {
                low: 0,
                high: 0xFFFF,
                underflow: 0
            }
        );
    }

    #[test]
    fn test_literal_consumes_one_byte() {
        let data = [0x5A, 0xC3];
        let mut decoder = RangeDecoder::new(&data);

        let symbol = decoder.decode_symbol(LITERAL_CONTEXT);
        assert_eq!(symbol, u32::from(0x5Au8.reverse_bits()) + 1);
        assert_eq!(decoder.cursor().bit_position(), 8);
        assert_eq!(decoder.state(), RangeState::default());

        let symbol = decoder.decode_symbol(LITERAL_CONTEXT);
        assert_eq!(symbol, u32::from(0xC3u8.reverse_bits()) + 1);
        assert_eq!(decoder.cursor().bit_position(), 16);
    }

    #[test]
    fn test_escape_on_fresh_context_consumes_nothing() {
        let data = [0xFF, 0xFF];
        let mut decoder = RangeDecoder::new(&data);

        assert_eq!(decoder.decode_symbol(7), 0);
        assert_eq!(decoder.cursor().bit_position(), 0);
        assert_eq!(decoder.state(), RangeState::default());
        assert_eq!(decoder.contexts().stats(7).unwrap().frequency(0), 2);
    }

    #[test]
    fn test_empty_input_stays_bounded() {
        let mut decoder = RangeDecoder::new(&[]);
        for context in [LITERAL_CONTEXT, 1, 2, 0x400, 0x401, 0x500] {
            decoder.decode_symbol(context);
            let state = decoder.state();
            assert!(state.low <= state.high);
            assert!(state.high <= 0xFFFF);
        }
        assert!(decoder.cursor().at_end());
    }
}
