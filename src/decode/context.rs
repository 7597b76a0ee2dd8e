//! Context statistics for the U3D range decoder.
//!
//! Adaptive contexts keep a histogram of the symbols seen so far. Symbol 0
//! is the escape symbol: it is always present and signals "value not seen
//! before" to the typed reads.

use std::collections::{BTreeMap, HashMap};

/// Static context for raw 8-bit values (uniform over 256 symbols).
pub const LITERAL_CONTEXT: u32 = 0;

/// First context id whose total frequency is derived from the id.
pub const STATIC_FULL: u32 = 0x0000_0400;

/// First context id that cannot be compressed at all.
pub const MAX_RANGE: u32 = STATIC_FULL + 0x0000_3FFF;

/// Histogram total at which counts are halved.
pub const MAX_CUMULATIVE_COUNT: u32 = 0x0000_1FFF;

/// Symbols at or above this value are never tracked.
pub const MAX_HISTOGRAM_SYMBOL: u32 = 0x0000_FFFF;

/// Count of one histogram symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolCount {
    /// Occurrences of the symbol
    pub count: u32,
    /// Sum of the counts of this symbol and every symbol above it
    pub cumulative: u32,
}

/// Symbol histogram of one adaptive context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolStats {
    symbols: BTreeMap<u32, SymbolCount>,
}

impl SymbolStats {
    /// A histogram holding only the escape symbol with count 1.
    pub fn new() -> Self {
        let mut symbols = BTreeMap::new();
        symbols.insert(
            0,
            SymbolCount {
                count: 1,
                cumulative: 1,
            },
        );
        Self { symbols }
    }

    /// Total frequency, the cumulative count of the escape symbol.
    #[inline]
    pub fn total(&self) -> u32 {
        self.symbols.get(&0).map_or(0, |s| s.cumulative)
    }

    /// Count of `symbol`, 0 if untracked.
    pub fn frequency(&self, symbol: u32) -> u32 {
        self.symbols.get(&symbol).map_or(0, |s| s.count)
    }

    /// Sum of the counts of all symbols below `symbol`.
    pub fn cumulative_below(&self, symbol: u32) -> u32 {
        match self.symbols.get(&symbol) {
            Some(s) => self.total() - s.cumulative,
            None => self.total(),
        }
    }

    /// The last symbol (ascending) whose cumulative-below is at most `target`.
    pub fn symbol_for_cumulative_frequency(&self, target: u32) -> u32 {
        let total = self.total();
        if target == 0 || target > total {
            return 0;
        }

        self.symbols
            .iter()
            .take_while(|(_, s)| total - s.cumulative <= target)
            .last()
            .map_or(0, |(&symbol, _)| symbol)
    }

    /// Count one occurrence of `symbol`, rescaling first if the total is
    /// at its ceiling.
    pub fn record(&mut self, symbol: u32) {
        if symbol >= MAX_HISTOGRAM_SYMBOL {
            return;
        }

        if self.total() >= MAX_CUMULATIVE_COUNT {
            self.rescale();
        }

        if !self.symbols.contains_key(&symbol) {
            // A new entry starts with the cumulative count of its upper neighbour
            let above = self
                .symbols
                .range(symbol + 1..)
                .next()
                .map_or(0, |(_, s)| s.cumulative);
            self.symbols.insert(
                symbol,
                SymbolCount {
                    count: 0,
                    cumulative: above,
                },
            );
        }

        for (&key, entry) in self.symbols.range_mut(..=symbol) {
            if key == symbol {
                entry.count += 1;
            }
            entry.cumulative += 1;
        }
    }

    /// Halve every count and rebuild the cumulative sums from the top.
    ///
    /// The escape symbol is bumped by one afterwards so it stays decodable.
    pub fn rescale(&mut self) {
        let mut accumulated = 0;
        for entry in self.symbols.values_mut().rev() {
            entry.count >>= 1;
            accumulated += entry.count;
            entry.cumulative = accumulated;
        }

        let escape = self.symbols.entry(0).or_default();
        escape.count += 1;
        escape.cumulative += 1;
    }

    /// Iterate tracked symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, SymbolCount)> + '_ {
        self.symbols.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl Default for SymbolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Probability model shared by all reads of one decoding session.
#[derive(Debug, Clone, Default)]
pub struct ContextTable {
    contexts: HashMap<u32, SymbolStats>,
}

impl ContextTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether typed reads on `context` go through the range decoder.
    #[inline]
    pub fn is_adaptive(&self, context: u32) -> bool {
        context != LITERAL_CONTEXT && context < MAX_RANGE
    }

    /// Whether `context` keeps a symbol histogram.
    #[inline]
    pub fn has_statistics(&self, context: u32) -> bool {
        context != LITERAL_CONTEXT && context < STATIC_FULL
    }

    pub fn total_frequency(&self, context: u32) -> u32 {
        if self.has_statistics(context) {
            self.contexts.get(&context).map_or(1, SymbolStats::total)
        } else if context == LITERAL_CONTEXT {
            256
        } else {
            context.wrapping_sub(STATIC_FULL)
        }
    }

    pub fn frequency(&self, context: u32, symbol: u32) -> u32 {
        if !self.has_statistics(context) {
            return 1;
        }
        match self.contexts.get(&context) {
            Some(stats) => stats.frequency(symbol),
            None => u32::from(symbol == 0),
        }
    }

    pub fn cumulative_frequency_below(&self, context: u32, symbol: u32) -> u32 {
        if !self.has_statistics(context) {
            return symbol.wrapping_sub(1);
        }
        self.contexts
            .get(&context)
            .map_or(0, |stats| stats.cumulative_below(symbol))
    }

    /// Inverse lookup: the symbol whose interval contains `target`.
    pub fn symbol_for_cumulative_frequency(&self, context: u32, target: u32) -> u32 {
        if !self.has_statistics(context) {
            return target.wrapping_add(1);
        }
        self.contexts
            .get(&context)
            .map_or(0, |stats| stats.symbol_for_cumulative_frequency(target))
    }

    /// Count one occurrence of `symbol` in a histogram context.
    pub fn record_symbol(&mut self, context: u32, symbol: u32) {
        if self.has_statistics(context) && symbol < MAX_HISTOGRAM_SYMBOL {
            self.contexts.entry(context).or_default().record(symbol);
        }
    }

    /// Histogram of `context`, if any symbol was recorded there.
    pub fn stats(&self, context: u32) -> Option<&SymbolStats> {
        self.contexts.get(&context)
    }
}
