//! Code Words and Symbols
//!
//! A character's Morse pattern is packed LSB-first into a byte: bit 0 = dit,
//! bit 1 = dah, and the highest set bit is a terminator. Shifting right until
//! the value is exactly `1` walks the symbols; the value `1` on its own is the
//! space character.
//!
//! [`CodeWord`] keeps that packing only at its edges ([`CodeWord::from_bits`],
//! [`CodeWord::to_bits`]). Internally it stores an explicit symbol count and
//! pattern, so there is no terminator to lose.

use core::fmt;
use core::iter::FusedIterator;

/// One Morse element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Short element (1 unit)
    Dit,
    /// Long element (3 units)
    Dah,
}

impl Symbol {
    /// Key-down duration in timing units
    #[must_use]
    pub const fn units(self) -> u32 {
        match self {
            Self::Dit => 1,
            Self::Dah => 3,
        }
    }

    /// Decode a single pattern bit (0 = dit, 1 = dah)
    #[must_use]
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Self::Dit
        } else {
            Self::Dah
        }
    }

    /// Encode as a single pattern bit
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Dit => 0,
            Self::Dah => 1,
        }
    }

    /// Printable form (`.` or `-`)
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Dit => '.',
            Self::Dah => '-',
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Symbol {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Dit => defmt::write!(f, "dit"),
            Self::Dah => defmt::write!(f, "dah"),
        }
    }
}

/// Morse pattern of one character
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeWord {
    /// Number of symbols (0 = space)
    len: u8,
    /// Symbol bits, symbol `i` at bit `i`
    pattern: u8,
}

impl CodeWord {
    /// Packed value that terminates every code and alone means "space"
    pub const SENTINEL: u8 = 0b1;

    /// Longest pattern a packed byte can carry (8 bits minus the terminator)
    pub const MAX_SYMBOLS: usize = 7;

    /// The space code word: no symbols, only a gap
    pub const SPACE: Self = Self { len: 0, pattern: 0 };

    /// Unpack a terminator-encoded byte
    ///
    /// Returns None for `0`, the only byte with no reachable terminator.
    #[must_use]
    pub const fn from_bits(raw: u8) -> Option<Self> {
        if raw == 0 {
            return None;
        }

        let mut len = 0u8;
        let mut value = raw;
        while value != Self::SENTINEL {
            value >>= 1;
            len += 1;
        }

        Some(Self {
            len,
            pattern: raw ^ (1 << len),
        })
    }

    /// Build from an explicit symbol list, None if longer than [`Self::MAX_SYMBOLS`]
    #[must_use]
    pub fn from_symbols(symbols: &[Symbol]) -> Option<Self> {
        if symbols.len() > Self::MAX_SYMBOLS {
            return None;
        }

        let pattern = symbols
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, s)| acc | (s.bit() << i));

        Some(Self {
            len: symbols.len() as u8,
            pattern,
        })
    }

    /// Pack back into the terminator encoding
    #[must_use]
    pub const fn to_bits(self) -> u8 {
        self.pattern | (1 << self.len)
    }

    /// Number of symbols
    #[must_use]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    /// True for the space code word
    #[must_use]
    pub const fn is_space(self) -> bool {
        self.len == 0
    }

    /// Symbols in transmission order
    ///
    /// Empty for [`Self::SPACE`]; the caller keys a letter-space gap instead.
    #[must_use]
    pub const fn symbols(self) -> Symbols {
        Symbols {
            pattern: self.pattern,
            remaining: self.len,
        }
    }

    /// Units this code occupies on air, each symbol followed by its element gap
    #[must_use]
    pub fn keyed_units(self) -> u32 {
        self.symbols().map(|s| s.units() + 1).sum()
    }
}

impl Default for CodeWord {
    fn default() -> Self {
        Self::SPACE
    }
}

impl fmt::Display for CodeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_space() {
            return f.write_str(" ");
        }
        for symbol in self.symbols() {
            write!(f, "{}", symbol.as_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for CodeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodeWord(\"{self}\")")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CodeWord {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CodeWord({=u8:#b})", self.to_bits());
    }
}

/// Iterator over the symbols of one [`CodeWord`]
#[derive(Clone, Debug)]
pub struct Symbols {
    pattern: u8,
    remaining: u8,
}

impl Iterator for Symbols {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        if self.remaining == 0 {
            return None;
        }

        let symbol = Symbol::from_bit(self.pattern);
        self.pattern >>= 1;
        self.remaining -= 1;
        Some(symbol)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Symbols {}

impl FusedIterator for Symbols {}
