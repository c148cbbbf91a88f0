//! Morse Timing
//!
//! All durations are integer multiples of one dit, derived from the keying
//! speed alone. Standard ratios: dah 3, element gap 1, letter space 3,
//! word space 7.

use super::code::Symbol;
use crate::types::Wpm;

/// Element durations for one keying speed, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    wpm: Wpm,
    dit_ms: u32,
}

impl Timing {
    /// Dah length in dits
    pub const DAH_UNITS: u32 = 3;

    /// Gap between elements of one character, in dits
    pub const ELEMENT_GAP_UNITS: u32 = 1;

    /// Gap between characters, in dits
    pub const LETTER_SPACE_UNITS: u32 = 3;

    /// Gap between words, in dits
    pub const WORD_SPACE_UNITS: u32 = 7;

    /// Derive timing from a keying speed
    #[must_use]
    pub const fn from_wpm(wpm: Wpm) -> Self {
        Self {
            wpm,
            dit_ms: wpm.unit_ms(),
        }
    }

    /// Speed this timing was derived from
    #[must_use]
    pub const fn wpm(&self) -> Wpm {
        self.wpm
    }

    /// One dit (one unit)
    #[must_use]
    pub const fn dit_ms(&self) -> u32 {
        self.dit_ms
    }

    /// One dah
    #[must_use]
    pub const fn dah_ms(&self) -> u32 {
        self.dit_ms * Self::DAH_UNITS
    }

    /// Gap after each element
    #[must_use]
    pub const fn element_gap_ms(&self) -> u32 {
        self.dit_ms * Self::ELEMENT_GAP_UNITS
    }

    /// Gap between characters (one dah)
    #[must_use]
    pub const fn letter_space_ms(&self) -> u32 {
        self.dit_ms * Self::LETTER_SPACE_UNITS
    }

    /// Gap between words
    #[must_use]
    pub const fn word_space_ms(&self) -> u32 {
        self.dit_ms * Self::WORD_SPACE_UNITS
    }

    /// Key-down time of a symbol
    #[must_use]
    pub const fn duration_of(&self, symbol: Symbol) -> u32 {
        self.dit_ms * symbol.units()
    }

    /// Convert a unit count to milliseconds
    #[must_use]
    pub const fn units_ms(&self, units: u32) -> u32 {
        self.dit_ms * units
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_wpm(Wpm::DEFAULT)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Timing {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Timing({}, dit={}ms)", self.wpm, self.dit_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_wpm() {
        let t = Timing::from_wpm(Wpm::DEFAULT);
        assert_eq!(t.dit_ms(), 60);
        assert_eq!(t.dah_ms(), 180);
        assert_eq!(t.element_gap_ms(), 60);
        assert_eq!(t.letter_space_ms(), 180);
        assert_eq!(t.word_space_ms(), 420);
    }

    #[test]
    fn ratios_hold_at_every_speed() {
        for wpm in Wpm::MIN..=Wpm::MAX {
            let t = Timing::from_wpm(Wpm::clamped(wpm));
            assert_eq!(t.dah_ms(), 3 * t.dit_ms());
            assert_eq!(t.letter_space_ms(), t.dah_ms());
            assert_eq!(t.word_space_ms(), 7 * t.dit_ms());
        }
    }

    #[test]
    fn symbol_durations() {
        let t = Timing::default();
        assert_eq!(t.duration_of(Symbol::Dit), t.dit_ms());
        assert_eq!(t.duration_of(Symbol::Dah), t.dah_ms());
    }
}
