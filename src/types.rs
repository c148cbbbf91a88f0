//! Shared types used across the beacon firmware
//!
//! Domain-specific newtypes that enforce their invariants at construction
//! so the rest of the firmware never sees an out-of-range value.

use core::fmt;

/// Keying speed in words per minute
///
/// PARIS timing: one word is 50 units, so a unit lasts `1200 / wpm` ms.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wpm(u8);

impl Wpm {
    /// Minimum supported speed
    pub const MIN: u8 = 5;

    /// Maximum supported speed
    pub const MAX: u8 = 50;

    /// Default beacon speed
    pub const DEFAULT: Self = Self(20);

    /// Create a speed, returns None if out of range
    #[must_use]
    pub const fn new(wpm: u8) -> Option<Self> {
        if wpm >= Self::MIN && wpm <= Self::MAX {
            Some(Self(wpm))
        } else {
            None
        }
    }

    /// Create a speed, saturating into the supported range
    #[must_use]
    pub const fn clamped(wpm: u8) -> Self {
        if wpm < Self::MIN {
            Self(Self::MIN)
        } else if wpm > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(wpm)
        }
    }

    /// Get the raw words-per-minute value
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Length of one timing unit (one dit) in milliseconds
    #[must_use]
    pub const fn unit_ms(self) -> u32 {
        1200 / self.0 as u32
    }
}

impl Default for Wpm {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for Wpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wpm({})", self.0)
    }
}

impl fmt::Display for Wpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} WPM", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Wpm {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} WPM", self.0);
    }
}

/// Logic level of a digital line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Level {
    /// Line is low
    #[default]
    Low,
    /// Line is high
    High,
}

impl Level {
    /// Build a level from a boolean (true = high)
    #[must_use]
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Check if the level is high
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Level {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(f, "LOW"),
            Self::High => defmt::write!(f, "HIGH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wpm_range() {
        assert!(Wpm::new(4).is_none());
        assert!(Wpm::new(51).is_none());
        assert_eq!(Wpm::new(20).map(Wpm::get), Some(20));
    }

    #[test]
    fn wpm_clamped() {
        assert_eq!(Wpm::clamped(0).get(), Wpm::MIN);
        assert_eq!(Wpm::clamped(200).get(), Wpm::MAX);
        assert_eq!(Wpm::clamped(13).get(), 13);
    }

    #[test]
    fn wpm_unit() {
        // 20 WPM: 1200 / 20 = 60 ms per dit
        assert_eq!(Wpm::DEFAULT.unit_ms(), 60);
        assert_eq!(Wpm::clamped(12).unit_ms(), 100);
    }

    #[test]
    fn level_from_bool() {
        assert!(Level::from_bool(true).is_high());
        assert!(!Level::from_bool(false).is_high());
        assert_eq!(Level::default(), Level::Low);
    }
}
