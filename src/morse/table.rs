//! Character to Code Word Table
//!
//! The alphabet and its packed codes are kept index-for-index, ordered from
//! the most to the least used character. Lookups that miss return the space
//! code word so one odd character never stops a transmission.

use core::fmt;

use heapless::Vec;

use super::code::CodeWord;

/// Maximum number of characters a table can hold
pub const MAX_ENTRIES: usize = 64;

/// Built-in alphabet, most used first
pub const STANDARD_ALPHABET: &str = " EISTAHNDRUFBGLMVWCOJKQPXZY0123456789?.,=/:!-'+";

/// Built-in packed codes, same order as [`STANDARD_ALPHABET`]
pub const STANDARD_CODES: [u8; 47] = [
    0b1, 0b10, 0b100, 0b1000, 0b11, 0b110, 0b10000, 0b101, 0b1001, 0b1010, 0b1100, 0b10100,
    0b10001, 0b1011, 0b10010, 0b111, 0b11000, 0b1110, 0b10101, 0b1111, 0b11110, 0b1101,
    0b11011, 0b10110, 0b11001, 0b10011, 0b11101, 0b111111, 0b111110, 0b111100, 0b111000,
    0b110000, 0b100000, 0b100001, 0b100011, 0b100111, 0b101111, 0b1001100, 0b1101010,
    0b1110011, 0b110001, 0b101001, 0b1000111, 0b110101, 0b1100001, 0b1010010, 0b101010,
];

/// One table row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeEntry {
    /// Character as it appears in (upper-cased) message text
    pub ch: char,
    /// Its Morse pattern
    pub code: CodeWord,
}

impl CodeEntry {
    /// Build a row from a packed code, failing constant evaluation on `0`
    const fn packed(ch: char, raw: u8) -> Self {
        match CodeWord::from_bits(raw) {
            Some(code) => Self { ch, code },
            None => panic!("code word has no terminator"),
        }
    }
}

/// Built-in table rows, validated during constant evaluation
static STANDARD_ENTRIES: [CodeEntry; 47] = standard_entries();

const _: () = assert!(STANDARD_CODES.len() <= MAX_ENTRIES);

const fn standard_entries() -> [CodeEntry; 47] {
    let alphabet = STANDARD_ALPHABET.as_bytes();
    assert!(alphabet.len() == STANDARD_CODES.len());

    let mut entries = [CodeEntry {
        ch: ' ',
        code: CodeWord::SPACE,
    }; 47];
    let mut i = 0;
    while i < entries.len() {
        // The built-in alphabet is pure ASCII
        entries[i] = CodeEntry::packed(alphabet[i] as char, STANDARD_CODES[i]);
        i += 1;
    }
    entries
}

/// Table construction failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableError {
    /// Alphabet and code list differ in length
    LengthMismatch {
        /// Characters in the alphabet
        alphabet: usize,
        /// Entries in the code list
        codes: usize,
    },
    /// A packed code has no terminator (value 0)
    Malformed {
        /// Position in the code list
        index: usize,
        /// Offending value
        raw: u8,
    },
    /// A character appears twice in the alphabet
    DuplicateCharacter {
        /// The repeated character
        ch: char,
    },
    /// The space character is mapped to something other than the sentinel
    SpaceMismatch {
        /// Code given for space
        raw: u8,
    },
    /// A lowercase letter; messages are upper-cased before lookup, so the
    /// row could never match
    Lowercase {
        /// The lowercase character
        ch: char,
    },
    /// More characters than [`MAX_ENTRIES`]
    TooLarge {
        /// Requested size
        len: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { alphabet, codes } => {
                write!(f, "alphabet has {alphabet} characters but {codes} codes")
            }
            Self::Malformed { index, raw } => {
                write!(f, "code {raw:#b} at index {index} has no terminator")
            }
            Self::DuplicateCharacter { ch } => write!(f, "character {ch:?} listed twice"),
            Self::SpaceMismatch { raw } => {
                write!(f, "space must map to {:#b}, got {raw:#b}", CodeWord::SENTINEL)
            }
            Self::Lowercase { ch } => write!(f, "character {ch:?} is not upper case"),
            Self::TooLarge { len } => {
                write!(f, "{len} characters exceeds table capacity {MAX_ENTRIES}")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TableError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::LengthMismatch { alphabet, codes } => {
                defmt::write!(f, "LengthMismatch({}, {})", alphabet, codes);
            }
            Self::Malformed { index, raw } => defmt::write!(f, "Malformed({}, {})", index, raw),
            Self::DuplicateCharacter { ch } => defmt::write!(f, "Duplicate({})", ch),
            Self::SpaceMismatch { raw } => defmt::write!(f, "SpaceMismatch({})", raw),
            Self::Lowercase { ch } => defmt::write!(f, "Lowercase({})", ch),
            Self::TooLarge { len } => defmt::write!(f, "TooLarge({})", len),
        }
    }
}

/// Character to code word lookup table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    entries: Vec<CodeEntry, MAX_ENTRIES>,
}

impl CodeTable {
    /// The built-in 47 character table
    #[must_use]
    pub fn standard() -> Self {
        let mut entries = Vec::new();
        for entry in &STANDARD_ENTRIES {
            // Capacity checked at compile time above
            let _ = entries.push(*entry);
        }
        Self { entries }
    }

    /// Build a table from an alphabet and its packed codes, kept in lock-step
    pub fn from_parts(alphabet: &str, codes: &[u8]) -> Result<Self, TableError> {
        let table = Self::build(alphabet, codes);
        if let Err(err) = &table {
            warn!("code table rejected: {}", err);
        }
        table
    }

    fn build(alphabet: &str, codes: &[u8]) -> Result<Self, TableError> {
        let len = alphabet.chars().count();
        if len != codes.len() {
            return Err(TableError::LengthMismatch {
                alphabet: len,
                codes: codes.len(),
            });
        }
        if len > MAX_ENTRIES {
            return Err(TableError::TooLarge { len });
        }

        let mut entries: Vec<CodeEntry, MAX_ENTRIES> = Vec::new();
        for (index, (ch, &raw)) in alphabet.chars().zip(codes).enumerate() {
            let code = CodeWord::from_bits(raw).ok_or(TableError::Malformed { index, raw })?;
            if ch != ch.to_ascii_uppercase() {
                return Err(TableError::Lowercase { ch });
            }
            if ch == ' ' && !code.is_space() {
                return Err(TableError::SpaceMismatch { raw });
            }
            if entries.iter().any(|e| e.ch == ch) {
                return Err(TableError::DuplicateCharacter { ch });
            }
            entries
                .push(CodeEntry { ch, code })
                .map_err(|_| TableError::TooLarge { len })?;
        }

        Ok(Self { entries })
    }

    /// Code word for a character, or [`CodeWord::SPACE`] if it is not in the table
    ///
    /// Matching is exact; callers upper-case message text first.
    #[must_use]
    pub fn lookup(&self, ch: char) -> CodeWord {
        self.get(ch).unwrap_or(CodeWord::SPACE)
    }

    /// Code word for a character, None if it is not in the table
    #[must_use]
    pub fn get(&self, ch: char) -> Option<CodeWord> {
        self.entries.iter().find(|e| e.ch == ch).map(|e| e.code)
    }

    /// Check if a character is in the table
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.get(ch).is_some()
    }

    /// Table row by position
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<CodeEntry> {
        self.entries.get(index).copied()
    }

    /// All rows in table order
    pub fn entries(&self) -> impl Iterator<Item = CodeEntry> + '_ {
        self.entries.iter().copied()
    }

    /// Number of characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no characters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::standard()
    }
}
