//! Morse Encoding and Transmission
//!
//! Text goes in, timed keying comes out:
//!
//! ```text
//! MessageTransmitter ──▶ CodeTable::lookup ──▶ CodeWord::symbols ──▶ KeyingDriver
//!    (per char)             (char → code)        (dit/dah unpack)     (pins + delay)
//! ```
//!
//! Everything below the transmitter is pure and allocation-free; only the
//! keying driver touches hardware, through `embedded-hal` traits.

pub mod code;
pub mod keying;
pub mod shared;
pub mod table;
pub mod timing;
pub mod transmit;

pub use code::{CodeWord, Symbol, Symbols};
pub use keying::{KeyLines, KeyState, KeyingDriver, PinLines};
pub use shared::SharedTransmitter;
pub use table::{CodeEntry, CodeTable, TableError};
pub use timing::Timing;
pub use transmit::{message_duration_ms, MessageTransmitter, SendOutcome, SuppressInput};
