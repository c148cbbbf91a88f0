//! Message Transmitter
//!
//! Keys a whole text message: opens the transmit gate, waits for the
//! transmitter to settle, sends each character followed by a letter space,
//! then closes the gate. A suppression input checked once per message turns
//! the whole call into a no-op.
//!
//! Characters outside the table are sent as a space. A literal space is a
//! letter-space gap plus the usual trailing letter space, so spaces in text
//! come out as two letter spaces.

use embedded_hal::delay::DelayNs;

use super::code::CodeWord;
use super::keying::{KeyLines, KeyingDriver};
use crate::config::NodeConfig;

/// External "stay quiet" signal
pub trait SuppressInput {
    /// True if transmissions must be skipped
    fn is_suppressed(&mut self) -> bool;
}

impl SuppressInput for bool {
    fn is_suppressed(&mut self) -> bool {
        *self
    }
}

impl<T: SuppressInput + ?Sized> SuppressInput for &mut T {
    fn is_suppressed(&mut self) -> bool {
        (**self).is_suppressed()
    }
}

/// What a call to [`MessageTransmitter::send`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Message keyed
    Sent {
        /// Characters processed, unknown ones included
        characters: usize,
    },
    /// Suppression was active, nothing emitted
    Suppressed,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SendOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Sent { characters } => defmt::write!(f, "Sent({})", characters),
            Self::Suppressed => defmt::write!(f, "Suppressed"),
        }
    }
}

/// Text to Morse transmitter
///
/// Owns the keying outputs for the duration of each [`send`](Self::send).
pub struct MessageTransmitter<'c, K, D, S> {
    config: &'c NodeConfig,
    driver: KeyingDriver<K, D>,
    suppress: S,
}

impl<'c, K, D, S> MessageTransmitter<'c, K, D, S>
where
    K: KeyLines,
    D: DelayNs,
    S: SuppressInput,
{
    /// Create a transmitter over the given outputs
    pub fn new(config: &'c NodeConfig, lines: K, delay: D, suppress: S) -> Self {
        Self {
            config,
            driver: KeyingDriver::new(lines, delay, config),
            suppress,
        }
    }

    /// Key a message; blocks until the last letter space has elapsed
    pub fn send(&mut self, message: &str) -> SendOutcome {
        if self.suppress.is_suppressed() {
            debug!("alarm reporting disabled, skipping message");
            return SendOutcome::Suppressed;
        }
        self.send_unsuppressed(message)
    }

    /// Key a message without consulting the suppression input
    ///
    /// For host failure reports: a dead host can leave the disable line
    /// floating in its active state.
    pub fn send_unsuppressed(&mut self, message: &str) -> SendOutcome {
        info!("keying {} bytes", message.len());
        self.driver.set_transmit_gate(true);
        self.driver.hold(self.config.warmup_ms());

        let mut characters = 0;
        for ch in message.chars() {
            self.send_char(ch.to_ascii_uppercase());
            characters += 1;
        }

        self.driver.set_transmit_gate(false);
        SendOutcome::Sent { characters }
    }

    /// Key one upper-cased character and its trailing letter space
    fn send_char(&mut self, ch: char) {
        let table = self.config.table();
        if !table.contains(ch) {
            debug!("no code for {}, sending space", ch);
        }

        let code = table.lookup(ch);
        let letter_space = self.config.timing().letter_space_ms();

        if code == CodeWord::SPACE {
            self.driver.hold(letter_space);
        } else {
            for symbol in code.symbols() {
                self.driver.emit_symbol(symbol);
            }
        }

        self.driver.hold(letter_space);
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &'c NodeConfig {
        self.config
    }

    /// Borrow the keying driver
    #[must_use]
    pub const fn driver(&self) -> &KeyingDriver<K, D> {
        &self.driver
    }

    /// Borrow the suppression input
    #[must_use]
    pub const fn suppress(&self) -> &S {
        &self.suppress
    }

    /// Mutably borrow the suppression input
    pub fn suppress_mut(&mut self) -> &mut S {
        &mut self.suppress
    }

    /// Take the outputs, delay and suppression input back
    pub fn release(self) -> (K, D, S) {
        let (lines, delay) = self.driver.release();
        (lines, delay, self.suppress)
    }
}

/// Total time `send` keeps the caller busy for a message, in milliseconds
///
/// Includes the warm-up delay. A suppressed send returns immediately instead.
#[must_use]
pub fn message_duration_ms(config: &NodeConfig, message: &str) -> u32 {
    let timing = config.timing();
    let letter_space = timing.letter_space_ms();

    message
        .chars()
        .map(|ch| {
            let code = config.table().lookup(ch.to_ascii_uppercase());
            let body = if code.is_space() {
                letter_space
            } else {
                timing.units_ms(code.keyed_units())
            };
            body + letter_space
        })
        .sum::<u32>()
        + config.warmup_ms()
}
