//! Keying Driver
//!
//! Emits one dit or dah at a time as a blocking, timed pulse on the tone and
//! indicator outputs, and drives the transmit gate (PTT) around a message.
//!
//! Each symbol runs Idle → Emitting → Idle and includes its trailing element
//! gap, so symbols never overlap:
//!
//! ```text
//!        ┌──── 1 dit ────┬─ +2 dit (dah only) ─┐
//! key  ──┘                                     └──── 1 dit gap ────
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::code::Symbol;
use super::timing::Timing;
use crate::config::NodeConfig;
use crate::hal::gpio::drive;

/// Physical outputs the keying driver controls
pub trait KeyLines {
    /// Tone and visual indicator together (true = key down)
    fn set_emission(&mut self, on: bool);

    /// Transmit enable / push-to-talk line
    fn set_gate(&mut self, on: bool);
}

impl<T: KeyLines + ?Sized> KeyLines for &mut T {
    fn set_emission(&mut self, on: bool) {
        (**self).set_emission(on);
    }

    fn set_gate(&mut self, on: bool) {
        (**self).set_gate(on);
    }
}

/// [`KeyLines`] over three GPIO outputs: sounder, indicator LED and PTT
pub struct PinLines<T, L, P> {
    tone: T,
    led: L,
    ptt: P,
}

impl<T, L, P> PinLines<T, L, P>
where
    T: OutputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
    P: OutputPin<Error = Infallible>,
{
    /// Wrap the pins and force every output low
    pub fn new(tone: T, led: L, ptt: P) -> Self {
        let mut lines = Self { tone, led, ptt };
        lines.set_emission(false);
        lines.set_gate(false);
        lines
    }

    /// Give the pins back
    pub fn release(self) -> (T, L, P) {
        (self.tone, self.led, self.ptt)
    }
}

impl<T, L, P> KeyLines for PinLines<T, L, P>
where
    T: OutputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
    P: OutputPin<Error = Infallible>,
{
    fn set_emission(&mut self, on: bool) {
        drive(&mut self.led, on);
        drive(&mut self.tone, on);
    }

    fn set_gate(&mut self, on: bool) {
        drive(&mut self.ptt, on);
    }
}

/// Keying state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Key up, between symbols
    #[default]
    Idle,
    /// Key down, tone and indicator on
    Emitting,
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Emitting => defmt::write!(f, "KEY"),
        }
    }
}

/// Blocking symbol emitter
///
/// Every call occupies the caller for the full symbol time.
pub struct KeyingDriver<K, D> {
    lines: K,
    delay: D,
    timing: Timing,
    state: KeyState,
    gate: bool,
}

impl<K: KeyLines, D: DelayNs> KeyingDriver<K, D> {
    /// Create a driver using the configured timing
    pub fn new(lines: K, delay: D, config: &NodeConfig) -> Self {
        Self::with_timing(lines, delay, config.timing())
    }

    /// Create a driver with explicit timing
    pub fn with_timing(lines: K, delay: D, timing: Timing) -> Self {
        Self {
            lines,
            delay,
            timing,
            state: KeyState::Idle,
            gate: false,
        }
    }

    /// Key one symbol, including its trailing element gap
    pub fn emit_symbol(&mut self, symbol: Symbol) {
        let dit = self.timing.dit_ms();

        self.state = KeyState::Emitting;
        self.lines.set_emission(true);
        self.hold(dit);
        if symbol == Symbol::Dah {
            self.hold(self.timing.units_ms(Symbol::Dah.units() - 1));
        }
        self.lines.set_emission(false);
        self.state = KeyState::Idle;

        self.hold(self.timing.element_gap_ms());
    }

    /// Open or close the transmit gate
    pub fn set_transmit_gate(&mut self, on: bool) {
        trace!("ptt {}", on);
        self.lines.set_gate(on);
        self.gate = on;
    }

    /// Block for a number of milliseconds with the key up
    pub fn hold(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }

    /// Current keying state
    #[must_use]
    pub const fn state(&self) -> KeyState {
        self.state
    }

    /// Check if the transmit gate is open
    #[must_use]
    pub const fn is_gate_open(&self) -> bool {
        self.gate
    }

    /// Timing in use
    #[must_use]
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Borrow the output lines
    #[must_use]
    pub const fn lines(&self) -> &K {
        &self.lines
    }

    /// Borrow the delay source
    #[must_use]
    pub const fn delay(&self) -> &D {
        &self.delay
    }

    /// Take the lines and delay back
    pub fn release(self) -> (K, D) {
        (self.lines, self.delay)
    }
}
