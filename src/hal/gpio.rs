//! GPIO Abstractions
//!
//! Thin wrappers over `embedded-hal` pins. The beacon only uses infallible
//! pins (on-chip GPIO), so the helpers here never return errors.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{SWITCH_DEBOUNCE_READS, SWITCH_SAMPLE_INTERVAL_MS};
use crate::morse::transmit::SuppressInput;
use crate::types::Level;

/// Drive an output to a level
pub fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Read an input level (true = high)
pub fn sense<P: InputPin<Error = Infallible>>(pin: &mut P) -> bool {
    match pin.is_high() {
        Ok(high) => high,
        Err(never) => match never {},
    }
}

/// Switch state after debouncing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SwitchState {
    /// Switch is inactive
    #[default]
    Released,
    /// Switch is active
    Pressed,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SwitchState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Released => defmt::write!(f, "Released"),
            Self::Pressed => defmt::write!(f, "Pressed"),
        }
    }
}

/// Digital switch with debouncing
///
/// Intrusion door contact and the host's alarm-disable line both come in
/// through one of these. Call [`update`](Self::update) from a polling loop,
/// or [`settle`](Self::settle) to take a spaced burst of reads on demand.
pub struct DebouncedSwitch<I, D> {
    pin: I,
    delay: D,
    active: Level,
    state: SwitchState,
    last_raw: bool,
    debounce_count: u8,
}

impl<I: InputPin<Error = Infallible>, D: DelayNs> DebouncedSwitch<I, D> {
    /// Create a switch that is pressed when the pin reads `active`
    #[must_use]
    pub fn new(pin: I, active: Level, delay: D) -> Self {
        Self {
            pin,
            delay,
            active,
            state: SwitchState::Released,
            last_raw: false,
            debounce_count: 0,
        }
    }

    /// Sample the pin (call periodically)
    /// Returns true if state changed
    pub fn update(&mut self) -> bool {
        let current = sense(&mut self.pin) == self.active.is_high();

        if current == self.last_raw {
            if self.debounce_count < SWITCH_DEBOUNCE_READS {
                self.debounce_count += 1;
            }
        } else {
            self.debounce_count = 0;
            self.last_raw = current;
        }

        if self.debounce_count >= SWITCH_DEBOUNCE_READS {
            let new_state = if current {
                SwitchState::Pressed
            } else {
                SwitchState::Released
            };

            if new_state != self.state {
                trace!("switch {}", new_state);
                self.state = new_state;
                return true;
            }
        }

        false
    }

    /// Sample until the reading is stable, then report it
    ///
    /// Reads are [`SWITCH_SAMPLE_INTERVAL_MS`] apart so contact bounce
    /// shorter than the burst is filtered out.
    pub fn settle(&mut self) -> SwitchState {
        self.update();
        for _ in 0..SWITCH_DEBOUNCE_READS {
            self.delay.delay_ms(SWITCH_SAMPLE_INTERVAL_MS);
            self.update();
        }
        self.state
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> SwitchState {
        self.state
    }

    /// Check if pressed
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        matches!(self.state, SwitchState::Pressed)
    }

    /// Give the pin and delay back
    pub fn release(self) -> (I, D) {
        (self.pin, self.delay)
    }
}

/// An active disable switch suppresses transmissions
impl<I: InputPin<Error = Infallible>, D: DelayNs> SuppressInput for DebouncedSwitch<I, D> {
    fn is_suppressed(&mut self) -> bool {
        self.settle() == SwitchState::Pressed
    }
}
