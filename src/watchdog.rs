//! Host Watchdog
//!
//! Once a second the node pulses a line to the host computer and waits
//! briefly for the host to echo it back. If the host stays silent for longer
//! than the failure threshold, the node enters failsafe and the caller keys
//! the failsafe message. Any echo clears the failure.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::watchdog::{
    ECHO_WINDOW_MS, FAILURE_THRESHOLD_MS, PULSE_PERIOD_MS, PULSE_WIDTH_MS,
};
use crate::hal::gpio::{drive, sense};
use crate::morse::keying::KeyLines;
use crate::morse::shared::SharedTransmitter;
use crate::morse::transmit::{SendOutcome, SuppressInput};

/// Result of one pulse/echo exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchdogEvent {
    /// Echo received, host was already healthy
    Healthy,
    /// Echo received after one or more misses
    Recovered,
    /// First missed echo of a failure episode
    FirstFailure,
    /// Another missed echo
    StillFailing,
}

#[cfg(feature = "embedded")]
impl defmt::Format for WatchdogEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Healthy => defmt::write!(f, "Healthy"),
            Self::Recovered => defmt::write!(f, "Recovered"),
            Self::FirstFailure => defmt::write!(f, "FirstFailure"),
            Self::StillFailing => defmt::write!(f, "StillFailing"),
        }
    }
}

/// Host liveness state machine
///
/// Time is passed in as milliseconds since boot so the logic stays pure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Watchdog {
    last_pulse_ms: Option<u64>,
    first_failure_ms: u64,
    healthy: bool,
    failsafe: bool,
}

impl Watchdog {
    /// Create a watchdog that assumes the host starts healthy
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_pulse_ms: None,
            first_failure_ms: 0,
            healthy: true,
            failsafe: false,
        }
    }

    /// Check if the next pulse should be sent
    #[must_use]
    pub fn pulse_due(&self, now_ms: u64) -> bool {
        self.last_pulse_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= PULSE_PERIOD_MS)
    }

    /// Record the outcome of a pulse sent at `now_ms`
    pub fn record(&mut self, now_ms: u64, echoed: bool) -> WatchdogEvent {
        self.last_pulse_ms = Some(now_ms);

        if echoed {
            let event = if self.healthy {
                WatchdogEvent::Healthy
            } else {
                info!("host recovered");
                WatchdogEvent::Recovered
            };
            self.healthy = true;
            self.failsafe = false;
            event
        } else if self.healthy {
            warn!("host missed watchdog echo");
            self.healthy = false;
            self.first_failure_ms = now_ms;
            WatchdogEvent::FirstFailure
        } else {
            WatchdogEvent::StillFailing
        }
    }

    /// True exactly once per failure episode, when the host has been silent
    /// longer than the threshold
    pub fn poll_failsafe(&mut self, now_ms: u64) -> bool {
        if self.healthy || self.failsafe {
            return false;
        }
        if now_ms.saturating_sub(self.first_failure_ms) > FAILURE_THRESHOLD_MS {
            error!("host silent for {} ms, entering failsafe", now_ms - self.first_failure_ms);
            self.failsafe = true;
            return true;
        }
        false
    }

    /// Check if the last exchange succeeded
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Check if failsafe has been entered and not yet cleared
    #[must_use]
    pub const fn in_failsafe(&self) -> bool {
        self.failsafe
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Watchdog {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Watchdog(healthy={}, failsafe={})", self.healthy, self.failsafe);
    }
}

/// Physical pulse/echo lines to the host
pub struct WatchdogLink<O, I> {
    pulse: O,
    echo: I,
}

impl<O, I> WatchdogLink<O, I>
where
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
{
    /// Wrap the lines, pulse output starts low
    pub fn new(mut pulse: O, echo: I) -> Self {
        drive(&mut pulse, false);
        Self { pulse, echo }
    }

    /// Send one pulse and wait up to the echo window for the reply
    pub fn exchange<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        drive(&mut self.pulse, true);
        delay.delay_ms(PULSE_WIDTH_MS);
        drive(&mut self.pulse, false);

        for _ in 0..ECHO_WINDOW_MS {
            if sense(&mut self.echo) {
                return true;
            }
            delay.delay_ms(1);
        }
        sense(&mut self.echo)
    }

    /// Pulse if one is due and feed the result to the watchdog
    pub fn service<D: DelayNs>(
        &mut self,
        watchdog: &mut Watchdog,
        now_ms: u64,
        delay: &mut D,
    ) -> Option<WatchdogEvent> {
        if !watchdog.pulse_due(now_ms) {
            return None;
        }
        let echoed = self.exchange(delay);
        Some(watchdog.record(now_ms, echoed))
    }

    /// Give the pins back
    pub fn release(self) -> (O, I) {
        (self.pulse, self.echo)
    }
}

/// One watchdog step: pulse if due, then key `message` if the host has just
/// crossed the failure threshold
///
/// The failure report ignores the disable input. Returns the outcome when a
/// message was keyed.
pub async fn service_and_announce<O, I, D, M, K, KD, S>(
    link: &mut WatchdogLink<O, I>,
    watchdog: &mut Watchdog,
    now_ms: u64,
    delay: &mut D,
    tx: &SharedTransmitter<'_, M, K, KD, S>,
    message: &str,
) -> Option<SendOutcome>
where
    O: OutputPin<Error = Infallible>,
    I: InputPin<Error = Infallible>,
    D: DelayNs,
    M: RawMutex,
    K: KeyLines,
    KD: DelayNs,
    S: SuppressInput,
{
    link.service(watchdog, now_ms, delay);
    if !watchdog.poll_failsafe(now_ms) {
        return None;
    }
    Some(tx.send_unsuppressed(message).await)
}
