//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the beacon hardware and the
//! immutable [`NodeConfig`] built once at startup. Pin mappings, sensor
//! scaling, alarm limits and watchdog timings are centralized here.

use crate::morse::table::CodeTable;
use crate::morse::timing::Timing;
use crate::types::Wpm;

/// Default keying speed in words per minute
pub const DEFAULT_WPM: u8 = 20;

/// Time between opening the transmit gate and the first character
pub const TX_WARMUP_MS: u32 = 250;

/// Sidetone pitch of the sounder (musical A, 3 × 440 Hz)
pub const SIDETONE_HZ: u32 = 1_320;

/// Trailer sent after every alert
pub const STATION_ID: &str = "DE K7ID/C = ";

/// Message keyed when the host computer stops answering
pub const FAILSAFE_MESSAGE: &str = "PI FAILED";

/// Full-scale ADC count (12-bit converter)
pub const ADC_MAX: u16 = 4095;

/// Battery input full scale in volts
pub const FS_BATTERY_VOLTS: f32 = 15.0;

/// AC line voltage input full scale in volts
pub const FS_AC_VOLTS: f32 = 150.0;

/// AC line current input full scale in amps
pub const FS_AC_AMPS: f32 = 30.0;

/// Calibration factors, set against a reference meter
pub mod calibration {
    //! Multipliers applied after full-scale conversion

    /// Battery 1 voltage
    pub const BATTERY1: f32 = 1.0;

    /// Battery 2 voltage
    pub const BATTERY2: f32 = 1.0;

    /// AC line voltage
    pub const AC_VOLTS: f32 = 1.0;

    /// AC line current
    pub const AC_AMPS: f32 = 1.0;
}

/// Battery low alarm threshold in volts
pub const BATTERY_LOW_LIMIT: f32 = 12.0;

/// Battery high alarm threshold in volts
pub const BATTERY_HIGH_LIMIT: f32 = 14.0;

/// AC line low alarm threshold in volts
pub const AC_VOLTS_LOW_LIMIT: f32 = 90.0;

/// AC line high alarm threshold in volts
pub const AC_VOLTS_HIGH_LIMIT: f32 = 140.0;

/// AC line current alarm threshold in amps
pub const AC_AMPS_HIGH_LIMIT: f32 = 25.0;

/// Samples averaged per analog reading
pub const SENSOR_SAMPLES: usize = 8;

/// Delay at the end of each sensor polling pass
pub const POLL_INTERVAL_MS: u32 = 987;

/// Switch debounce: consecutive identical reads required
pub const SWITCH_DEBOUNCE_READS: u8 = 3;

/// Spacing between debounce reads when settling a switch
pub const SWITCH_SAMPLE_INTERVAL_MS: u32 = 5;

/// Host watchdog timings
pub mod watchdog {
    //! Liveness exchange with the host computer

    /// Interval between liveness pulses
    pub const PULSE_PERIOD_MS: u64 = 1_000;

    /// Width of the liveness pulse
    pub const PULSE_WIDTH_MS: u32 = 10;

    /// How long to wait for the echo
    pub const ECHO_WINDOW_MS: u32 = 100;

    /// Host must be silent longer than this before failsafe
    pub const FAILURE_THRESHOLD_MS: u64 = 3_000;
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Sounder (active buzzer) for the sidetone
    pub const SOUNDER: &str = "PB3";

    /// Indicator LED, keyed with the sounder
    pub const LED_KEY: &str = "PA5";

    /// Transmitter PTT relay driver
    pub const PTT: &str = "PB0";

    /// Alarm disable input from the host (high = suppress)
    pub const DISABLE_ALARM: &str = "PA10";

    /// Door intrusion switch (high = open)
    pub const INTRUSION: &str = "PA12";

    /// Watchdog pulse to host
    pub const WATCHDOG_OUT: &str = "PB7";

    /// Watchdog echo from host
    pub const WATCHDOG_IN: &str = "PB8";

    /// Battery 1 divider
    pub const BATTERY1_ADC: &str = "PA0";

    /// Battery 2 divider
    pub const BATTERY2_ADC: &str = "PA1";

    /// AC line voltage (rectified transformer)
    pub const AC_VOLTS_ADC: &str = "PA2";

    /// AC line current transformer
    pub const AC_AMPS_ADC: &str = "PA3";
}

/// Immutable runtime configuration
///
/// Built once at startup and borrowed by the transmitter and keying driver.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeConfig {
    timing: Timing,
    table: CodeTable,
    warmup_ms: u32,
    station_id: &'static str,
    failsafe_message: &'static str,
}

impl NodeConfig {
    /// Configuration with the built-in code table
    #[must_use]
    pub fn new(wpm: Wpm) -> Self {
        Self::with_table(wpm, CodeTable::standard())
    }

    /// Configuration with a custom code table
    #[must_use]
    pub fn with_table(wpm: Wpm, table: CodeTable) -> Self {
        Self {
            timing: Timing::from_wpm(wpm),
            table,
            warmup_ms: TX_WARMUP_MS,
            station_id: STATION_ID,
            failsafe_message: FAILSAFE_MESSAGE,
        }
    }

    /// Replace the transmitter warm-up delay
    #[must_use]
    pub fn with_warmup_ms(mut self, warmup_ms: u32) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    /// Replace the station identifier
    #[must_use]
    pub fn with_station_id(mut self, station_id: &'static str) -> Self {
        self.station_id = station_id;
        self
    }

    /// Replace the failsafe message
    #[must_use]
    pub fn with_failsafe_message(mut self, message: &'static str) -> Self {
        self.failsafe_message = message;
        self
    }

    /// Element timing
    #[must_use]
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Character table
    #[must_use]
    pub const fn table(&self) -> &CodeTable {
        &self.table
    }

    /// Gate-open to first character delay
    #[must_use]
    pub const fn warmup_ms(&self) -> u32 {
        self.warmup_ms
    }

    /// Trailer appended to alerts by the caller
    #[must_use]
    pub const fn station_id(&self) -> &'static str {
        self.station_id
    }

    /// Message for host failure
    #[must_use]
    pub const fn failsafe_message(&self) -> &'static str {
        self.failsafe_message
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new(Wpm::clamped(DEFAULT_WPM))
    }
}
