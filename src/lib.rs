//! Morse Alarm Beacon Firmware Library
//!
//! This library provides the core functionality for an STM32G474-based
//! monitoring node that watches battery, AC line and door sensors and keys
//! alerts in Morse code through a transmitter. A host watchdog pulses a
//! liveness line to the site computer and falls back to a Morse failure
//! message if the host stops answering.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Sensor Alarms  │  Host Watchdog  │  Alert Announcement      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     MORSE ENGINE                             │
//! │  Code Table  │  Symbol Unpacking  │  Keying  │  Transmitter  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  embedded-hal GPIO  │  DelayNs  │  ADC (target only)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Immutable configuration**: one [`config::NodeConfig`] built at startup
//! - **Type-driven design**: code words and speeds validated on construction
//! - **No unsafe in application code**
//! - **Functional core, imperative shell**: pure logic separated from I/O
//! - **Fail open on air**: a transmission always completes, unknown
//!   characters become spaces

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

// Must come first: the logging macros are textually scoped
#[macro_use]
mod fmt;

/// Hardware Abstraction Layer
///
/// `embedded-hal` pin helpers and switch debouncing.
pub mod hal;

/// Morse Engine
///
/// Code table, symbol unpacking, timed keying and message transmission.
pub mod morse;

/// Sensor Alarms
///
/// Analog scaling, alarm limits and alert announcement.
pub mod alarm;

/// Host Watchdog
///
/// Pulse/echo liveness check and failsafe trigger.
pub mod watchdog;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::NodeConfig;
    pub use crate::morse::{
        CodeTable, CodeWord, KeyLines, MessageTransmitter, SendOutcome, SuppressInput, Symbol,
        Timing,
    };
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::{InputPin, OutputPin};

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
