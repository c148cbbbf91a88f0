//! Hardware Abstraction Layer
//!
//! Pin helpers written against `embedded-hal` traits, so the same code runs
//! on the STM32 and against test doubles on the host.

pub mod gpio;
