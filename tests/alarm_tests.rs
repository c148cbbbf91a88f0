//! Sensor Alarm Tests
//!
//! Tests for reading scaling, alarm evaluation, alert announcement and the
//! debounced switch inputs.
//! Run with: cargo test --features std --test alarm_tests

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use beacon_firmware::alarm::{
    announce, announce_shared, evaluate, AlarmLimits, Alert, Averager, ScaledReading,
    SensorSnapshot,
};
use beacon_firmware::config::{self, NodeConfig, ADC_MAX, SWITCH_SAMPLE_INTERVAL_MS};
use beacon_firmware::hal::gpio::{DebouncedSwitch, SwitchState};
use beacon_firmware::morse::{KeyLines, MessageTransmitter, SendOutcome, SharedTransmitter};
use beacon_firmware::types::Level;
use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

// =============================================================================
// Test Doubles
// =============================================================================

/// Logs gate openings and key-downs; delays are not interesting here
#[derive(Clone, Default)]
struct Log(Rc<RefCell<Vec<&'static str>>>);

impl KeyLines for Log {
    fn set_emission(&mut self, on: bool) {
        if on {
            self.0.borrow_mut().push("key");
        }
    }

    fn set_gate(&mut self, on: bool) {
        self.0.borrow_mut().push(if on { "open" } else { "close" });
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[derive(Clone, Default)]
struct MockInput(Rc<Cell<bool>>);

impl ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

fn healthy() -> SensorSnapshot {
    SensorSnapshot {
        battery1: 13.0,
        battery2: 13.0,
        ac_volts: 120.0,
        ac_amps: 5.0,
        intrusion: false,
    }
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

// =============================================================================
// Scaling
// =============================================================================

#[test]
fn battery_scaling() {
    let half = ADC_MAX / 2 + 1;
    let v = ScaledReading::battery(half, 1.0).value();
    assert!(close(v, 7.5), "got {v}");
    assert!(close(ScaledReading::battery(ADC_MAX, 1.1).value(), 16.5));
}

#[test]
fn ac_scaling_uses_reading() {
    assert!(close(ScaledReading::ac_volts(ADC_MAX).value(), config::FS_AC_VOLTS));
    assert!(close(ScaledReading::ac_amps(ADC_MAX).value(), config::FS_AC_AMPS));
    assert!(close(ScaledReading::ac_amps(0).value(), 0.0));
    assert_eq!(ScaledReading::ac_amps(1234).raw(), 1234);
}

#[test]
fn averaging_then_scaling() {
    let mut avg = Averager::new();
    for raw in [3000, 3002, 2998, 3000] {
        avg.push(raw);
    }
    let raw = avg.mean().unwrap();
    assert_eq!(raw, 3000);
    assert!(ScaledReading::battery(raw, 1.0).value() > config::BATTERY_LOW_LIMIT - 1.5);
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn every_alert_in_order() {
    let snapshot = SensorSnapshot {
        battery1: 11.0,
        battery2: 15.0,
        ac_volts: 80.0,
        ac_amps: 26.0,
        intrusion: true,
    };
    let alerts = evaluate(&snapshot, &AlarmLimits::default());
    assert_eq!(
        alerts.as_slice(),
        &[
            Alert::Battery1Low,
            Alert::Battery2High,
            Alert::Intrusion,
            Alert::AcVoltsLow,
            Alert::AcCurrentHigh,
        ]
    );
}

#[test]
fn custom_limits() {
    let limits = AlarmLimits {
        ac_volts_high: 110.0,
        ..AlarmLimits::default()
    };
    assert_eq!(evaluate(&healthy(), &limits).as_slice(), &[Alert::AcVoltsHigh]);
}

#[test]
fn alert_messages_are_keyable() {
    let table = NodeConfig::default().table().clone();
    for alert in Alert::ALL {
        assert!(!alert.message().is_empty());
        for ch in alert.message().chars() {
            assert!(table.contains(ch), "{alert:?}: {ch:?}");
        }
    }
}

// =============================================================================
// Announcement
// =============================================================================

#[test]
fn each_alert_followed_by_station_id() {
    let config = NodeConfig::default();
    let alerts = [Alert::Intrusion, Alert::AcVoltsLow];

    let log = Log::default();
    let mut tx = MessageTransmitter::new(&config, log.clone(), NoDelay, false);
    assert_eq!(announce(&mut tx, &alerts), 2);

    let expected = Log::default();
    let mut manual = MessageTransmitter::new(&config, expected.clone(), NoDelay, false);
    for alert in alerts {
        manual.send(alert.message());
        manual.send(config.station_id());
    }

    assert_eq!(*log.0.borrow(), *expected.0.borrow());
    let opens = log.0.borrow().iter().filter(|e| **e == "open").count();
    assert_eq!(opens, 4);
}

#[test]
fn suppressed_alerts_not_counted() {
    let config = NodeConfig::default();
    let log = Log::default();
    let mut tx = MessageTransmitter::new(&config, log.clone(), NoDelay, true);

    assert_eq!(announce(&mut tx, &[Alert::Battery1Low, Alert::Battery2Low]), 0);
    assert!(log.0.borrow().is_empty());
}

#[test]
fn shared_announce_matches_direct() {
    let config = NodeConfig::default();
    let alerts = [Alert::Battery2High];

    let direct = Log::default();
    let mut tx = MessageTransmitter::new(&config, direct.clone(), NoDelay, false);
    announce(&mut tx, &alerts);

    let shared_log = Log::default();
    let inner = MessageTransmitter::new(&config, shared_log.clone(), NoDelay, false);
    let shared: SharedTransmitter<'_, NoopRawMutex, _, _, _> = SharedTransmitter::new(inner);
    let keyed = block_on(announce_shared(&shared, &alerts, config.station_id()));

    assert_eq!(keyed, 1);
    assert_eq!(*direct.0.borrow(), *shared_log.0.borrow());
}

// =============================================================================
// Debounced Switches
// =============================================================================

#[test]
fn switch_needs_stable_reads() {
    let pin = MockInput::default();
    let mut switch = DebouncedSwitch::new(pin.clone(), Level::High, NoDelay);

    pin.0.set(true);
    assert!(!switch.update());
    assert!(!switch.update());
    assert!(!switch.update());
    assert!(switch.update(), "pressed after stable reads");
    assert!(switch.is_pressed());
}

#[test]
fn switch_ignores_bounce() {
    let pin = MockInput::default();
    let mut switch = DebouncedSwitch::new(pin.clone(), Level::High, NoDelay);

    for level in [true, false, true, false, true, false] {
        pin.0.set(level);
        switch.update();
    }
    assert_eq!(switch.state(), SwitchState::Released);
}

#[test]
fn switch_active_low() {
    let pin = MockInput::default();
    let mut switch = DebouncedSwitch::new(pin.clone(), Level::Low, NoDelay);

    pin.0.set(true);
    assert_eq!(switch.settle(), SwitchState::Released);
    pin.0.set(false);
    assert_eq!(switch.settle(), SwitchState::Pressed);
}

/// Input that logs the clock time of every read
struct TimedInput {
    clock: Rc<Cell<u32>>,
    reads: Rc<RefCell<Vec<u32>>>,
}

impl ErrorType for TimedInput {
    type Error = Infallible;
}

impl InputPin for TimedInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.reads.borrow_mut().push(self.clock.get());
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

struct ClockDelay(Rc<Cell<u32>>);

impl DelayNs for ClockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.set(self.0.get() + ms);
    }
}

#[test]
fn settle_spaces_its_reads() {
    let clock = Rc::new(Cell::new(0));
    let reads = Rc::new(RefCell::new(Vec::new()));
    let pin = TimedInput {
        clock: clock.clone(),
        reads: reads.clone(),
    };
    let mut switch = DebouncedSwitch::new(pin, Level::High, ClockDelay(clock.clone()));

    assert_eq!(switch.settle(), SwitchState::Pressed);

    let step = SWITCH_SAMPLE_INTERVAL_MS;
    assert_eq!(*reads.borrow(), [0, step, 2 * step, 3 * step]);
    assert_eq!(clock.get(), 3 * step);
}

#[test]
fn disable_switch_suppresses_transmitter() {
    let config = NodeConfig::default();
    let pin = MockInput::default();
    let switch = DebouncedSwitch::new(pin.clone(), Level::High, NoDelay);
    let log = Log::default();
    let mut tx = MessageTransmitter::new(&config, log.clone(), NoDelay, switch);

    pin.0.set(true);
    assert_eq!(tx.send("E"), SendOutcome::Suppressed);
    pin.0.set(false);
    assert_eq!(tx.send("E"), SendOutcome::Sent { characters: 1 });
    assert_eq!(*log.0.borrow(), ["open", "key", "close"]);
}
