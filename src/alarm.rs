//! Sensor Alarms
//!
//! Scales raw ADC counts into volts and amps, compares a snapshot of all
//! sensors against the alarm limits, and announces each raised alert in Morse
//! followed by the station identifier.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::{
    self, calibration, ADC_MAX, AC_AMPS_HIGH_LIMIT, AC_VOLTS_HIGH_LIMIT, AC_VOLTS_LOW_LIMIT,
    BATTERY_HIGH_LIMIT, BATTERY_LOW_LIMIT,
};
use crate::morse::keying::KeyLines;
use crate::morse::shared::SharedTransmitter;
use crate::morse::transmit::{MessageTransmitter, SendOutcome, SuppressInput};

/// Linearly scaled analog reading
#[derive(Clone, Copy, Debug)]
pub struct ScaledReading {
    /// Raw ADC count
    raw: u16,
    /// Engineering value at [`ADC_MAX`]
    full_scale: f32,
    /// Multiplier from calibration against a meter
    calibration: f32,
}

impl ScaledReading {
    /// Create from ADC reading
    #[must_use]
    pub const fn from_adc(raw: u16, full_scale: f32, calibration: f32) -> Self {
        Self {
            raw,
            full_scale,
            calibration,
        }
    }

    /// Battery channel reading
    #[must_use]
    pub const fn battery(raw: u16, calibration: f32) -> Self {
        Self::from_adc(raw, config::FS_BATTERY_VOLTS, calibration)
    }

    /// AC line voltage reading
    #[must_use]
    pub const fn ac_volts(raw: u16) -> Self {
        Self::from_adc(raw, config::FS_AC_VOLTS, calibration::AC_VOLTS)
    }

    /// AC line current reading
    #[must_use]
    pub const fn ac_amps(raw: u16) -> Self {
        Self::from_adc(raw, config::FS_AC_AMPS, calibration::AC_AMPS)
    }

    /// Raw ADC count
    #[must_use]
    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Scaled value in volts or amps
    #[must_use]
    pub fn value(&self) -> f32 {
        f32::from(self.raw.min(ADC_MAX)) * self.full_scale / f32::from(ADC_MAX) * self.calibration
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ScaledReading {
    fn format(&self, f: defmt::Formatter) {
        let v = self.value();
        let whole = v as u32;
        let frac = ((v - whole as f32) * 100.0) as u32;
        defmt::write!(f, "{}.{:02}", whole, frac);
    }
}

/// Running mean of ADC samples
#[derive(Clone, Copy, Debug, Default)]
pub struct Averager {
    sum: u32,
    count: u32,
}

impl Averager {
    /// Create an empty averager
    #[must_use]
    pub const fn new() -> Self {
        Self { sum: 0, count: 0 }
    }

    /// Add a sample
    pub fn push(&mut self, raw: u16) {
        self.sum = self.sum.saturating_add(u32::from(raw));
        self.count += 1;
    }

    /// Mean of the samples so far, None if empty
    #[must_use]
    pub fn mean(&self) -> Option<u16> {
        if self.count == 0 {
            return None;
        }
        u16::try_from(self.sum / self.count).ok()
    }

    /// Number of samples so far
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Forget all samples
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// One pass of sensor readings
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Battery 1 in volts
    pub battery1: f32,
    /// Battery 2 in volts
    pub battery2: f32,
    /// AC line in volts
    pub ac_volts: f32,
    /// AC line in amps
    pub ac_amps: f32,
    /// Door switch open
    pub intrusion: bool,
}

/// Alarm thresholds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlarmLimits {
    /// Battery below this is low
    pub battery_low: f32,
    /// Battery above this is high (overcharge)
    pub battery_high: f32,
    /// AC line below this is low
    pub ac_volts_low: f32,
    /// AC line above this is high
    pub ac_volts_high: f32,
    /// AC current above this is high
    pub ac_amps_high: f32,
}

impl Default for AlarmLimits {
    fn default() -> Self {
        Self {
            battery_low: BATTERY_LOW_LIMIT,
            battery_high: BATTERY_HIGH_LIMIT,
            ac_volts_low: AC_VOLTS_LOW_LIMIT,
            ac_volts_high: AC_VOLTS_HIGH_LIMIT,
            ac_amps_high: AC_AMPS_HIGH_LIMIT,
        }
    }
}

/// Alarm condition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alert {
    /// Battery 1 under voltage
    Battery1Low,
    /// Battery 1 over voltage
    Battery1High,
    /// Battery 2 under voltage
    Battery2Low,
    /// Battery 2 over voltage
    Battery2High,
    /// Door opened
    Intrusion,
    /// AC line under voltage
    AcVoltsLow,
    /// AC line over voltage
    AcVoltsHigh,
    /// AC line over current
    AcCurrentHigh,
}

impl Alert {
    /// Every alert, in announcement order
    pub const ALL: [Self; 8] = [
        Self::Battery1Low,
        Self::Battery1High,
        Self::Battery2Low,
        Self::Battery2High,
        Self::Intrusion,
        Self::AcVoltsLow,
        Self::AcVoltsHigh,
        Self::AcCurrentHigh,
    ];

    /// Text keyed for this alert
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Battery1Low => "B 1 L   B 1 L   B 1 L  ",
            Self::Battery1High => "B 1 H   B 1 H   B 1 H  ",
            Self::Battery2Low => "B 2 L   B 2 L   B 2 L  ",
            Self::Battery2High => "B 2 H   B 2 H   B 2 H  ",
            Self::Intrusion => "I N T   I N T   I N T   I N T  I N T   ",
            Self::AcVoltsLow => "AC V L   AC V L   AC V L  ",
            Self::AcVoltsHigh => "AC V H   AC V H   AC V H  ",
            Self::AcCurrentHigh => "AC C H   AC C H    AC C H  ",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Alert {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Battery1Low => defmt::write!(f, "B1 LOW"),
            Self::Battery1High => defmt::write!(f, "B1 HIGH"),
            Self::Battery2Low => defmt::write!(f, "B2 LOW"),
            Self::Battery2High => defmt::write!(f, "B2 HIGH"),
            Self::Intrusion => defmt::write!(f, "INTRUSION"),
            Self::AcVoltsLow => defmt::write!(f, "ACV LOW"),
            Self::AcVoltsHigh => defmt::write!(f, "ACV HIGH"),
            Self::AcCurrentHigh => defmt::write!(f, "ACC HIGH"),
        }
    }
}

/// Alerts raised by one snapshot, in announcement order
pub type Alerts = Vec<Alert, 8>;

/// Compare a snapshot against the limits
#[must_use]
pub fn evaluate(snapshot: &SensorSnapshot, limits: &AlarmLimits) -> Alerts {
    let raised = [
        snapshot.battery1 < limits.battery_low,
        snapshot.battery1 > limits.battery_high,
        snapshot.battery2 < limits.battery_low,
        snapshot.battery2 > limits.battery_high,
        snapshot.intrusion,
        snapshot.ac_volts < limits.ac_volts_low,
        snapshot.ac_volts > limits.ac_volts_high,
        snapshot.ac_amps > limits.ac_amps_high,
    ];

    let mut alerts = Alerts::new();
    for (alert, _) in Alert::ALL.iter().zip(raised).filter(|(_, hit)| *hit) {
        // At most one entry per alert kind
        let _ = alerts.push(*alert);
        warn!("alert {}", alert);
    }
    alerts
}

/// Key each alert followed by the station identifier
///
/// Returns how many alerts were actually keyed (suppressed ones excluded).
pub fn announce<K, D, S>(tx: &mut MessageTransmitter<'_, K, D, S>, alerts: &[Alert]) -> usize
where
    K: KeyLines,
    D: DelayNs,
    S: SuppressInput,
{
    let station_id = tx.config().station_id();
    let mut keyed = 0;
    for alert in alerts {
        if let SendOutcome::Sent { .. } = tx.send(alert.message()) {
            keyed += 1;
        }
        tx.send(station_id);
    }
    keyed
}

/// [`announce`] through a shared transmitter; each alert and its identifier
/// stay together on air
pub async fn announce_shared<M, K, D, S>(
    tx: &SharedTransmitter<'_, M, K, D, S>,
    alerts: &[Alert],
    station_id: &str,
) -> usize
where
    M: RawMutex,
    K: KeyLines,
    D: DelayNs,
    S: SuppressInput,
{
    let mut keyed = 0;
    for alert in alerts {
        if let Some(SendOutcome::Sent { .. }) = tx.send_all(&[alert.message(), station_id]).await {
            keyed += 1;
        }
    }
    keyed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> SensorSnapshot {
        SensorSnapshot {
            battery1: 13.2,
            battery2: 13.1,
            ac_volts: 120.0,
            ac_amps: 4.0,
            intrusion: false,
        }
    }

    #[test]
    fn healthy_raises_nothing() {
        assert!(evaluate(&healthy(), &AlarmLimits::default()).is_empty());
    }

    #[test]
    fn limits_are_exclusive() {
        let snapshot = SensorSnapshot {
            battery1: BATTERY_LOW_LIMIT,
            battery2: BATTERY_HIGH_LIMIT,
            ..healthy()
        };
        assert!(evaluate(&snapshot, &AlarmLimits::default()).is_empty());
    }

    #[test]
    fn order_follows_announcement_order() {
        let snapshot = SensorSnapshot {
            battery1: 11.0,
            intrusion: true,
            ac_amps: 29.0,
            ..healthy()
        };
        let alerts = evaluate(&snapshot, &AlarmLimits::default());
        assert_eq!(
            alerts.as_slice(),
            &[Alert::Battery1Low, Alert::Intrusion, Alert::AcCurrentHigh]
        );
    }

    #[test]
    fn scaled_full_scale() {
        let r = ScaledReading::from_adc(ADC_MAX, 15.0, 1.0);
        assert!((r.value() - 15.0).abs() < 1e-3);
        let r = ScaledReading::from_adc(0, 15.0, 1.0);
        assert_eq!(r.value(), 0.0);
    }

    #[test]
    fn scaled_clamps_overrange() {
        let r = ScaledReading::from_adc(u16::MAX, 150.0, 1.0);
        assert!((r.value() - 150.0).abs() < 1e-3);
    }

    #[test]
    fn averager_mean() {
        let mut avg = Averager::new();
        assert_eq!(avg.mean(), None);
        for raw in [100, 200, 300] {
            avg.push(raw);
        }
        assert_eq!(avg.mean(), Some(200));
        assert_eq!(avg.count(), 3);
        avg.reset();
        assert_eq!(avg.count(), 0);
    }
}
