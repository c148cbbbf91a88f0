//! Morse Alarm Beacon Main Application
//!
//! Entry point for the STM32G474-based alarm beacon.
//! Initializes hardware and spawns the alarm and watchdog tasks.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::gpio::{Input, Level as PinLevel, Output, Pull, Speed};
use embassy_stm32::peripherals::{ADC1, PA0, PA1, PA2, PA3};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Instant};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use beacon_firmware::alarm::{self, AlarmLimits, Averager, ScaledReading, SensorSnapshot};
use beacon_firmware::config::{self, calibration};
use beacon_firmware::hal::gpio::{DebouncedSwitch, SwitchState};
use beacon_firmware::morse::{PinLines, SharedTransmitter};
use beacon_firmware::prelude::*;
use beacon_firmware::watchdog::{self, Watchdog, WatchdogLink};

type Lines = PinLines<Output<'static>, Output<'static>, Output<'static>>;
type Switch = DebouncedSwitch<Input<'static>, Delay>;
type Beacon = SharedTransmitter<'static, CriticalSectionRawMutex, Lines, Delay, Switch>;

static NODE_CONFIG: StaticCell<NodeConfig> = StaticCell::new();
static BEACON: StaticCell<Beacon> = StaticCell::new();

/// Analog inputs sampled by the alarm task
struct SensorInputs {
    adc: Adc<'static, ADC1>,
    battery1: PA0,
    battery2: PA1,
    ac_volts: PA2,
    ac_amps: PA3,
    intrusion: Switch,
}

impl SensorInputs {
    /// Average a burst of readings on every channel
    fn sample(&mut self) -> SensorSnapshot {
        let mut acc = [Averager::new(); 4];
        for _ in 0..config::SENSOR_SAMPLES {
            acc[0].push(self.adc.blocking_read(&mut self.battery1));
            acc[1].push(self.adc.blocking_read(&mut self.battery2));
            acc[2].push(self.adc.blocking_read(&mut self.ac_volts));
            acc[3].push(self.adc.blocking_read(&mut self.ac_amps));
        }
        let [b1, b2, acv, aca] = acc.map(|a| a.mean().unwrap_or(0));

        SensorSnapshot {
            battery1: ScaledReading::battery(b1, calibration::BATTERY1).value(),
            battery2: ScaledReading::battery(b2, calibration::BATTERY2).value(),
            ac_volts: ScaledReading::ac_volts(acv).value(),
            ac_amps: ScaledReading::ac_amps(aca).value(),
            intrusion: self.intrusion.settle() == SwitchState::Pressed,
        }
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Morse Alarm Beacon v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    let node: &'static NodeConfig = NODE_CONFIG.init(NodeConfig::default());
    info!("keying at {} wpm", node.timing().wpm());

    // Sounder, key LED and PTT all idle low
    let lines = PinLines::new(
        Output::new(p.PB3, PinLevel::Low, Speed::Low),
        Output::new(p.PA5, PinLevel::Low, Speed::Low),
        Output::new(p.PB0, PinLevel::Low, Speed::Low),
    );
    let disable = DebouncedSwitch::new(Input::new(p.PA10, Pull::Up), Level::High, Delay);
    let tx = MessageTransmitter::new(node, lines, Delay, disable);
    let beacon: &'static Beacon = BEACON.init(SharedTransmitter::new(tx));

    let link = WatchdogLink::new(
        Output::new(p.PB7, PinLevel::Low, Speed::Low),
        Input::new(p.PB8, Pull::Down),
    );

    let sensors = SensorInputs {
        adc: Adc::new(p.ADC1),
        battery1: p.PA0,
        battery2: p.PA1,
        ac_volts: p.PA2,
        ac_amps: p.PA3,
        intrusion: DebouncedSwitch::new(Input::new(p.PA12, Pull::Up), Level::High, Delay),
    };

    unwrap!(spawner.spawn(watchdog_task(beacon, link, node)));
    unwrap!(spawner.spawn(alarm_task(beacon, sensors, node)));

    info!("Tasks spawned");
}

/// Sensor polling - keys every raised alert followed by the station id
#[embassy_executor::task]
async fn alarm_task(beacon: &'static Beacon, mut sensors: SensorInputs, node: &'static NodeConfig) {
    let limits = AlarmLimits::default();

    loop {
        let snapshot = sensors.sample();
        let alerts = alarm::evaluate(&snapshot, &limits);
        if !alerts.is_empty() {
            let keyed = alarm::announce_shared(beacon, &alerts, node.station_id()).await;
            info!("{} of {} alerts keyed", keyed, alerts.len());
        }
        Timer::after_millis(u64::from(config::POLL_INTERVAL_MS)).await;
    }
}

/// Host liveness - pulses the host once a second and keys the failsafe
/// message when it stops answering
#[embassy_executor::task]
async fn watchdog_task(
    beacon: &'static Beacon,
    mut link: WatchdogLink<Output<'static>, Input<'static>>,
    node: &'static NodeConfig,
) {
    let mut wd = Watchdog::new();
    let mut delay = Delay;

    loop {
        let now = Instant::now().as_millis();
        let message = node.failsafe_message();
        let keyed =
            watchdog::service_and_announce(&mut link, &mut wd, now, &mut delay, beacon, message)
                .await;
        if let Some(outcome) = keyed {
            info!("failsafe message: {}", outcome);
        }
        Timer::after_millis(50).await;
    }
}
