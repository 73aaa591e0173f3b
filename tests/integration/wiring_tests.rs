//! End-to-end wiring tests: real drivers and adapters, simulated buses.
//!
//! The DHT11 line is a waveform generator clocked by the same virtual time
//! as the delay source, the relay is a level-recording pin, and the backend
//! is the host build of [`HttpAdapter`] with scripted responses.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use irrigation::adapters::hardware::HardwareAdapter;
use irrigation::adapters::http::HttpAdapter;
use irrigation::adapters::log_sink::LogEventSink;
use irrigation::app::service::IrrigationService;
use irrigation::config::SystemConfig;
use irrigation::control::PumpState;
use irrigation::drivers::pump::{ActiveLevel, PumpDriver};
use irrigation::sensors::dht11::Dht11;
use irrigation::sensors::soil::SoilMoistureSensor;
use irrigation::sensors::SensorHub;

// ── Simulated DHT11 ───────────────────────────────────────────

/// Virtual time in nanoseconds, shared by the bus and the delay.
type Clock = Rc<Cell<u64>>;

struct SimDelay(Clock);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns));
    }
}

/// Replays a DHT11 answer every time the host releases the line after a
/// start pulse.  A bus with no frame never answers, like a dead sensor.
struct SimDhtBus {
    clock: Clock,
    frame: Option<[u8; 5]>,
    host_low: bool,
    released_at_ns: Option<u64>,
}

impl SimDhtBus {
    fn new(clock: Clock, frame: Option<[u8; 5]>) -> Self {
        Self {
            clock,
            frame,
            host_low: false,
            released_at_ns: None,
        }
    }

    /// (level, duration µs) segments of the sensor's answer.
    fn waveform(&self, frame: [u8; 5]) -> Vec<(bool, u64)> {
        let mut w = vec![(true, 20), (false, 80), (true, 80)];
        for bit in 0..40 {
            let one = frame[bit / 8] & (0x80 >> (bit % 8)) != 0;
            w.push((false, 50));
            w.push((true, if one { 70 } else { 26 }));
        }
        w.push((false, 50));
        w
    }

    fn level(&self) -> bool {
        if self.host_low {
            return false;
        }
        let (Some(t0), Some(frame)) = (self.released_at_ns, self.frame) else {
            return true;
        };
        let mut offset_us = (self.clock.get() - t0) / 1_000;
        for (level, dur) in self.waveform(frame) {
            if offset_us < dur {
                return level;
            }
            offset_us -= dur;
        }
        true
    }
}

impl ErrorType for SimDhtBus {
    type Error = Infallible;
}

impl OutputPin for SimDhtBus {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.host_low = true;
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        if self.host_low {
            self.host_low = false;
            self.released_at_ns = Some(self.clock.get());
        }
        Ok(())
    }
}

impl InputPin for SimDhtBus {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level())
    }
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level())
    }
}

// ── Relay pin ─────────────────────────────────────────────────

#[derive(Clone, Default)]
struct RelayPin(Rc<Cell<Option<bool>>>);

impl ErrorType for RelayPin {
    type Error = Infallible;
}

impl OutputPin for RelayPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(Some(false));
        Ok(())
    }
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(Some(true));
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// 55 %RH, 24 °C.
const DHT_FRAME: [u8; 5] = [55, 0, 24, 0, 79];

/// Raw ADC count that maps to 20 % moisture.
const RAW_20_PERCENT: u16 = 3276;

const AUTO_BODY: &[u8] = br#"{"state":"OFF","mode":"AUTO","safetyActive":false}"#;

type Board = (HardwareAdapter<SimDhtBus, SimDelay, RelayPin>, RelayPin);

fn board() -> Board {
    board_with(Some(DHT_FRAME), RAW_20_PERCENT)
}

fn board_with(dht_frame: Option<[u8; 5]>, soil_raw: u16) -> Board {
    let clock = Clock::default();
    let relay = RelayPin::default();
    let mut soil = SoilMoistureSensor::new(34);
    soil.sim_set_raw(Some(soil_raw));
    let hub = SensorHub::new(
        Dht11::new(SimDhtBus::new(clock.clone(), dht_frame), SimDelay(clock)),
        soil,
    );
    let hw = HardwareAdapter::new(hub, PumpDriver::new(relay.clone(), ActiveLevel::Low));
    (hw, relay)
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn relay_is_released_as_soon_as_driver_exists() {
    let (hw, relay) = board();
    assert_eq!(relay.0.get(), Some(true));
    assert_eq!(hw.relay_state(), PumpState::Off);
}

#[test]
fn dry_soil_energises_relay_and_posts_telemetry() {
    let config = SystemConfig::default();
    let (mut hw, relay) = board();
    let mut http = HttpAdapter::new(&config);
    let mut sink = LogEventSink::new();
    let mut app = IrrigationService::new(&config);

    http.sim_push_command(Ok((200, AUTO_BODY.to_vec())));
    app.start(&mut hw, &mut sink);
    app.poll(0, &mut hw, &mut http, &mut sink);

    assert_eq!(relay.0.get(), Some(false), "active-low relay driven LOW");
    assert_eq!(hw.relay_state(), PumpState::On);

    let body: serde_json::Value = serde_json::from_slice(&http.sim_sent()[0]).unwrap();
    assert_eq!(body["temperature"], 24.0);
    assert_eq!(body["humidity"], 55.0);
    assert_eq!(body["moisture"], 20.0);
}

#[test]
fn lost_backend_releases_relay_after_timeout() {
    let config = SystemConfig::default();
    let (mut hw, relay) = board();
    let mut http = HttpAdapter::new(&config);
    let mut sink = LogEventSink::new();
    let mut app = IrrigationService::new(&config);

    http.sim_push_command(Ok((200, AUTO_BODY.to_vec())));
    app.start(&mut hw, &mut sink);
    app.poll(0, &mut hw, &mut http, &mut sink);
    assert_eq!(relay.0.get(), Some(false));

    // Nothing more queued: every later fetch fails to connect.
    let mut t = 50;
    while t <= 20_000 {
        app.poll(t, &mut hw, &mut http, &mut sink);
        t += 50;
    }
    assert_eq!(relay.0.get(), Some(false));

    app.poll(20_050, &mut hw, &mut http, &mut sink);
    assert_eq!(relay.0.get(), Some(true));
    assert_eq!(hw.relay_state(), PumpState::Off);
}

#[test]
fn backend_error_status_is_a_network_fault() {
    let config = SystemConfig::default();
    let (mut hw, _relay) = board();
    let mut http = HttpAdapter::new(&config);
    let mut sink = LogEventSink::new();
    let mut app = IrrigationService::new(&config);

    http.sim_push_telemetry(Ok((500, Vec::new())));
    http.sim_push_command(Ok((503, Vec::new())));
    app.start(&mut hw, &mut sink);
    app.poll(0, &mut hw, &mut http, &mut sink);

    let stats = app.stats();
    assert_eq!(stats.telemetry_failures, 1);
    assert_eq!(stats.command_network_faults, 1);
    assert_eq!(stats.command_protocol_faults, 0);
    assert_eq!(hw.relay_state(), PumpState::Off);
}

#[test]
fn unplugged_moisture_sensor_is_a_sensor_fault() {
    let config = SystemConfig::default();
    let (mut hw, _relay) = board();
    hw.sensors_mut().soil.sim_set_raw(None);
    let mut http = HttpAdapter::new(&config);
    let mut sink = LogEventSink::new();
    let mut app = IrrigationService::new(&config);

    http.sim_push_command(Ok((200, AUTO_BODY.to_vec())));
    app.start(&mut hw, &mut sink);
    app.poll(0, &mut hw, &mut http, &mut sink);

    assert_eq!(app.stats().sensor_faults, 1);
    assert!(http.sim_sent().is_empty());
    assert_eq!(hw.relay_state(), PumpState::Off);
}

#[test]
fn dead_dht_still_waters_dry_soil() {
    let config = SystemConfig::default();
    // Raw 4000 is about 2 % moisture, far below the 30 % threshold.
    let (mut hw, relay) = board_with(None, 4000);
    let mut http = HttpAdapter::new(&config);
    let mut sink = LogEventSink::new();
    let mut app = IrrigationService::new(&config);

    app.start(&mut hw, &mut sink);
    for cycle in 0..4u64 {
        http.sim_push_command(Ok((200, AUTO_BODY.to_vec())));
        app.poll(cycle * 5_000, &mut hw, &mut http, &mut sink);
    }

    assert_eq!(relay.0.get(), Some(false), "active-low relay driven LOW");
    assert_eq!(hw.relay_state(), PumpState::On);
    assert_eq!(app.stats().sensor_faults, 4);
    assert!(http.sim_sent().is_empty());
}
