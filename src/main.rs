//! Smart Irrigation Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    HttpAdapter        LogEventSink  Esp32Time │
//! │  (Sensor+Actuator)  (Telemetry+Command) (EventSink)  (TimePort)│
//! │  WifiLink                                                      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            IrrigationService (pure logic)              │    │
//! │  │  PumpController · FailSafeTimer                        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{ensure, Result};
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{Pin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info};

use irrigation::adapters::hardware::HardwareAdapter;
use irrigation::adapters::http::HttpAdapter;
use irrigation::adapters::log_sink::LogEventSink;
use irrigation::adapters::time::Esp32TimeAdapter;
use irrigation::adapters::wifi::WifiLink;
use irrigation::app::ports::TimePort;
use irrigation::app::service::IrrigationService;
use irrigation::config::SystemConfig;
use irrigation::drivers::hw_init;
use irrigation::drivers::pump::{ActiveLevel, PumpDriver};
use irrigation::pins;
use irrigation::sensors::dht11::Dht11;
use irrigation::sensors::soil::SoilMoistureSensor;
use irrigation::sensors::SensorHub;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Smart Irrigation v{}              ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Relay first: the pump must be OFF before anything else ──
    let peripherals = Peripherals::take()?;
    let relay_pin = peripherals.pins.gpio23;
    ensure!(
        relay_pin.pin() == pins::RELAY_GPIO,
        "relay claimed GPIO{} but the board map says GPIO{}",
        relay_pin.pin(),
        pins::RELAY_GPIO
    );
    let relay = PinDriver::output(relay_pin)?;
    let pump = PumpDriver::new(relay, ActiveLevel::Low);
    info!("Relay on GPIO{} driven OFF", pins::RELAY_GPIO);

    // ── 3. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => info!("Config: <unprintable: {}>", e),
    }

    // ── 4. Sensors ────────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Soil reads will fail and every cycle reports a sensor fault;
        // the command path and fail-safe keep working.
        error!("HAL init failed: {} — continuing without soil probe", e);
    }
    let dht_gpio = peripherals.pins.gpio4;
    ensure!(
        dht_gpio.pin() == pins::DHT11_GPIO,
        "DHT11 claimed GPIO{} but the board map says GPIO{}",
        dht_gpio.pin(),
        pins::DHT11_GPIO
    );
    let dht_pin = PinDriver::input_output_od(dht_gpio)?;
    let sensor_hub = SensorHub::new(
        Dht11::new(dht_pin, Ets),
        SoilMoistureSensor::new(pins::SOIL_ADC_GPIO),
    );
    let mut hw = HardwareAdapter::new(sensor_hub, pump);

    // ── 5. Network ────────────────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = WifiLink::connect(peripherals.modem, sysloop, nvs)?;
    let mut http = HttpAdapter::new(&config);

    // ── 6. App service ────────────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();
    let mut app = IrrigationService::new(&config);
    app.start(&mut hw, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    let poll = std::time::Duration::from_millis(config.poll_interval_ms);
    loop {
        app.poll(clock.now_ms(), &mut hw, &mut http, &mut log_sink);
        std::thread::sleep(poll);
    }
}
