//! GPIO / peripheral pin assignments for the irrigation controller board.
//!
//! Single source of truth — drivers and `main()` reference this module
//! rather than hard-coding pin numbers.  `main()` claims the matching
//! `esp-idf-hal` pin objects and refuses to boot if they disagree.

// ---------------------------------------------------------------------------
// Pump relay (single-channel module, active LOW)
// ---------------------------------------------------------------------------

/// Digital output: LOW = relay energised = pump ON.
pub const RELAY_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (open-drain, external 10 kΩ pull-up).
pub const DHT11_GPIO: i32 = 4;

/// Capacitive soil-moisture probe, analog.
/// ADC1 channel 6 (GPIO 34 on ESP32, input-only).
pub const SOIL_ADC_GPIO: i32 = 34;
