//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces one [`SensorSample`] per
//! control cycle.  A sample is all-or-nothing: if any driver fails, the
//! read is a [`SensorFailure`] and no telemetry is sent for the cycle.  The
//! soil reading survives an ambient (DHT11) failure so the moisture
//! decision keeps running.

pub mod dht11;
pub mod soil;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;
use dht11::Dht11;
use soil::SoilMoistureSensor;

/// A point-in-time reading of every sensor on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Air temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (0 – 100 %).
    pub humidity_percent: f32,
    /// Soil moisture (0 = dry, 100 = saturated).
    pub moisture_percent: f32,
    /// Uptime (ms) at which the sample was taken.
    pub captured_at_ms: u64,
}

impl SensorSample {
    /// Reject non-finite values and out-of-range percentages.
    pub fn validate(&self) -> Result<(), SensorError> {
        let pct = 0.0..=100.0;
        if !self.temperature_c.is_finite()
            || !pct.contains(&self.humidity_percent)
            || !pct.contains(&self.moisture_percent)
        {
            return Err(SensorError::OutOfRange);
        }
        Ok(())
    }
}

/// A failed sensor read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFailure {
    /// First error encountered.
    pub error: SensorError,
    /// Soil moisture, if the probe itself read cleanly.
    pub moisture_percent: Option<f32>,
}

impl From<SensorError> for SensorFailure {
    fn from(error: SensorError) -> Self {
        Self {
            error,
            moisture_percent: None,
        }
    }
}

/// Aggregates all sensor drivers and produces a unified sample.
pub struct SensorHub<P, D> {
    pub dht: Dht11<P, D>,
    pub soil: SoilMoistureSensor,
}

impl<P, D> SensorHub<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(dht: Dht11<P, D>, soil: SoilMoistureSensor) -> Self {
        Self { dht, soil }
    }

    /// Read every sensor and stamp the result with `now_ms`.
    pub fn read(&mut self, now_ms: u64) -> Result<SensorSample, SensorFailure> {
        let moisture_percent = self.soil.read_percent()?;
        let air = self.dht.read().map_err(|error| SensorFailure {
            error,
            moisture_percent: Some(moisture_percent),
        })?;

        let sample = SensorSample {
            temperature_c: air.temperature_c,
            humidity_percent: air.humidity_percent,
            moisture_percent,
            captured_at_ms: now_ms,
        };
        sample.validate().map_err(|error| SensorFailure {
            error,
            moisture_percent: Some(moisture_percent),
        })?;
        Ok(sample)
    }
}
