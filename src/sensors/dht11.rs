//! DHT11 temperature / humidity sensor (single-wire, open-drain).
//!
//! ## Protocol
//!
//! 1. Host pulls the line LOW for ≥18 ms, then releases it.
//! 2. Sensor answers LOW ~80 µs, HIGH ~80 µs.
//! 3. 40 data bits follow, MSB first.  Each bit is ~50 µs LOW followed by
//!    HIGH for ~27 µs (`0`) or ~70 µs (`1`).
//! 4. Byte 4 is the wrapping sum of bytes 0–3.
//!
//! Pulse widths are measured by polling the pin in 1 µs steps, so the
//! driver works with any `embedded-hal` open-drain pin and delay source.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

/// Longest wait for any single line transition (µs).
const EDGE_TIMEOUT_US: u32 = 100;
/// HIGH pulses longer than this decode as `1`.
const BIT_ONE_THRESHOLD_US: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dht11Reading {
    pub temperature_c: f32,
    pub humidity_percent: f32,
}

/// Decode a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<Dht11Reading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity_percent = frame[0] as f32 + frame[1] as f32 / 10.0;
    let magnitude = frame[2] as f32 + (frame[3] & 0x7F) as f32 / 10.0;
    let temperature_c = if frame[3] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    if humidity_percent > 100.0 {
        return Err(SensorError::OutOfRange);
    }

    Ok(Dht11Reading {
        temperature_c,
        humidity_percent,
    })
}

pub struct Dht11<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht11<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// `pin` must be configured open-drain with a pull-up; it is released
    /// (driven HIGH) here.
    pub fn new(mut pin: P, delay: D) -> Self {
        if pin.set_high().is_err() {
            log::warn!("DHT11: failed to release data line at init");
        }
        Self { pin, delay }
    }

    pub fn read(&mut self) -> Result<Dht11Reading, SensorError> {
        let frame = self.read_frame()?;
        decode_frame(frame)
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        // Start signal.
        self.pin.set_low().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_ms(20);
        self.pin.set_high().map_err(|_| SensorError::GpioFailed)?;

        // Response: line stays high briefly, then LOW ~80 µs, HIGH ~80 µs.
        self.wait_while(true)?;
        self.wait_while(false)?;
        self.wait_while(true)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            if high_us > BIT_ONE_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Poll until the line leaves `high`; returns the time spent (µs).
    fn wait_while(&mut self, high: bool) -> Result<u32, SensorError> {
        let mut elapsed = 0;
        while self.pin.is_high().map_err(|_| SensorError::GpioFailed)? == high {
            if elapsed >= EDGE_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
        Ok(elapsed)
    }
}
