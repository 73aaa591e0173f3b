//! Irrigation pump relay driver.
//!
//! The DC pump is switched by a single-channel relay module whose input is
//! active LOW: driving the pin LOW energises the coil and runs the pump.
//!
//! ## Safety contract
//!
//! The driver is a dumb actuator.  Whether the pump *may* run is decided by
//! the pump controller and the fail-safe timer; this driver only applies
//! what it is told.  Writing the same state twice is harmless.

use embedded_hal::digital::OutputPin;

use crate::control::PumpState;

/// Electrical level that switches the relay on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    Low,
    High,
}

/// Relay write failed; the physical state is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayWriteError;

impl core::fmt::Display for RelayWriteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "relay GPIO write failed")
    }
}

pub struct PumpDriver<P> {
    pin: P,
    active: ActiveLevel,
    state: PumpState,
}

impl<P: OutputPin> PumpDriver<P> {
    /// Take ownership of the relay pin and immediately drive it OFF.
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        let mut driver = Self {
            pin,
            active,
            state: PumpState::Off,
        };
        if driver.set(PumpState::Off).is_err() {
            log::error!("Pump: failed to drive relay OFF at init");
        }
        driver
    }

    pub fn set(&mut self, state: PumpState) -> Result<(), RelayWriteError> {
        let drive_high = match (state, self.active) {
            (PumpState::On, ActiveLevel::High) | (PumpState::Off, ActiveLevel::Low) => true,
            (PumpState::On, ActiveLevel::Low) | (PumpState::Off, ActiveLevel::High) => false,
        };
        let result = if drive_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| RelayWriteError)?;
        self.state = state;
        Ok(())
    }

    /// Last state successfully written to the pin.
    pub fn state(&self) -> PumpState {
        self.state
    }
}
