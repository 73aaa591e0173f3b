//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the relay [`PumpDriver`], exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only module
//! in the system that touches board I/O.  On non-espidf targets the soil
//! probe uses its simulation stub; pins and delays are whatever the caller
//! injects.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::error;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::PumpState;
use crate::drivers::pump::PumpDriver;
use crate::sensors::{SensorFailure, SensorHub, SensorSample};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, D, R> {
    sensor_hub: SensorHub<P, D>,
    pump: PumpDriver<R>,
}

impl<P, D, R> HardwareAdapter<P, D, R>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    R: OutputPin,
{
    pub fn new(sensor_hub: SensorHub<P, D>, pump: PumpDriver<R>) -> Self {
        Self { sensor_hub, pump }
    }

    /// Mutable access to the sensors, e.g. to drive the soil simulation.
    pub fn sensors_mut(&mut self) -> &mut SensorHub<P, D> {
        &mut self.sensor_hub
    }

    /// State the relay was last successfully driven to.
    pub fn relay_state(&self) -> PumpState {
        self.pump.state()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P, D, R> SensorPort for HardwareAdapter<P, D, R>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    R: OutputPin,
{
    fn read(&mut self, now_ms: u64) -> Result<SensorSample, SensorFailure> {
        self.sensor_hub.read(now_ms)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P, D, R> ActuatorPort for HardwareAdapter<P, D, R>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    R: OutputPin,
{
    fn apply_pump(&mut self, state: PumpState) {
        // The port is infallible; a stuck relay is retried on the next pass.
        if let Err(e) = self.pump.set(state) {
            error!("Relay write failed ({}): {}", state, e);
        }
    }
}
