//! Pump actuation decision.
//!
//! Maps the latest sensor sample, the command fetched this cycle, and the
//! previous controller state to the pump state that should be applied.
//! Precedence, highest first:
//!
//! 1. no command this cycle   → keep previous state (fail-open)
//! 2. `safetyActive`          → OFF
//! 3. MANUAL                  → commanded state
//! 4. AUTO without a sample   → keep previous state
//! 5. AUTO                    → ON iff moisture < threshold
//!
//! Sustained command loss is handled separately by the time-based
//! [`FailSafeTimer`](crate::safety::FailSafeTimer).

use crate::app::commands::{Mode, RemoteCommand};
use crate::sensors::SensorSample;

use super::{ControllerState, PumpState};

/// Threshold-based pump controller.
#[derive(Debug, Clone, Copy)]
pub struct PumpController {
    moisture_threshold_percent: f32,
}

impl PumpController {
    pub fn new(moisture_threshold_percent: f32) -> Self {
        Self {
            moisture_threshold_percent,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.moisture_threshold_percent
    }

    /// Decide the pump state for this cycle.  Pure; no other input is
    /// consulted.
    pub fn decide(
        &self,
        sample: Option<&SensorSample>,
        command: Option<&RemoteCommand>,
        previous: &ControllerState,
    ) -> PumpState {
        self.decide_on_moisture(sample.map(|s| s.moisture_percent), command, previous)
    }

    /// [`decide`](Self::decide) on the soil reading alone.  AUTO only
    /// needs moisture, so a cycle whose ambient sensor failed can still
    /// pass the soil value here.
    pub fn decide_on_moisture(
        &self,
        moisture_percent: Option<f32>,
        command: Option<&RemoteCommand>,
        previous: &ControllerState,
    ) -> PumpState {
        let Some(command) = command else {
            return previous.last_pump_state;
        };

        if command.safety_active {
            return PumpState::Off;
        }

        match command.mode {
            Mode::Manual => command.state,
            Mode::Auto => match moisture_percent {
                None => previous.last_pump_state,
                Some(m) if m < self.moisture_threshold_percent => PumpState::On,
                Some(_) => PumpState::Off,
            },
        }
    }
}
