//! Inbound commands to the application service.
//!
//! A [`RemoteCommand`] is what the backend answers to a command poll.  Each
//! successfully parsed command replaces the previous one wholesale; fields
//! are never merged or defaulted.

use serde::{Deserialize, Serialize};

use crate::control::PumpState;

/// How the pump state is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Pump follows the soil-moisture threshold.
    Auto,
    /// Pump follows the remotely supplied [`RemoteCommand::state`].
    Manual,
}

/// Command payload served by the backend's pump endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub mode: Mode,
    pub state: PumpState,
    /// Forces the pump off regardless of mode and sensor data.
    #[serde(rename = "safetyActive")]
    pub safety_active: bool,
}

impl RemoteCommand {
    pub const fn auto() -> Self {
        Self {
            mode: Mode::Auto,
            state: PumpState::Off,
            safety_active: false,
        }
    }

    pub const fn manual(state: PumpState) -> Self {
        Self {
            mode: Mode::Manual,
            state,
            safety_active: false,
        }
    }

    #[must_use]
    pub const fn with_safety(mut self, active: bool) -> Self {
        self.safety_active = active;
        self
    }
}
