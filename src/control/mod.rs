//! Control algorithms and the state they operate on.
//!
//! [`ControllerState`] is the one piece of process-wide mutable state.  It
//! is owned by the [`IrrigationService`](crate::app::service::IrrigationService)
//! and threaded explicitly through the decision and fail-safe logic; the
//! actuator port is the only place the physical pump is touched.

pub mod pump;

use core::fmt;

use serde::{Deserialize, Serialize};

/// Requested or applied pump relay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PumpState {
    On,
    #[default]
    Off,
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// Controller bookkeeping carried between loop passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    /// Last state handed to the actuator.
    pub last_pump_state: PumpState,
    /// Uptime (ms) of the last well-formed command.  Starts at boot (0).
    pub last_command_received_at_ms: u64,
}

impl ControllerState {
    /// Startup state: pump OFF, command clock at the epoch.
    pub const fn new() -> Self {
        Self {
            last_pump_state: PumpState::Off,
            last_command_received_at_ms: 0,
        }
    }
}
