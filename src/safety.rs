//! Command-channel fail-safe.
//!
//! The timer runs on **every loop pass**, after any control cycle that
//! pass may have executed, and independently of the pump decision.  It
//! only looks at how long ago the last well-formed command arrived.
//!
//! ## Lifecycle
//!
//! 1. A successful command poll stamps `last_command_received_at_ms`.
//!    Network and parse failures leave the stamp untouched.
//! 2. Once `now - stamp > timeout` the timer reports [`FailSafeCheck::Stale`]
//!    and the caller forces the pump OFF.  The first stale pass of an
//!    outage is flagged `newly_engaged` so it is logged once.
//! 3. The next successful command clears the latch.

use log::{error, info};

use crate::config::SystemConfig;
use crate::control::ControllerState;

/// Outcome of one fail-safe evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailSafeCheck {
    /// A command arrived recently enough.
    Fresh,
    /// The command channel has been silent past the timeout.
    Stale {
        silent_ms: u64,
        /// True on the first stale pass of this outage.
        newly_engaged: bool,
    },
}

/// Tracks command recency and authorises forcing the pump off.
pub struct FailSafeTimer {
    timeout_ms: u64,
    /// Latched while the channel is stale.
    engaged: bool,
}

impl FailSafeTimer {
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_timeout(config.failsafe_timeout_ms)
    }

    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            engaged: false,
        }
    }

    /// Record a successful, well-formed command fetch.
    /// Returns `true` if this ends an engaged fail-safe.
    pub fn record_command(&mut self, state: &mut ControllerState, now_ms: u64) -> bool {
        state.last_command_received_at_ms = now_ms;
        if self.engaged {
            self.engaged = false;
            info!("FAIL-SAFE CLEARED: command channel restored");
            return true;
        }
        false
    }

    /// Evaluate command recency at `now_ms`.
    pub fn check(&mut self, state: &ControllerState, now_ms: u64) -> FailSafeCheck {
        let silent_ms = now_ms.saturating_sub(state.last_command_received_at_ms);
        if silent_ms <= self.timeout_ms {
            return FailSafeCheck::Fresh;
        }

        let newly_engaged = !self.engaged;
        if newly_engaged {
            error!(
                "FAIL-SAFE ENGAGED: no command for {} ms (limit {} ms)",
                silent_ms, self.timeout_ms
            );
        }
        self.engaged = true;
        FailSafeCheck::Stale {
            silent_ms,
            newly_engaged,
        }
    }

    /// True while the timer is holding the pump off.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}
