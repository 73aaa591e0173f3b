//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IrrigationService (domain)
//! ```
//!
//! Driven adapters (sensors, relay, HTTP, event sinks, clock) implement
//! these traits.  The [`IrrigationService`](super::service::IrrigationService)
//! consumes them via generics, so the domain core never touches hardware
//! or the network directly.
//!
//! All calls are blocking; the service invokes them strictly in cycle
//! order (sample → telemetry → command → actuate).

use crate::control::PumpState;
use crate::error::{CommandError, NetworkError};
use crate::sensors::{SensorFailure, SensorSample};

use super::commands::RemoteCommand;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per control cycle.
pub trait SensorPort {
    /// Read every sensor and return a sample stamped with `now_ms`.
    /// On failure, report the soil moisture if that probe still read.
    fn read(&mut self, now_ms: u64) -> Result<SensorSample, SensorFailure>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the only path to the physical pump.
pub trait ActuatorPort {
    /// Apply `state` to the pump.  Idempotent.
    fn apply_pump(&mut self, state: PumpState);
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → remote service)
// ───────────────────────────────────────────────────────────────

/// Best-effort delivery of a sample to the backend.  The result is only
/// logged; it never gates the rest of the cycle.
pub trait TelemetryPort {
    fn send(&mut self, sample: &SensorSample) -> Result<(), NetworkError>;
}

// ───────────────────────────────────────────────────────────────
// Command port (driven adapter: remote service → domain)
// ───────────────────────────────────────────────────────────────

/// Fetch and parse the current remote command.
///
/// Implementations must not synthesise defaults: a payload missing any
/// required field is a [`ProtocolError`](crate::error::ProtocolError).
pub trait CommandPort {
    fn fetch(&mut self) -> Result<RemoteCommand, CommandError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, display,
/// etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.
pub trait TimePort {
    fn now_ms(&self) -> u64;
}
