//! Outbound application events.
//!
//! The [`IrrigationService`](super::service::IrrigationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them.

use crate::control::PumpState;
use crate::error::Fault;
use crate::sensors::SensorSample;

use super::commands::RemoteCommand;

/// Why the pump state was (re)applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpReason {
    /// Output of the pump controller for a control cycle.
    Decision,
    /// Forced OFF by the command fail-safe.
    FailSafe,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started; the pump has been driven OFF.
    Started,

    /// Per-cycle snapshot: sample (if any), applied pump state, counters.
    Telemetry(TelemetryData),

    /// A well-formed command was received.
    CommandReceived(RemoteCommand),

    /// The applied pump state changed.
    PumpChanged {
        from: PumpState,
        to: PumpState,
        reason: PumpReason,
    },

    /// A recoverable fault occurred.
    Fault(Fault),

    /// The command channel recovered after the fail-safe engaged.
    FailSafeCleared,
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub sample: Option<SensorSample>,
    pub pump: PumpState,
    pub stats: ServiceStats,
}

/// Runtime counters since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub cycles: u64,
    pub commands_received: u64,
    pub sensor_faults: u32,
    pub telemetry_failures: u32,
    pub command_network_faults: u32,
    pub command_protocol_faults: u32,
    pub failsafe_trips: u32,
}
