//! Application service — the hexagonal core.
//!
//! [`IrrigationService`] owns the pump controller, the command fail-safe,
//! and the controller state.  All I/O flows through port traits injected at
//! call sites, making the whole control loop testable with mock adapters.
//!
//! ```text
//!  SensorPort ───▶ ┌─────────────────────────────┐ ──▶ EventSink
//! CommandPort ───▶ │      IrrigationService      │
//! TelemetryPort ◀──│  PumpController · FailSafe  │
//! ActuatorPort ◀───└─────────────────────────────┘
//! ```
//!
//! Every loop pass calls [`IrrigationService::poll`].  When the send
//! interval has elapsed the pass runs a full control cycle, in order:
//!
//! 1. read sensors
//! 2. send telemetry (best-effort)
//! 3. fetch the remote command
//! 4. stamp the fail-safe on success
//! 5. decide
//! 6. actuate
//!
//! The fail-safe check then runs on **every** pass, cycle or not, and may
//! override step 6 by forcing the pump OFF.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::pump::PumpController;
use crate::control::{ControllerState, PumpState};
use crate::error::{CommandError, Fault};
use crate::safety::{FailSafeCheck, FailSafeTimer};
use crate::sensors::SensorSample;

use super::commands::RemoteCommand;
use super::events::{AppEvent, PumpReason, ServiceStats, TelemetryData};
use super::ports::{ActuatorPort, CommandPort, EventSink, SensorPort, TelemetryPort};

// ───────────────────────────────────────────────────────────────
// IrrigationService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct IrrigationService {
    controller: PumpController,
    failsafe: FailSafeTimer,
    state: ControllerState,
    send_interval_ms: u64,
    /// Uptime at which the last control cycle started.
    last_cycle_ms: Option<u64>,
    stats: ServiceStats,
}

impl IrrigationService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the pump — call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            controller: PumpController::new(config.moisture_threshold_percent),
            failsafe: FailSafeTimer::new(config),
            state: ControllerState::new(),
            send_interval_ms: config.send_interval_ms,
            last_cycle_ms: None,
            stats: ServiceStats::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the pump to its startup state (OFF) and announce readiness.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.apply_pump(PumpState::Off);
        self.state = ControllerState::new();
        sink.emit(&AppEvent::Started);
        info!(
            "IrrigationService started (threshold={:.1}%, interval={}ms, failsafe={}ms)",
            self.controller.threshold(),
            self.send_interval_ms,
            self.failsafe.timeout_ms()
        );
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one loop pass at `now_ms`: a control cycle if one is due, then
    /// the fail-safe check.  Returns `true` if a control cycle ran.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; `net` satisfies both network ports.
    pub fn poll(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        net: &mut (impl TelemetryPort + CommandPort),
        sink: &mut impl EventSink,
    ) -> bool {
        let ran = self.cycle_due(now_ms);
        if ran {
            self.run_cycle(now_ms, hw, net, sink);
        }
        self.enforce_failsafe(now_ms, hw, sink);
        ran
    }

    /// Run one full control cycle unconditionally.
    pub fn run_cycle(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        net: &mut (impl TelemetryPort + CommandPort),
        sink: &mut impl EventSink,
    ) {
        self.last_cycle_ms = Some(now_ms);
        self.stats.cycles += 1;

        // 1. Sensors; a soil reading survives an ambient sensor fault
        let (sample, moisture) = match hw.read(now_ms) {
            Ok(s) => (Some(s), Some(s.moisture_percent)),
            Err(failure) => {
                warn!("Sensor read failed: {}", failure.error);
                self.stats.sensor_faults += 1;
                sink.emit(&AppEvent::Fault(failure.error.into()));
                (None, failure.moisture_percent)
            }
        };

        // 2. Telemetry — never gates the rest of the cycle
        if let Some(s) = &sample {
            self.report(s, net, sink);
        }

        // 3 + 4. Command poll; only a well-formed command feeds the fail-safe
        let command = self.fetch_command(now_ms, net, sink);

        // 5. Decide
        let next = self
            .controller
            .decide_on_moisture(moisture, command.as_ref(), &self.state);

        // 6. Actuate
        self.apply(next, PumpReason::Decision, hw, sink);

        sink.emit(&AppEvent::Telemetry(TelemetryData {
            sample,
            pump: self.state.last_pump_state,
            stats: self.stats,
        }));
    }

    /// Force the pump OFF if the command channel has been silent too long.
    /// Runs on every pass, independently of the control cycle.
    pub fn enforce_failsafe(
        &mut self,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if let FailSafeCheck::Stale {
            silent_ms,
            newly_engaged,
        } = self.failsafe.check(&self.state, now_ms)
        {
            if newly_engaged {
                self.stats.failsafe_trips += 1;
                sink.emit(&AppEvent::Fault(Fault::StaleCommand { silent_ms }));
            }
            self.apply(PumpState::Off, PumpReason::FailSafe, hw, sink);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Pump state last handed to the actuator.
    pub fn pump_state(&self) -> PumpState {
        self.state.last_pump_state
    }

    pub fn controller_state(&self) -> ControllerState {
        self.state
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats
    }

    /// True while the fail-safe is holding the pump off.
    pub fn is_failsafe_engaged(&self) -> bool {
        self.failsafe.is_engaged()
    }

    // ── Internal ──────────────────────────────────────────────

    fn cycle_due(&self, now_ms: u64) -> bool {
        match self.last_cycle_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.send_interval_ms,
        }
    }

    fn report(
        &mut self,
        sample: &SensorSample,
        net: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) {
        match net.send(sample) {
            Ok(()) => debug!("Telemetry delivered"),
            Err(e) => {
                warn!("Telemetry send failed: {}", e);
                self.stats.telemetry_failures += 1;
                sink.emit(&AppEvent::Fault(e.into()));
            }
        }
    }

    fn fetch_command(
        &mut self,
        now_ms: u64,
        net: &mut impl CommandPort,
        sink: &mut impl EventSink,
    ) -> Option<RemoteCommand> {
        match net.fetch() {
            Ok(cmd) => {
                self.stats.commands_received += 1;
                if self.failsafe.record_command(&mut self.state, now_ms) {
                    sink.emit(&AppEvent::FailSafeCleared);
                }
                sink.emit(&AppEvent::CommandReceived(cmd));
                Some(cmd)
            }
            Err(e) => {
                warn!("Command fetch failed: {}", e);
                match e {
                    CommandError::Network(_) => self.stats.command_network_faults += 1,
                    CommandError::Protocol(_) => self.stats.command_protocol_faults += 1,
                }
                sink.emit(&AppEvent::Fault(e.into()));
                None
            }
        }
    }

    /// Hand `to` to the actuator and record it as the applied state.
    fn apply(
        &mut self,
        to: PumpState,
        reason: PumpReason,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let from = self.state.last_pump_state;
        hw.apply_pump(to);
        self.state.last_pump_state = to;
        if from != to {
            info!("Pump {} -> {} ({:?})", from, to, reason);
            sink.emit(&AppEvent::PumpChanged { from, to, reason });
        }
    }
}
