//! Integration tests for the IrrigationService control cycle.
//!
//! Drives the service through `poll` against mock adapters and checks the
//! cycle ordering, the AUTO / MANUAL / safety decisions, and how each fault
//! class is absorbed without stopping the loop.

use super::mock_hw::{new_trace, Call, MockBackend, MockHardware, RecordingSink, Trace};

use irrigation::app::commands::RemoteCommand;
use irrigation::app::events::{AppEvent, PumpReason};
use irrigation::app::service::IrrigationService;
use irrigation::config::SystemConfig;
use irrigation::control::PumpState;
use irrigation::error::{CommandError, Fault, NetworkError, ProtocolError, SensorError};

struct Rig {
    app: IrrigationService,
    hw: MockHardware,
    net: MockBackend,
    sink: RecordingSink,
    trace: Trace,
}

fn make_rig(moisture: f32, command: RemoteCommand) -> Rig {
    let trace = new_trace();
    let mut rig = Rig {
        app: IrrigationService::new(&SystemConfig::default()),
        hw: MockHardware::new(trace.clone(), moisture),
        net: MockBackend::new(trace.clone(), command),
        sink: RecordingSink::new(),
        trace,
    };
    rig.app.start(&mut rig.hw, &mut rig.sink);
    rig.trace.borrow_mut().clear();
    rig
}

impl Rig {
    fn poll(&mut self, now_ms: u64) -> bool {
        self.app
            .poll(now_ms, &mut self.hw, &mut self.net, &mut self.sink)
    }
}

// ── Decision scenarios ────────────────────────────────────────

#[test]
fn dry_soil_in_auto_runs_pump() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.poll(0);
    assert_eq!(rig.hw.pump(), Some(PumpState::On));
    assert_eq!(rig.app.pump_state(), PumpState::On);
}

#[test]
fn wet_soil_in_auto_keeps_pump_off() {
    let mut rig = make_rig(50.0, RemoteCommand::auto());
    rig.poll(0);
    assert_eq!(rig.hw.pump(), Some(PumpState::Off));
}

#[test]
fn safety_overrides_manual_on() {
    let mut rig = make_rig(10.0, RemoteCommand::manual(PumpState::On).with_safety(true));
    rig.poll(0);
    assert_eq!(rig.hw.pump(), Some(PumpState::Off));
}

#[test]
fn manual_mode_ignores_moisture() {
    let mut rig = make_rig(90.0, RemoteCommand::manual(PumpState::On));
    rig.poll(0);
    assert_eq!(rig.hw.pump(), Some(PumpState::On));

    rig.net.command = Ok(RemoteCommand::manual(PumpState::Off));
    rig.hw.moisture = Some(5.0);
    rig.poll(5_000);
    assert_eq!(rig.hw.pump(), Some(PumpState::Off));
}

#[test]
fn malformed_command_keeps_previous_state_for_the_tick() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.poll(0);
    assert_eq!(rig.app.pump_state(), PumpState::On);

    // Soil is now wet, but without a command the decision is not re-run.
    rig.hw.moisture = Some(80.0);
    rig.net.command = Err(CommandError::Protocol(ProtocolError::InvalidField));
    rig.poll(5_000);

    assert_eq!(rig.hw.pump(), Some(PumpState::On));
    assert_eq!(rig.app.stats().command_protocol_faults, 1);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::Fault(Fault::Protocol(ProtocolError::InvalidField))
        )),
        1
    );
}

// ── Cycle order and cadence ───────────────────────────────────

#[test]
fn cycle_runs_sample_telemetry_command_actuate_in_order() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.poll(0);
    assert_eq!(
        *rig.trace.borrow(),
        vec![Call::Read, Call::Send, Call::Fetch, Call::Apply(PumpState::On)]
    );
}

#[test]
fn no_cycle_between_intervals() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    assert!(rig.poll(0));
    rig.trace.borrow_mut().clear();

    for t in (50..5_000).step_by(50) {
        assert!(!rig.poll(t), "cycle ran early at {t} ms");
    }
    assert!(rig.trace.borrow().is_empty());
    assert!(rig.poll(5_000));
    assert_eq!(rig.app.stats().cycles, 2);
}

#[test]
fn late_poll_runs_one_cycle_not_a_backlog() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.poll(0);
    assert!(rig.poll(12_000));
    assert!(!rig.poll(12_050));
    assert!(rig.poll(17_000));
    assert_eq!(rig.app.stats().cycles, 3);
}

// ── Fault handling ────────────────────────────────────────────

#[test]
fn sensor_fault_skips_telemetry_but_still_polls_command() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.hw.moisture = None;
    rig.poll(0);

    assert_eq!(
        *rig.trace.borrow(),
        vec![Call::Read, Call::Fetch, Call::Apply(PumpState::Off)]
    );
    assert!(rig.net.sent.is_empty());
    assert_eq!(rig.app.stats().sensor_faults, 1);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Fault(Fault::Sensor(SensorError::Timeout)))),
        1
    );
}

#[test]
fn sensor_fault_in_auto_retains_running_pump() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.poll(0);
    rig.hw.moisture = None;
    rig.poll(5_000);
    assert_eq!(rig.hw.pump(), Some(PumpState::On));
}

#[test]
fn ambient_fault_keeps_auto_on_soil_moisture() {
    let mut rig = make_rig(2.0, RemoteCommand::auto());
    rig.hw.ambient_ok = false;
    for cycle in 0..4u64 {
        rig.poll(cycle * 5_000);
    }

    assert_eq!(rig.hw.pump(), Some(PumpState::On));
    assert!(rig.net.sent.is_empty());
    assert_eq!(rig.app.stats().sensor_faults, 4);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Telemetry(t) if t.sample.is_none())),
        4
    );

    rig.hw.moisture = Some(75.0);
    rig.poll(20_000);
    assert_eq!(rig.hw.pump(), Some(PumpState::Off));
}

#[test]
fn sensor_fault_does_not_block_manual_or_safety() {
    let mut rig = make_rig(20.0, RemoteCommand::manual(PumpState::On));
    rig.hw.moisture = None;
    rig.poll(0);
    assert_eq!(rig.hw.pump(), Some(PumpState::On));

    rig.net.command = Ok(RemoteCommand::auto().with_safety(true));
    rig.poll(5_000);
    assert_eq!(rig.hw.pump(), Some(PumpState::Off));
}

#[test]
fn telemetry_failure_does_not_gate_the_cycle() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.net.telemetry = Err(NetworkError::HttpStatus(500));
    rig.poll(0);

    assert_eq!(rig.hw.pump(), Some(PumpState::On));
    assert_eq!(rig.app.stats().telemetry_failures, 1);
    assert_eq!(rig.app.stats().commands_received, 1);
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn pump_change_emits_one_event_per_transition() {
    let mut rig = make_rig(20.0, RemoteCommand::auto());
    rig.poll(0);
    rig.poll(5_000);
    rig.hw.moisture = Some(45.0);
    rig.poll(10_000);

    let changes: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PumpChanged { from, to, reason } => Some((*from, *to, *reason)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (PumpState::Off, PumpState::On, PumpReason::Decision),
            (PumpState::On, PumpState::Off, PumpReason::Decision),
        ]
    );
}

#[test]
fn every_cycle_emits_telemetry_snapshot() {
    let mut rig = make_rig(33.0, RemoteCommand::auto());
    rig.poll(0);
    rig.hw.moisture = None;
    rig.poll(5_000);

    let snaps: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(snaps.len(), 2);
    assert_eq!(snaps[0].sample.map(|s| s.moisture_percent), Some(33.0));
    assert!(snaps[1].sample.is_none());
    assert_eq!(snaps[1].stats.cycles, 2);
}
