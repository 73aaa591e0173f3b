//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match &t.sample {
                Some(s) => info!(
                    "TELEM | T={:.1}\u{00b0}C RH={:.0}% soil={:.0}% | pump={} | \
                     cycles={} cmds={} faults(sensor={} tx={} net={} proto={}) trips={}",
                    s.temperature_c,
                    s.humidity_percent,
                    s.moisture_percent,
                    t.pump,
                    t.stats.cycles,
                    t.stats.commands_received,
                    t.stats.sensor_faults,
                    t.stats.telemetry_failures,
                    t.stats.command_network_faults,
                    t.stats.command_protocol_faults,
                    t.stats.failsafe_trips,
                ),
                None => info!(
                    "TELEM | no sample | pump={} | cycles={} sensor_faults={}",
                    t.pump, t.stats.cycles, t.stats.sensor_faults,
                ),
            },
            AppEvent::CommandReceived(cmd) => {
                info!(
                    "CMD   | mode={:?} state={} safety={}",
                    cmd.mode, cmd.state, cmd.safety_active
                );
            }
            AppEvent::PumpChanged { from, to, reason } => {
                info!("PUMP  | {} -> {} ({:?})", from, to, reason);
            }
            AppEvent::Fault(fault) => {
                warn!("FAULT | {}", fault);
            }
            AppEvent::FailSafeCleared => {
                info!("FAULT | command channel restored");
            }
            AppEvent::Started => {
                info!("START | pump=OFF");
            }
        }
    }
}
