//! JSON wire formats exchanged with the backend.
//!
//! | Direction | Route        | Body                                            |
//! |-----------|--------------|-------------------------------------------------|
//! | POST      | `/api/esp32` | `{"temperature":n,"humidity":n,"moisture":n}`   |
//! | GET       | `/api/pump`  | `{"state":"ON"\|"OFF","mode":"AUTO"\|"MANUAL","safetyActive":b}` |
//!
//! Command parsing is strict about the three required fields and lenient
//! about anything extra the backend might add.

use serde::{Deserialize, Serialize};

use crate::app::commands::RemoteCommand;
use crate::error::ProtocolError;
use crate::sensors::SensorSample;

/// Telemetry body as the backend expects it.
#[derive(Debug, Serialize)]
struct TelemetryReport {
    temperature: f32,
    humidity: f32,
    moisture: f32,
}

impl From<&SensorSample> for TelemetryReport {
    fn from(s: &SensorSample) -> Self {
        Self {
            temperature: s.temperature_c,
            humidity: s.humidity_percent,
            moisture: s.moisture_percent,
        }
    }
}

/// Serialise a sample into the telemetry request body.
pub fn encode_telemetry(sample: &SensorSample) -> Vec<u8> {
    // A struct of three f32 fields cannot fail to serialise.
    serde_json::to_vec(&TelemetryReport::from(sample)).unwrap_or_default()
}

/// Parse a command poll response body.
pub fn parse_command(body: &[u8]) -> Result<RemoteCommand, ProtocolError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ProtocolError::EmptyBody);
    }
    // Two stages so that a well-formed document with a mistyped field is
    // never reported as a syntax error.
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ProtocolError::NotJson)?;
    RemoteCommand::deserialize(value).map_err(|_| ProtocolError::InvalidField)
}
