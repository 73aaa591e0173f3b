//! Fault taxonomy for the irrigation firmware.
//!
//! Every collaborator failure funnels into [`Fault`], which the control
//! loop logs, counts, and recovers from locally.  None of these are fatal:
//! the worst outcome is the pump being held in its previous state or
//! forced OFF.  All variants are `Copy` so they pass through the service
//! and event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level fault
// ---------------------------------------------------------------------------

/// One recoverable fault observed during a control pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Sensor read failed or produced an implausible value.
    Sensor(SensorError),
    /// A telemetry or command request failed at the transport level.
    Network(NetworkError),
    /// The command payload was malformed or incomplete.
    Protocol(ProtocolError),
    /// No well-formed command arrived within the fail-safe timeout.
    StaleCommand { silent_ms: u64 },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::StaleCommand { silent_ms } => {
                write!(f, "no command for {silent_ms} ms")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// DHT11 did not answer the start pulse or stalled mid-frame.
    Timeout,
    /// DHT11 frame checksum did not match.
    Checksum,
    /// GPIO read/write on the sensor bus failed.
    GpioFailed,
    /// ADC read returned an error.
    AdcReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "sensor timed out"),
            Self::Checksum => write!(f, "frame checksum mismatch"),
            Self::GpioFailed => write!(f, "GPIO access failed"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Fault {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Network errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// Could not open the HTTP connection.
    Connect,
    /// Request write or response read failed mid-flight.
    Transport,
    /// Server answered with an unexpected status code.
    HttpStatus(u16),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Transport => write!(f, "transport I/O failed"),
            Self::HttpStatus(code) => write!(f, "HTTP status {code}"),
        }
    }
}

impl From<NetworkError> for Fault {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Response had no body.
    EmptyBody,
    /// Response body exceeded the receive buffer.
    BodyTooLarge,
    /// Body is not syntactically valid JSON.
    NotJson,
    /// A required field is missing or has the wrong type/value.
    InvalidField,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "empty body"),
            Self::BodyTooLarge => write!(f, "body too large"),
            Self::NotJson => write!(f, "body is not JSON"),
            Self::InvalidField => write!(f, "missing or invalid field"),
        }
    }
}

impl From<ProtocolError> for Fault {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Command fetch errors
// ---------------------------------------------------------------------------

/// Failure modes of a command poll.  Both are handled identically by the
/// control loop ("no command this tick") but are counted separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    Network(NetworkError),
    Protocol(ProtocolError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "{e}"),
            Self::Protocol(e) => write!(f, "{e}"),
        }
    }
}

impl From<NetworkError> for CommandError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

impl From<ProtocolError> for CommandError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<CommandError> for Fault {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::Network(n) => Self::Network(n),
            CommandError::Protocol(p) => Self::Protocol(p),
        }
    }
}
