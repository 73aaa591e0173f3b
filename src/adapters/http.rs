//! HTTP adapter for the backend service.
//!
//! Implements [`TelemetryPort`] (POST `/api/esp32`) and [`CommandPort`]
//! (GET `/api/pump`).  Each call opens a fresh connection; nothing is kept
//! alive between cycles.
//!
//! - **`target_os = "espidf"`** — `esp_idf_svc::http::client::EspHttpConnection`
//!   driven through the `embedded_svc` client traits.
//! - **`not(target_os = "espidf")`** — a scripted exchange for host tests:
//!   queued responses are served in order, sent telemetry bodies are kept.
//!
//! Status and body classification is shared by both targets.

use crate::app::commands::RemoteCommand;
use crate::app::ports::{CommandPort, TelemetryPort};
use crate::config::SystemConfig;
use crate::error::{CommandError, NetworkError, ProtocolError};
use crate::protocol;
use crate::sensors::SensorSample;

// ───────────────────────────────────────────────────────────────
// Response classification
// ───────────────────────────────────────────────────────────────

/// Any 2xx acknowledges a telemetry POST.
pub fn check_telemetry_status(status: u16) -> Result<(), NetworkError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(NetworkError::HttpStatus(status))
    }
}

/// Turn a command poll response into a command.  Only `200` carries one.
pub fn decode_command_response(
    status: u16,
    body: &[u8],
    max_body: usize,
) -> Result<RemoteCommand, CommandError> {
    if status != 200 {
        return Err(NetworkError::HttpStatus(status).into());
    }
    if body.len() > max_body {
        return Err(ProtocolError::BodyTooLarge.into());
    }
    Ok(protocol::parse_command(body)?)
}

// ───────────────────────────────────────────────────────────────
// HttpAdapter (espidf)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
use embedded_svc::http::client::Client;
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

#[cfg(target_os = "espidf")]
pub struct HttpAdapter {
    telemetry_url: heapless::String<{ crate::config::URL_CAP }>,
    command_url: heapless::String<{ crate::config::URL_CAP }>,
    max_body: usize,
}

#[cfg(target_os = "espidf")]
impl HttpAdapter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            telemetry_url: config.telemetry_url.clone(),
            command_url: config.command_url.clone(),
            max_body: config.max_command_body_bytes,
        }
    }

    fn client() -> Result<Client<EspHttpConnection>, NetworkError> {
        let conn = EspHttpConnection::new(&Configuration::default()).map_err(|e| {
            log::warn!("HTTP: connection setup failed: {}", e);
            NetworkError::Connect
        })?;
        Ok(Client::wrap(conn))
    }
}

#[cfg(target_os = "espidf")]
impl TelemetryPort for HttpAdapter {
    fn send(&mut self, sample: &SensorSample) -> Result<(), NetworkError> {
        use embedded_svc::http::Status;
        use embedded_svc::io::Write;

        let body = protocol::encode_telemetry(sample);
        let len = body.len().to_string();
        let headers = [
            ("Content-Type", "application/json"),
            ("Content-Length", len.as_str()),
        ];

        let mut client = Self::client()?;
        let mut req = client
            .post(self.telemetry_url.as_str(), &headers)
            .map_err(|_| NetworkError::Connect)?;
        req.write_all(&body).map_err(|_| NetworkError::Transport)?;
        req.flush().map_err(|_| NetworkError::Transport)?;
        let resp = req.submit().map_err(|_| NetworkError::Transport)?;
        check_telemetry_status(resp.status())
    }
}

#[cfg(target_os = "espidf")]
impl CommandPort for HttpAdapter {
    fn fetch(&mut self) -> Result<RemoteCommand, CommandError> {
        use embedded_svc::http::Status;
        use embedded_svc::io::Read;

        let mut client = Self::client()?;
        let req = client
            .get(self.command_url.as_str())
            .map_err(|_| NetworkError::Connect)?;
        let mut resp = req.submit().map_err(|_| NetworkError::Transport)?;
        let status = resp.status();

        // Read one byte past the limit so an oversized body is detectable.
        let mut body = vec![0u8; self.max_body + 1];
        let mut filled = 0;
        while filled < body.len() {
            match resp.read(&mut body[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(_) => return Err(NetworkError::Transport.into()),
            }
        }
        decode_command_response(status, &body[..filled], self.max_body)
    }
}

// ───────────────────────────────────────────────────────────────
// HttpAdapter (host simulation)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

/// One scripted exchange: a status and body, or a transport failure.
#[cfg(not(target_os = "espidf"))]
pub type SimResponse = Result<(u16, Vec<u8>), NetworkError>;

#[cfg(not(target_os = "espidf"))]
pub struct HttpAdapter {
    max_body: usize,
    telemetry_responses: VecDeque<SimResponse>,
    command_responses: VecDeque<SimResponse>,
    sent: Vec<Vec<u8>>,
}

#[cfg(not(target_os = "espidf"))]
impl HttpAdapter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            max_body: config.max_command_body_bytes,
            telemetry_responses: VecDeque::new(),
            command_responses: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    /// Queue the next telemetry POST outcome.  With nothing queued the
    /// POST succeeds with `200`.
    pub fn sim_push_telemetry(&mut self, response: SimResponse) {
        self.telemetry_responses.push_back(response);
    }

    /// Queue the next command GET outcome.  With nothing queued the GET
    /// fails with [`NetworkError::Connect`].
    pub fn sim_push_command(&mut self, response: SimResponse) {
        self.command_responses.push_back(response);
    }

    /// Telemetry bodies POSTed so far.
    pub fn sim_sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

#[cfg(not(target_os = "espidf"))]
impl TelemetryPort for HttpAdapter {
    fn send(&mut self, sample: &SensorSample) -> Result<(), NetworkError> {
        let (status, _) = self
            .telemetry_responses
            .pop_front()
            .unwrap_or(Ok((200, Vec::new())))?;
        self.sent.push(protocol::encode_telemetry(sample));
        check_telemetry_status(status)
    }
}

#[cfg(not(target_os = "espidf"))]
impl CommandPort for HttpAdapter {
    fn fetch(&mut self) -> Result<RemoteCommand, CommandError> {
        let (status, body) = self
            .command_responses
            .pop_front()
            .unwrap_or(Err(NetworkError::Connect))?;
        decode_command_response(status, &body, self.max_body)
    }
}
