//! System configuration parameters
//!
//! All tunable parameters for the irrigation controller.  Values are fixed
//! at build time; the backend address can be overridden with the
//! `IRRIGATION_BACKEND_URL` environment variable when compiling.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a configured endpoint URL.
pub const URL_CAP: usize = 96;

/// Backend base address (scheme + host + port, no trailing slash).
pub const BACKEND_URL: &str = match option_env!("IRRIGATION_BACKEND_URL") {
    Some(url) => url,
    None => "http://192.168.1.7:5000",
};

/// Path the device POSTs sensor telemetry to.
pub const TELEMETRY_PATH: &str = "/api/esp32";
/// Path the device polls for the current pump command.
pub const COMMAND_PATH: &str = "/api/pump";

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Control ---
    /// AUTO mode turns the pump on when moisture is strictly below this (0-100%)
    pub moisture_threshold_percent: f32,

    // --- Timing ---
    /// Sample / report / command / decide cycle period (milliseconds)
    pub send_interval_ms: u64,
    /// Maximum silence on the command channel before the pump is forced off (milliseconds)
    pub failsafe_timeout_ms: u64,
    /// Main loop polling granularity; bounds fail-safe reaction latency (milliseconds)
    pub poll_interval_ms: u64,

    // --- Remote service ---
    pub telemetry_url: heapless::String<URL_CAP>,
    pub command_url: heapless::String<URL_CAP>,
    /// Largest command response body accepted (bytes)
    pub max_command_body_bytes: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Control
            moisture_threshold_percent: 30.0,

            // Timing
            send_interval_ms: 5_000,
            failsafe_timeout_ms: 20_000,
            poll_interval_ms: 50,

            // Remote service
            telemetry_url: endpoint(TELEMETRY_PATH),
            command_url: endpoint(COMMAND_PATH),
            max_command_body_bytes: 256,
        }
    }
}

/// Join [`BACKEND_URL`] and `path`.  An over-long result is left empty so
/// that [`SystemConfig::validate`] rejects it at boot.
fn endpoint(path: &str) -> heapless::String<URL_CAP> {
    let mut url = heapless::String::new();
    if url.push_str(BACKEND_URL).is_err() || url.push_str(path).is_err() {
        url.clear();
    }
    url
}

/// A config field failed range validation.
/// The `&'static str` describes which field and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigError(pub &'static str);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.0)
    }
}

impl core::error::Error for ConfigError {}

impl SystemConfig {
    /// Reject values that would break the control loop's guarantees.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.moisture_threshold_percent;
        if !t.is_finite() || t <= 0.0 || t > 100.0 {
            return Err(ConfigError("moisture threshold must be in (0, 100]"));
        }
        if self.send_interval_ms == 0 {
            return Err(ConfigError("send interval must be non-zero"));
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.send_interval_ms {
            return Err(ConfigError("poll interval must be in (0, send interval]"));
        }
        // A timeout at or below the send interval would trip between two
        // successful polls.
        if self.failsafe_timeout_ms <= self.send_interval_ms {
            return Err(ConfigError("fail-safe timeout must exceed the send interval"));
        }
        if self.telemetry_url.is_empty() || self.command_url.is_empty() {
            return Err(ConfigError("endpoint URL missing or too long"));
        }
        if self.max_command_body_bytes == 0 {
            return Err(ConfigError("command body limit must be non-zero"));
        }
        Ok(())
    }
}
