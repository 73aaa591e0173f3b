//! WiFi station-mode adapter.
//!
//! Credentials are baked in at build time from the `WIFI_SSID` and
//! `WIFI_PASS` environment variables and validated before the radio is
//! touched.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: [`WifiLink`] wraps `esp_idf_svc::wifi` in
//!   blocking mode.
//! - **all other targets**: only credential validation is compiled; the
//!   host simulation talks to scripted network adapters instead.
//!
//! ## Link loss
//!
//! The link is brought up once at boot and held for the life of the
//! process.  If it drops, HTTP calls fail and surface as network faults;
//! the command fail-safe then takes the pump OFF.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

pub const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(s) => s,
    None => "",
};

pub const WIFI_PASS: &str = match option_env!("WIFI_PASS") {
    Some(s) => s,
    None => "",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured (set WIFI_SSID)"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
        }
    }
}

impl core::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// Check a credential pair before handing it to the driver.
pub fn validate_credentials(ssid: &str, password: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() {
        return Err(ConnectivityError::NoCredentials);
    }
    validate_ssid(ssid)?;
    validate_password(password)
}

// ───────────────────────────────────────────────────────────────
// WiFi link (espidf)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use link::WifiLink;

#[cfg(target_os = "espidf")]
mod link {
    use anyhow::Context;
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::info;

    use super::{validate_credentials, WIFI_PASS, WIFI_SSID};

    /// A station-mode connection to the configured access point.
    pub struct WifiLink {
        /// Dropping the driver tears the link down.
        _wifi: BlockingWifi<EspWifi<'static>>,
    }

    impl WifiLink {
        /// Bring the radio up and block until the network interface has an
        /// address.
        pub fn connect(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: EspDefaultNvsPartition,
        ) -> anyhow::Result<Self> {
            validate_credentials(WIFI_SSID, WIFI_PASS)?;

            let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
            let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

            let auth_method = if WIFI_PASS.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            wifi.set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: WIFI_SSID
                    .try_into()
                    .map_err(|_| anyhow::anyhow!("SSID does not fit driver buffer"))?,
                password: WIFI_PASS
                    .try_into()
                    .map_err(|_| anyhow::anyhow!("password does not fit driver buffer"))?,
                auth_method,
                ..Default::default()
            }))?;

            info!("WiFi: connecting to '{}'", WIFI_SSID);
            wifi.start()?;
            wifi.connect().context("WiFi association failed")?;
            wifi.wait_netif_up()?;

            let ip = wifi.wifi().sta_netif().get_ip_info()?;
            info!("WiFi: connected, ip={}", ip.ip);
            Ok(Self { _wifi: wifi })
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
