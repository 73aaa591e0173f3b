//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                  |
//! |------------|--------------------|------------------------------|
//! | `hardware` | SensorPort         | DHT11 (GPIO), soil probe (ADC1) |
//! |            | ActuatorPort       | Pump relay (GPIO)            |
//! | `http`     | TelemetryPort      | Backend `POST /api/esp32`    |
//! |            | CommandPort        | Backend `GET /api/pump`      |
//! | `log_sink` | EventSink          | Serial log output            |
//! | `time`     | TimePort           | ESP32 system timer           |
//! | `wifi`     | —                  | ESP-IDF WiFi STA             |

pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
