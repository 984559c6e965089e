//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | InputPort          | ESP32 GPIO (buttons)     |
//! |            | ActuatorPort       | Coil GPIO, LEDC, LED2    |
//! |            | ClockPort, DelayNs | ESP32 timer / FreeRTOS   |
//! | `http_api` | command surface    | ESP-IDF HTTP server      |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `mdns`     |                    | ESP-IDF mDNS responder   |
//! | `time`     | ClockPort          | ESP32 system timer       |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA         |

pub mod hardware;
pub mod http_api;
pub mod log_sink;
pub mod mdns;
pub mod time;
pub mod wifi;
