//! System configuration parameters
//!
//! All tunable parameters for the relay board. Defaults match the
//! production wiring (30 ms coil pulse, 10-bit active-low light PWM).

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::control::debounce::DEBOUNCE_MS;
use crate::control::relay::PULSE_MS;
use crate::pins;
use crate::state::is_valid_blink_hz;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Relays ---
    /// Latching coil pulse width (milliseconds, 20–50)
    pub pulse_ms: u16,

    // --- Buttons ---
    /// Debounce window (milliseconds)
    pub debounce_ms: u16,

    // --- Light ---
    /// Full-scale PWM duty level
    pub light_max_level: u16,
    /// PWM carrier frequency (Hz)
    pub light_pwm_freq_hz: u32,
    /// Output lights up on a LOW level
    pub light_active_low: bool,
    /// Brightness at boot (0-100%)
    pub boot_brightness_pct: u8,
    /// Blink frequency at boot (Hz)
    pub boot_blink_hz: f32,

    // --- Timing ---
    /// Idle time between control ticks (milliseconds)
    pub tick_interval_ms: u32,

    // --- Network ---
    /// How long to wait for WiFi association at boot (milliseconds)
    pub wifi_connect_timeout_ms: u32,
    /// mDNS hostname (advertised as `<hostname>.local`)
    pub mdns_hostname: heapless::String<24>,
    /// HTTP API port
    pub http_port: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut mdns_hostname = heapless::String::new();
        let _ = mdns_hostname.push_str("relay");

        Self {
            // Relays
            pulse_ms: PULSE_MS as u16,

            // Buttons
            debounce_ms: DEBOUNCE_MS as u16,

            // Light
            light_max_level: 1023, // 10-bit
            light_pwm_freq_hz: 1_000,
            light_active_low: true,
            boot_brightness_pct: 50,
            boot_blink_hz: 1.0,

            // Timing
            tick_interval_ms: 2,

            // Network
            wifi_connect_timeout_ms: 15_000,
            mdns_hostname,
            http_port: 80,
        }
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl SystemConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(20..=50).contains(&self.pulse_ms) {
            return Err(ConfigError::ValidationFailed("pulse_ms must be 20–50"));
        }
        if !(5..=500).contains(&self.debounce_ms) {
            return Err(ConfigError::ValidationFailed("debounce_ms must be 5–500"));
        }
        if self.light_max_level == 0 || self.light_max_level > pins::PWM_MAX_DUTY {
            return Err(ConfigError::ValidationFailed(
                "light_max_level must be 1–1023 (10-bit LEDC)",
            ));
        }
        if self.light_pwm_freq_hz == 0 {
            return Err(ConfigError::ValidationFailed("light_pwm_freq_hz must be > 0"));
        }
        if self.boot_brightness_pct > 100 {
            return Err(ConfigError::ValidationFailed(
                "boot_brightness_pct must be 0–100",
            ));
        }
        if !is_valid_blink_hz(self.boot_blink_hz) {
            return Err(ConfigError::ValidationFailed(
                "boot_blink_hz must be within (0.05, 50)",
            ));
        }
        if self.tick_interval_ms >= u32::from(self.debounce_ms) {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms must be shorter than debounce_ms",
            ));
        }
        if self.mdns_hostname.is_empty() {
            return Err(ConfigError::ValidationFailed("mdns_hostname must not be empty"));
        }
        Ok(())
    }
}
