//! Inbound commands to the application service.
//!
//! These represent the command surface: actions requested by buttons or
//! by a remote transport that the [`AppService`](super::service::AppService)
//! arbitrates onto the device state. Fields carry raw values; range
//! handling (ignore invalid ids, clamp brightness, reject bad frequencies)
//! happens in the service.

use crate::state::ActionSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Drive relay `id` to `on` if it is not already there.
    SetRelay {
        id: i64,
        on: bool,
        source: ActionSource,
    },

    /// Flip relay `id` (attributed to the remote source).
    ToggleRelay { id: i64 },

    /// Set the light brightness; clamped to 0–100 %.
    SetBrightness { pct: i64 },

    /// Update blink settings. `None` keeps the current value; an invalid
    /// `hz` is ignored while `enabled` is still applied.
    SetBlink {
        enabled: Option<bool>,
        hz: Option<f32>,
    },
}
