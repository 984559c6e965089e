//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them (serial log, network push, ...).

use crate::state::{ActionSource, ButtonId, RelayId, RelayPosition};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller finished its boot sequence.
    Started,

    /// A debounced press edge was resolved.
    ButtonPressed(ButtonId),

    /// A relay pulse completed.
    RelayChanged {
        relay: RelayId,
        position: RelayPosition,
        source: ActionSource,
        sequence: u32,
    },

    /// Brightness configuration changed.
    BrightnessChanged { pct: u8, sequence: u32 },

    /// Blink configuration changed.
    BlinkChanged {
        enabled: bool,
        hz: f32,
        sequence: u32,
    },

    /// A command was dropped by input validation.
    CommandIgnored(&'static str),
}
