//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::state::ButtonId;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged since boot.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            AppEvent::Started => {
                info!("START | relays OFF, light dark");
            }
            AppEvent::ButtonPressed(button) => {
                let n = match button {
                    ButtonId::One => 1,
                    ButtonId::Two => 2,
                };
                info!("INPUT | button {} pressed", n);
            }
            AppEvent::RelayChanged {
                relay,
                position,
                source,
                sequence,
            } => {
                info!(
                    "RELAY | R{} -> {} | src={} | seq={}",
                    relay.number(),
                    position,
                    source,
                    sequence
                );
            }
            AppEvent::BrightnessChanged { pct, sequence } => {
                info!("LIGHT | brightness={}% | seq={}", pct, sequence);
            }
            AppEvent::BlinkChanged {
                enabled,
                hz,
                sequence,
            } => {
                info!(
                    "LIGHT | blink={} @ {:.1}Hz | seq={}",
                    if *enabled { "ON" } else { "OFF" },
                    hz,
                    sequence
                );
            }
            AppEvent::CommandIgnored(reason) => {
                warn!("CMD   | ignored: {}", reason);
            }
        }
    }
}
