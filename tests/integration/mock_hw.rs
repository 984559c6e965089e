//! Mock board for integration tests.
//!
//! Records every actuator call so tests can assert on the full output
//! history without touching real GPIO/PWM registers. The clock is
//! simulated: it only moves when a test advances it or when the relay
//! pulse delays through [`DelayNs`].

use embedded_hal::delay::DelayNs;

use relayboard::app::events::AppEvent;
use relayboard::app::ports::{ActuatorPort, ClockPort, CoilDrive, EventSink, InputPort};
use relayboard::app::service::AppService;
use relayboard::config::SystemConfig;
use relayboard::control::debounce::Level;
use relayboard::state::{ButtonId, RelayId};

// ── Coil call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilCall {
    pub relay: RelayId,
    pub drive: CoilDrive,
    pub at_ms: u32,
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub now_ms: u32,
    pub buttons: [Level; 2],
    pub coils: Vec<CoilCall>,
    pub duties: Vec<u16>,
    pub indicator: Option<bool>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            buttons: [Level::High; 2],
            coils: Vec::new(),
            duties: Vec::new(),
            indicator: None,
        }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }

    pub fn press(&mut self, button: ButtonId) {
        self.buttons[slot(button)] = Level::Low;
    }

    pub fn release(&mut self, button: ButtonId) {
        self.buttons[slot(button)] = Level::High;
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.duties.last().copied()
    }

    /// Energised pulses on `relay` as `(drive, width_ms)`.
    pub fn pulses(&self, relay: RelayId) -> Vec<(CoilDrive, u32)> {
        let calls: Vec<&CoilCall> = self.coils.iter().filter(|c| c.relay == relay).collect();
        calls
            .windows(2)
            .filter(|w| w[0].drive != CoilDrive::Released && w[1].drive == CoilDrive::Released)
            .map(|w| (w[0].drive, w[1].at_ms.wrapping_sub(w[0].at_ms)))
            .collect()
    }

    pub fn clear_history(&mut self) {
        self.coils.clear();
        self.duties.clear();
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(button: ButtonId) -> usize {
    match button {
        ButtonId::One => 0,
        ButtonId::Two => 1,
    }
}

impl InputPort for MockBoard {
    fn sample_button(&mut self, button: ButtonId) -> Level {
        self.buttons[slot(button)]
    }
}

impl ActuatorPort for MockBoard {
    fn set_coil(&mut self, relay: RelayId, drive: CoilDrive) {
        self.coils.push(CoilCall {
            relay,
            drive,
            at_ms: self.now_ms,
        });
    }

    fn write_light_duty(&mut self, duty: u16) {
        self.duties.push(duty);
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator = Some(on);
    }
}

impl ClockPort for MockBoard {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(ns.div_ceil(1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignored(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::CommandIgnored(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Booted service on a fresh mock board, history cleared.
#[allow(dead_code)]
pub fn boot() -> (AppService, MockBoard, RecordingSink) {
    boot_with(&SystemConfig::default())
}

#[allow(dead_code)]
pub fn boot_with(config: &SystemConfig) -> (AppService, MockBoard, RecordingSink) {
    let mut app = AppService::new(config);
    let mut hw = MockBoard::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    hw.clear_history();
    sink.events.clear();
    (app, hw, sink)
}

/// Tick every `step_ms` for `total_ms`, collecting the light level after
/// each tick as `(now_ms, pct)`.
#[allow(dead_code)]
pub fn run_for(
    app: &mut AppService,
    hw: &mut MockBoard,
    sink: &mut RecordingSink,
    total_ms: u32,
    step_ms: u32,
) -> Vec<(u32, u8)> {
    let mut levels = Vec::new();
    let end = hw.now_ms.wrapping_add(total_ms);
    while hw.now_ms.wrapping_sub(end) as i32 <= 0 {
        app.tick(hw, sink);
        levels.push((hw.now_ms, app.light_level()));
        hw.advance(step_ms);
    }
    levels
}
