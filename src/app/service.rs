//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the device state, the relay actuator, the light
//! presenter and both button debouncers. Every state change, whether it
//! comes from a button edge or a remote command, goes through this one
//! type, so the journal sequence is a total order over all changes.
//!
//! ```text
//!   InputPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService          │
//! ActuatorPort ◀──│ Debounce · Relay · Light     │
//!                 └──────────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. Remote commands: applied synchronously by [`AppService::handle_command`]
//!    from the transport callback, so there is nothing queued to drain.
//! 2. Recompute and write the light output.
//! 3. Sample and debounce both buttons.
//! 4. Toggle the bound relay for every press edge.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::debounce::ButtonDebouncer;
use crate::control::light::{BlinkPhase, LightOutputMapping, LightPresenter};
use crate::control::relay::RelayActuator;
use crate::state::{
    ActionSource, ButtonId, DeviceState, LightConfig, RelayId, StateSnapshot, is_valid_blink_hz,
};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, BoardPort, ClockPort, CoilDrive, EventSink};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    state: DeviceState,
    relays: RelayActuator,
    presenter: LightPresenter,
    mapping: LightOutputMapping,
    buttons: [ButtonDebouncer; 2],
    /// Last computed light level (0–100 %).
    light_pct: u8,
    /// Last duty written to the PWM register.
    last_duty: Option<u16>,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        let light = LightConfig::new(config.boot_brightness_pct, config.boot_blink_hz);
        let window = u32::from(config.debounce_ms);

        Self {
            state: DeviceState::new(light),
            relays: RelayActuator::new(u32::from(config.pulse_ms)),
            presenter: LightPresenter::new(),
            mapping: LightOutputMapping::new(config.light_max_level, config.light_active_low),
            buttons: [
                ButtonDebouncer::new(ButtonId::One, window),
                ButtonDebouncer::new(ButtonId::Two, window),
            ],
            light_pct: 0,
            last_duty: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put every output into its boot level: coils released, relay-2
    /// indicator off, light dark.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        for relay in RelayId::ALL {
            hw.set_coil(relay, CoilDrive::Released);
        }
        hw.set_indicator(false);

        let duty = self.mapping.duty_for(0);
        hw.write_light_duty(duty);
        self.last_duty = Some(duty);
        self.light_pct = 0;

        sink.emit(&AppEvent::Started);
        info!(
            "AppService started (pulse={}ms, light max={})",
            self.relays.pulse_ms(),
            self.mapping.max_level()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle. Non-blocking unless a button edge issues a
    /// relay pulse.
    pub fn tick(&mut self, hw: &mut impl BoardPort, sink: &mut impl EventSink) {
        self.tick_count += 1;

        // 1. Remote commands: nothing queued (see module docs).

        // 2. Light output
        let now = hw.now_ms();
        self.refresh_light(now, hw);

        // 3. Debounce both buttons before acting on either.
        let mut pressed = [false; 2];
        for (slot, button) in pressed.iter_mut().zip(self.buttons.iter_mut()) {
            let raw = hw.sample_button(button.id());
            *slot = button.resolve(raw, now).is_some();
        }

        // 4. Press edges toggle the bound relay.
        for (button, _) in ButtonId::ALL.into_iter().zip(pressed).filter(|(_, p)| *p) {
            sink.emit(&AppEvent::ButtonPressed(button));
            let relay = button.relay();
            let on = !self.state.position(relay).is_on();
            self.set_relay(relay, on, ActionSource::Button(button), hw, sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one command-surface call and return the resulting snapshot.
    ///
    /// Never fails: out-of-range channels are ignored, brightness is
    /// clamped, and an invalid blink frequency keeps the prior value.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl ActuatorPort + ClockPort + DelayNs),
        sink: &mut impl EventSink,
    ) -> StateSnapshot {
        match cmd {
            AppCommand::SetRelay { id, on, source } => match RelayId::from_number(id) {
                Some(relay) => self.set_relay(relay, on, source, hw, sink),
                None => Self::ignore("relay id out of range", sink),
            },
            AppCommand::ToggleRelay { id } => match RelayId::from_number(id) {
                Some(relay) => {
                    let on = !self.state.position(relay).is_on();
                    self.set_relay(relay, on, ActionSource::Remote, hw, sink);
                }
                None => Self::ignore("relay id out of range", sink),
            },
            AppCommand::SetBrightness { pct } => {
                let pct = pct.clamp(0, 100) as u8;
                if let Some(sequence) = self.state.set_brightness(pct, ActionSource::Remote) {
                    sink.emit(&AppEvent::BrightnessChanged { pct, sequence });
                }
                self.refresh_light(hw.now_ms(), hw);
            }
            AppCommand::SetBlink { enabled, hz } => {
                let enabled = enabled.unwrap_or(self.state.light().blink_enabled);
                if hz.is_some_and(|hz| !is_valid_blink_hz(hz)) {
                    Self::ignore("blink frequency out of range", sink);
                }
                if let Some(sequence) = self.state.set_blink(enabled, hz, ActionSource::Remote) {
                    sink.emit(&AppEvent::BlinkChanged {
                        enabled,
                        hz: self.state.light().blink_hz,
                        sequence,
                    });
                }
                self.presenter.reset_phase();
                self.refresh_light(hw.now_ms(), hw);
            }
        }

        self.snapshot()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.snapshot()
    }

    /// Light level (0–100 %) most recently computed.
    pub fn light_level(&self) -> u8 {
        self.light_pct
    }

    pub fn blink_phase(&self) -> BlinkPhase {
        self.presenter.phase()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_relay(
        &mut self,
        relay: RelayId,
        on: bool,
        source: ActionSource,
        hw: &mut (impl ActuatorPort + ClockPort + DelayNs),
        sink: &mut impl EventSink,
    ) {
        let Some(sequence) = self.relays.drive(&mut self.state, relay, on, source, hw) else {
            return;
        };

        hw.set_indicator(self.state.position(RelayId::Two).is_on());
        sink.emit(&AppEvent::RelayChanged {
            relay,
            position: self.state.position(relay),
            source,
            sequence,
        });

        if relay == RelayId::One {
            // Gate changed: restart blink timing from the on-phase.
            self.presenter.reset_phase();
            self.refresh_light(hw.now_ms(), hw);
        }
    }

    fn refresh_light(&mut self, now_ms: u32, hw: &mut impl ActuatorPort) {
        let gate_on = self.state.position(RelayId::One).is_on();
        let pct = self.presenter.compute(self.state.light(), gate_on, now_ms);
        self.light_pct = pct;

        let duty = self.mapping.duty_for(pct);
        if self.last_duty != Some(duty) {
            debug!("Light -> {}% (duty {})", pct, duty);
            hw.write_light_duty(duty);
            self.last_duty = Some(duty);
        }
    }

    fn ignore(reason: &'static str, sink: &mut impl EventSink) {
        warn!("Command ignored: {}", reason);
        sink.emit(&AppEvent::CommandIgnored(reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Outputs {
        coils: Vec<(RelayId, CoilDrive)>,
        duty: Option<u16>,
        indicator: Option<bool>,
    }

    impl ActuatorPort for Outputs {
        fn set_coil(&mut self, relay: RelayId, drive: CoilDrive) {
            self.coils.push((relay, drive));
        }
        fn write_light_duty(&mut self, duty: u16) {
            self.duty = Some(duty);
        }
        fn set_indicator(&mut self, on: bool) {
            self.indicator = Some(on);
        }
    }

    impl EventSink for Vec<AppEvent> {
        fn emit(&mut self, event: &AppEvent) {
            self.push(event.clone());
        }
    }

    #[test]
    fn new_service_is_dark_and_unversioned() {
        let app = AppService::new(&SystemConfig::default());
        assert_eq!(app.light_level(), 0);
        assert_eq!(app.snapshot().sequence, 0);
        assert_eq!(app.snapshot().last_action.as_str(), "BOOT");
        assert_eq!(app.tick_count(), 0);
    }

    #[test]
    fn start_releases_coils_and_darkens_active_low_light() {
        let mut app = AppService::new(&SystemConfig::default());
        let mut out = Outputs::default();
        let mut events = Vec::new();
        app.start(&mut out, &mut events);

        assert_eq!(
            out.coils,
            vec![(RelayId::One, CoilDrive::Released), (RelayId::Two, CoilDrive::Released)]
        );
        assert_eq!(out.indicator, Some(false));
        // Active-low: dark is the full-scale level.
        assert_eq!(out.duty, Some(1023));
        assert_eq!(events, vec![AppEvent::Started]);
    }
}
