//! Light presenter: gated brightness with optional square-wave blink.
//!
//! ## Priority (highest first)
//!
//! 1. **Gate**: relay 1 OFF forces the output to 0 %.
//! 2. **Steady**: blink disabled outputs the configured brightness.
//! 3. **Blink**: 50 % duty square wave between brightness and 0.
//!
//! The blink phase is runtime state owned here, separate from the
//! persistent [`LightConfig`]. [`LightPresenter::reset_phase`] re-arms it
//! so the next evaluation starts a fresh on-phase.
//!
//! ## Register mapping
//!
//! [`LightOutputMapping`] turns a percentage into a PWM duty level in
//! `[0, max_level]`, inverting for active-low wiring. It knows nothing
//! about blink or gating.

use crate::state::LightConfig;

/// Half-period used when the frequency is effectively zero.
const FALLBACK_HALF_PERIOD_MS: u32 = 500;

/// Derived blink phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPhase {
    pub on: bool,
    /// `None` until the first evaluation after a reset.
    pub deadline_ms: Option<u32>,
}

impl BlinkPhase {
    const fn armed() -> Self {
        Self {
            on: true,
            deadline_ms: None,
        }
    }
}

pub struct LightPresenter {
    phase: BlinkPhase,
}

impl Default for LightPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl LightPresenter {
    pub fn new() -> Self {
        Self {
            phase: BlinkPhase::armed(),
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Restart blinking from the on-phase at the next evaluation.
    pub fn reset_phase(&mut self) {
        self.phase = BlinkPhase::armed();
    }

    /// Output level (0–100 %) for this instant.
    pub fn compute(&mut self, cfg: &LightConfig, gate_on: bool, now_ms: u32) -> u8 {
        if !gate_on {
            return 0;
        }
        if !cfg.blink_enabled {
            return cfg.brightness_pct;
        }

        let half = half_period_ms(cfg.blink_hz);
        match self.phase.deadline_ms {
            None => {
                self.phase.on = true;
                self.phase.deadline_ms = Some(now_ms.wrapping_add(half));
            }
            Some(deadline) if deadline_reached(now_ms, deadline) => {
                self.phase.on = !self.phase.on;
                self.phase.deadline_ms = Some(now_ms.wrapping_add(half));
            }
            Some(_) => {}
        }

        if self.phase.on { cfg.brightness_pct } else { 0 }
    }
}

/// Half of one blink period in milliseconds: `500 / hz`.
pub fn half_period_ms(hz: f32) -> u32 {
    if hz > 0.01 {
        (500.0 / hz) as u32
    } else {
        FALLBACK_HALF_PERIOD_MS
    }
}

/// Wrap-safe `now >= deadline`.
fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

// ───────────────────────────────────────────────────────────────
// Register mapping
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightOutputMapping {
    max_level: u16,
    active_low: bool,
}

impl LightOutputMapping {
    pub fn new(max_level: u16, active_low: bool) -> Self {
        Self {
            max_level,
            active_low,
        }
    }

    pub fn max_level(&self) -> u16 {
        self.max_level
    }

    /// Linear `0..=100 % → 0..=max_level`, inverted when active-low.
    pub fn duty_for(&self, pct: u8) -> u16 {
        let pct = u32::from(pct.min(100));
        let mapped = (pct * u32::from(self.max_level) / 100) as u16;
        if self.active_low {
            self.max_level - mapped
        } else {
            mapped
        }
    }
}
