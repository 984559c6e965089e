//! Polled, time-window button debouncer.
//!
//! ## Hardware
//!
//! Momentary switch to ground with the internal pull-up enabled, so the
//! pressed level is LOW. The main loop samples the pin every tick and
//! feeds the raw level into [`ButtonDebouncer::resolve`].
//!
//! ## Algorithm
//!
//! | Step | Condition                                         | Effect                         |
//! |------|---------------------------------------------------|--------------------------------|
//! | 1    | raw level differs from last raw sample            | record raw + timestamp         |
//! | 2    | quiet for > window and raw differs from stable    | commit raw as the stable level |
//! | 3    | committed level is the pressed level              | emit [`ButtonEdge::Pressed`]   |
//!
//! Releases are committed silently: one edge per press, never per release.

use crate::state::ButtonId;

/// Default debounce window (milliseconds).
pub const DEBOUNCE_MS: u32 = 40;

/// Sampled digital level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn from_high(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Stable edge produced after debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
}

/// Per-button raw/stable tracking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub last_raw: Level,
    pub stable: Level,
    pub last_change_ms: u32,
}

impl ButtonState {
    /// Released (pulled-up) idle state.
    pub const fn released() -> Self {
        Self {
            last_raw: Level::High,
            stable: Level::High,
            last_change_ms: 0,
        }
    }
}

pub struct ButtonDebouncer {
    id: ButtonId,
    state: ButtonState,
    window_ms: u32,
    pressed_level: Level,
}

impl ButtonDebouncer {
    /// Active-low button with the given window.
    pub fn new(id: ButtonId, window_ms: u32) -> Self {
        Self {
            id,
            state: ButtonState::released(),
            window_ms,
            pressed_level: Level::Low,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Call once per tick with the current raw sample.
    /// `now_ms` is monotonic milliseconds (wrapping).
    pub fn resolve(&mut self, raw: Level, now_ms: u32) -> Option<ButtonEdge> {
        if raw != self.state.last_raw {
            self.state.last_raw = raw;
            self.state.last_change_ms = now_ms;
        }

        let quiet_ms = now_ms.wrapping_sub(self.state.last_change_ms);
        if quiet_ms > self.window_ms && raw != self.state.stable {
            self.state.stable = raw;
            if raw == self.pressed_level {
                return Some(ButtonEdge::Pressed);
            }
        }

        None
    }
}
