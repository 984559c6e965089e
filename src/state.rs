//! Device state: the single shared record of actuator positions, light
//! configuration, and the change journal.
//!
//! ```text
//!   DeviceState
//!   ├── relays[2]      RelayChannel { id, position }
//!   ├── light          LightConfig  { brightness_pct, blink_enabled, blink_hz }
//!   └── journal        ActionJournal { description, sequence }
//! ```
//!
//! Relay positions are only written through
//! [`RelayActuator::drive`](crate::control::relay::RelayActuator::drive);
//! light configuration only through the [`AppService`](crate::app::service::AppService)
//! command path. Derived runtime state (blink phase) lives in
//! [`LightPresenter`](crate::control::light::LightPresenter), not here.

use core::fmt::{self, Write as _};

use serde::{Serialize, Serializer};

/// Lower exclusive bound for an accepted blink frequency (Hz).
pub const BLINK_HZ_MIN: f32 = 0.05;
/// Upper exclusive bound for an accepted blink frequency (Hz).
pub const BLINK_HZ_MAX: f32 = 50.0;

/// Journal text capacity. `"WEB BLINK ON @ 49.9Hz"` is the longest entry.
pub type ActionText = heapless::String<32>;

// ───────────────────────────────────────────────────────────────
// Identities
// ───────────────────────────────────────────────────────────────

/// Relay channel identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayId {
    One,
    Two,
}

impl RelayId {
    pub const ALL: [RelayId; 2] = [RelayId::One, RelayId::Two];

    /// Map a wire-level channel number; anything but 1 or 2 is rejected.
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Physical push-button identity. Button 1 toggles relay 1, button 2 relay 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    One,
    Two,
}

impl ButtonId {
    pub const ALL: [ButtonId; 2] = [ButtonId::One, ButtonId::Two];

    /// The relay this button is bound to.
    pub const fn relay(self) -> RelayId {
        match self {
            Self::One => RelayId::One,
            Self::Two => RelayId::Two,
        }
    }
}

/// Origin of a state-changing command, rendered into the journal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    Button(ButtonId),
    /// Remote API (HTTP or any other transport bound to the command surface).
    Remote,
}

impl fmt::Display for ActionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button(ButtonId::One) => f.write_str("BTN1"),
            Self::Button(ButtonId::Two) => f.write_str("BTN2"),
            Self::Remote => f.write_str("WEB"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Relay channel
// ───────────────────────────────────────────────────────────────

/// Settled position of a latching relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPosition {
    Off,
    On,
}

impl RelayPosition {
    pub const fn from_on(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for RelayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_on() { "ON" } else { "OFF" })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayChannel {
    pub id: RelayId,
    position: RelayPosition,
}

impl RelayChannel {
    const fn new(id: RelayId) -> Self {
        Self {
            id,
            position: RelayPosition::Off,
        }
    }

    pub fn position(&self) -> RelayPosition {
        self.position
    }
}

// ───────────────────────────────────────────────────────────────
// Light configuration
// ───────────────────────────────────────────────────────────────

/// Persistent light settings. Blink phase is derived state and is kept
/// by the presenter, not here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    /// 0–100 %.
    pub brightness_pct: u8,
    pub blink_enabled: bool,
    /// Always inside `(BLINK_HZ_MIN, BLINK_HZ_MAX)`.
    pub blink_hz: f32,
}

impl LightConfig {
    pub fn new(brightness_pct: u8, blink_hz: f32) -> Self {
        Self {
            brightness_pct: brightness_pct.min(100),
            blink_enabled: false,
            blink_hz: if is_valid_blink_hz(blink_hz) { blink_hz } else { 1.0 },
        }
    }
}

/// `true` if `hz` is finite and strictly inside the accepted band.
pub fn is_valid_blink_hz(hz: f32) -> bool {
    hz.is_finite() && hz > BLINK_HZ_MIN && hz < BLINK_HZ_MAX
}

// ───────────────────────────────────────────────────────────────
// Journal
// ───────────────────────────────────────────────────────────────

/// Last action description plus the monotonic change counter observers
/// poll for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionJournal {
    description: ActionText,
    sequence: u32,
}

impl ActionJournal {
    fn boot() -> Self {
        let mut description = ActionText::new();
        let _ = description.push_str("BOOT");
        Self {
            description,
            sequence: 0,
        }
    }

    /// Record one accepted state change. Text that overflows the buffer
    /// is truncated; the sequence still advances.
    fn record(&mut self, args: fmt::Arguments<'_>) -> u32 {
        self.description.clear();
        let _ = self.description.write_fmt(args);
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

// ───────────────────────────────────────────────────────────────
// DeviceState
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    relays: [RelayChannel; 2],
    light: LightConfig,
    journal: ActionJournal,
}

impl DeviceState {
    /// Boot state: both relays OFF, blink disabled, sequence 0.
    pub fn new(light: LightConfig) -> Self {
        Self {
            relays: [RelayChannel::new(RelayId::One), RelayChannel::new(RelayId::Two)],
            light,
            journal: ActionJournal::boot(),
        }
    }

    pub fn position(&self, id: RelayId) -> RelayPosition {
        self.relays[id.index()].position
    }

    pub fn light(&self) -> &LightConfig {
        &self.light
    }

    pub fn journal(&self) -> &ActionJournal {
        &self.journal
    }

    pub fn sequence(&self) -> u32 {
        self.journal.sequence
    }

    /// Record a completed pulse. Only the relay actuator calls this.
    pub(crate) fn commit_relay(
        &mut self,
        id: RelayId,
        position: RelayPosition,
        source: ActionSource,
    ) -> u32 {
        self.relays[id.index()].position = position;
        self.journal
            .record(format_args!("{} R{} {}", source, id.number(), position))
    }

    /// Returns the new sequence number, or `None` if nothing changed.
    pub(crate) fn set_brightness(&mut self, pct: u8, source: ActionSource) -> Option<u32> {
        let pct = pct.min(100);
        if self.light.brightness_pct == pct {
            return None;
        }
        self.light.brightness_pct = pct;
        Some(self.journal.record(format_args!("{} LIGHT {}%", source, pct)))
    }

    /// Apply blink settings. An invalid `hz` keeps the prior frequency;
    /// `enabled` is applied regardless. Returns the new sequence number,
    /// or `None` if the resulting configuration is unchanged.
    pub(crate) fn set_blink(
        &mut self,
        enabled: bool,
        hz: Option<f32>,
        source: ActionSource,
    ) -> Option<u32> {
        let mut next = self.light;
        next.blink_enabled = enabled;
        if let Some(hz) = hz.filter(|hz| is_valid_blink_hz(*hz)) {
            next.blink_hz = hz;
        }
        if next == self.light {
            return None;
        }
        self.light = next;
        Some(if enabled {
            self.journal
                .record(format_args!("{} BLINK ON @ {:.1}Hz", source, next.blink_hz))
        } else {
            self.journal.record(format_args!("{} BLINK OFF", source))
        })
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            relay1_on: self.position(RelayId::One).is_on(),
            relay2_on: self.position(RelayId::Two).is_on(),
            brightness_pct: self.light.brightness_pct,
            blink_enabled: self.light.blink_enabled,
            blink_hz: self.light.blink_hz,
            last_action: self.journal.description.clone(),
            sequence: self.journal.sequence,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Snapshot (observer view)
// ───────────────────────────────────────────────────────────────

/// Read-only view returned by every command-surface call. Serialises to
/// the wire keys the dashboard polls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    #[serde(rename = "r1")]
    pub relay1_on: bool,
    #[serde(rename = "r2")]
    pub relay2_on: bool,
    #[serde(rename = "lp")]
    pub brightness_pct: u8,
    #[serde(rename = "blink")]
    pub blink_enabled: bool,
    #[serde(rename = "hz", serialize_with = "one_decimal")]
    pub blink_hz: f32,
    #[serde(rename = "act")]
    pub last_action: ActionText,
    #[serde(rename = "seq")]
    pub sequence: u32,
}

fn one_decimal<S: Serializer>(hz: &f32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f32((hz * 10.0).round() / 10.0)
}
