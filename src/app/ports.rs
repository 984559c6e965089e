//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (button inputs, relay coils, light PWM, clock, event
//! sinks) implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly. Blocking delays use [`embedded_hal::delay::DelayNs`].

use embedded_hal::delay::DelayNs;

use crate::control::debounce::Level;
use crate::state::{ButtonId, RelayId};

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: raw, undebounced button levels.
pub trait InputPort {
    fn sample_button(&mut self, button: ButtonId) -> Level;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Drive state of one latching-relay coil.
///
/// One value per channel: the two H-bridge terminals can never be
/// commanded high at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoilDrive {
    /// A low, B low. Coil de-energised, relay holds its position.
    Released,
    /// A high, B low. Pulls the relay ON.
    Set,
    /// A low, B high. Pulls the relay OFF.
    Reset,
}

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Set the coil terminals of `relay`.
    fn set_coil(&mut self, relay: RelayId, drive: CoilDrive);

    /// Write the light PWM register. `duty` is already mapped and
    /// inverted for the output polarity.
    fn write_light_duty(&mut self, duty: u16);

    /// Relay-2 indicator LED (active-high).
    fn set_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock (wraps at `u32::MAX`).
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

/// Everything the control loop needs from the board in one bound, so a
/// single adapter can be borrowed once per call.
pub trait BoardPort: InputPort + ActuatorPort + ClockPort + DelayNs {}

impl<T: InputPort + ActuatorPort + ClockPort + DelayNs> BoardPort for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
