//! Latching (bistable) relay actuator.
//!
//! Each relay coil is driven by an H-bridge with two complementary
//! terminals (A/B). A relay flips position on a single directional pulse
//! and then holds mechanically with no coil current:
//!
//! ```text
//!   ON :  A ▔▔▔▔▔▔▔▔▁   B ▁▁▁▁▁▁▁▁▁      (hold = pulse width)
//!   OFF:  A ▁▁▁▁▁▁▁▁▁   B ▔▔▔▔▔▔▔▔▁
//! ```
//!
//! The coil is commanded with a single [`CoilDrive`] value per channel, so
//! "A and B asserted together" is not representable.
//!
//! ## Blocking
//!
//! [`RelayActuator::drive`] holds the calling context for one pulse width.
//! This is the only blocking point of the control loop; nothing else can
//! touch the channel while the pulse is in flight.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::app::ports::{ActuatorPort, CoilDrive};
use crate::state::{ActionSource, DeviceState, RelayId, RelayPosition};

/// Default pulse width (milliseconds).
pub const PULSE_MS: u32 = 30;

pub struct RelayActuator {
    pulse_ms: u32,
}

impl RelayActuator {
    pub fn new(pulse_ms: u32) -> Self {
        Self { pulse_ms }
    }

    pub fn pulse_ms(&self) -> u32 {
        self.pulse_ms
    }

    /// Pulse `relay` towards `on` if its recorded position differs.
    ///
    /// Returns the new journal sequence number when a pulse was issued,
    /// `None` when the command repeated the current position.
    pub fn drive(
        &self,
        state: &mut DeviceState,
        relay: RelayId,
        on: bool,
        source: ActionSource,
        hw: &mut (impl ActuatorPort + DelayNs),
    ) -> Option<u32> {
        let target = RelayPosition::from_on(on);
        if state.position(relay) == target {
            debug!("Relay R{} already {}, no pulse", relay.number(), target);
            return None;
        }

        hw.set_coil(relay, coil_drive_for(target));
        hw.delay_ms(self.pulse_ms);
        hw.set_coil(relay, CoilDrive::Released);

        let seq = state.commit_relay(relay, target, source);
        info!(
            "Relay R{} -> {} (src={}, pulse={}ms, seq={})",
            relay.number(),
            target,
            source,
            self.pulse_ms,
            seq
        );
        Some(seq)
    }
}

const fn coil_drive_for(target: RelayPosition) -> CoilDrive {
    match target {
        RelayPosition::On => CoilDrive::Set,
        RelayPosition::Off => CoilDrive::Reset,
    }
}
