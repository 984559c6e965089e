//! Dual-coil latching relay driver.
//!
//! Each relay has a set coil (A) and a reset coil (B). The driver maps a
//! [`CoilDrive`] onto the two pins, so both coils can never be energised
//! at the same time. Pulse timing lives in the control layer; this driver
//! is a dumb actuator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real GPIO via hw_init helpers.
//! On host/test: tracks levels in-memory only.

use crate::app::ports::CoilDrive;
use crate::drivers::hw_init;
use crate::pins;
use crate::state::RelayId;

/// Pin pair for one relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoilPins {
    pub set_gpio: i32,
    pub reset_gpio: i32,
}

impl CoilPins {
    pub const fn for_relay(relay: RelayId) -> Self {
        match relay {
            RelayId::One => Self {
                set_gpio: pins::RELAY1_A_GPIO,
                reset_gpio: pins::RELAY1_B_GPIO,
            },
            RelayId::Two => Self {
                set_gpio: pins::RELAY2_A_GPIO,
                reset_gpio: pins::RELAY2_B_GPIO,
            },
        }
    }
}

/// Pin levels `(A, B)` for a drive request.
pub const fn coil_levels(drive: CoilDrive) -> (bool, bool) {
    match drive {
        CoilDrive::Released => (false, false),
        CoilDrive::Set => (true, false),
        CoilDrive::Reset => (false, true),
    }
}

pub struct LatchingCoilDriver {
    pins: [CoilPins; 2],
    drive: [CoilDrive; 2],
}

impl Default for LatchingCoilDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LatchingCoilDriver {
    pub fn new() -> Self {
        Self {
            pins: [CoilPins::for_relay(RelayId::One), CoilPins::for_relay(RelayId::Two)],
            drive: [CoilDrive::Released; 2],
        }
    }

    pub fn apply(&mut self, relay: RelayId, drive: CoilDrive) {
        let pins = self.pins[relay.index()];
        let (a, b) = coil_levels(drive);
        // Drop the active coil first so A and B never overlap.
        if !a {
            hw_init::gpio_write(pins.set_gpio, false);
        }
        if !b {
            hw_init::gpio_write(pins.reset_gpio, false);
        }
        if a {
            hw_init::gpio_write(pins.set_gpio, true);
        }
        if b {
            hw_init::gpio_write(pins.reset_gpio, true);
        }
        self.drive[relay.index()] = drive;
    }

    pub fn release_all(&mut self) {
        for relay in RelayId::ALL {
            self.apply(relay, CoilDrive::Released);
        }
    }

    pub fn drive(&self, relay: RelayId) -> CoilDrive {
        self.drive[relay.index()]
    }
}
