//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the coil, light and indicator drivers plus the board clock, and
//! exposes them through [`InputPort`], [`ActuatorPort`], [`ClockPort`] and
//! [`DelayNs`]. This is the only module in the system that touches actual
//! hardware. On non-espidf targets the underlying drivers use cfg-gated
//! simulation stubs.

use embedded_hal::delay::DelayNs;

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{ActuatorPort, ClockPort, CoilDrive, InputPort};
use crate::control::debounce::Level;
use crate::drivers::coil::LatchingCoilDriver;
use crate::drivers::hw_init;
use crate::drivers::light_pwm::{IndicatorLed, LightPwmDriver};
use crate::pins;
use crate::state::{ButtonId, RelayId};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    coils: LatchingCoilDriver,
    light: LightPwmDriver,
    led2: IndicatorLed,
    clock: Esp32TimeAdapter,
    #[cfg(target_os = "espidf")]
    delay: esp_idf_hal::delay::Delay,
}

impl HardwareAdapter {
    pub fn new(
        coils: LatchingCoilDriver,
        light: LightPwmDriver,
        led2: IndicatorLed,
        clock: Esp32TimeAdapter,
    ) -> Self {
        Self {
            coils,
            light,
            led2,
            clock,
            #[cfg(target_os = "espidf")]
            delay: esp_idf_hal::delay::Delay::new_default(),
        }
    }

    pub fn coils(&self) -> &LatchingCoilDriver {
        &self.coils
    }

    pub fn light_duty(&self) -> u16 {
        self.light.duty()
    }

    pub fn indicator_on(&self) -> bool {
        self.led2.is_on()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareAdapter {
    fn sample_button(&mut self, button: ButtonId) -> Level {
        let gpio = match button {
            ButtonId::One => pins::BUTTON1_GPIO,
            ButtonId::Two => pins::BUTTON2_GPIO,
        };
        Level::from_high(hw_init::gpio_read(gpio))
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_coil(&mut self, relay: RelayId, drive: CoilDrive) {
        self.coils.apply(relay, drive);
    }

    fn write_light_duty(&mut self, duty: u16) {
        self.light.set_duty(duty);
    }

    fn set_indicator(&mut self, on: bool) {
        self.led2.set(on);
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl ClockPort for HardwareAdapter {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

// ── Blocking delay (coil pulse) ───────────────────────────────

#[cfg(target_os = "espidf")]
impl DelayNs for HardwareAdapter {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for HardwareAdapter {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
