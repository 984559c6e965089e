//! Light output driver (LEDC channel 0) and the LED2 indicator.
//!
//! Writes raw duty values; brightness mapping and active-low inversion
//! happen in the control layer.
//!
//! On ESP-IDF: drives LEDC and GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct LightPwmDriver {
    max_level: u16,
    duty: u16,
}

impl LightPwmDriver {
    /// `max_level` is clamped to the LEDC resolution.
    pub fn new(max_level: u16) -> Self {
        let max_level = max_level.min(pins::PWM_MAX_DUTY);
        Self {
            max_level,
            duty: max_level,
        }
    }

    pub fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.max_level);
        hw_init::ledc_set(hw_init::LEDC_CH_LIGHT, u32::from(duty));
        self.duty = duty;
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}

/// Single GPIO indicator LED (active HIGH).
pub struct IndicatorLed {
    gpio: i32,
    on: bool,
}

impl IndicatorLed {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
