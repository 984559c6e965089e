//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod coil;
pub mod hw_init;
pub mod light_pwm;
