//! Control algorithms: input debouncing, latching relay pulses, and the
//! gated light presenter. Pure logic; hardware is reached through
//! [`ports`](crate::app::ports).

pub mod debounce;
pub mod light;
pub mod relay;
