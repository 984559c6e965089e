//! GPIO / peripheral pin assignments for the relay board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Latching relays (dual-coil, A = set, B = reset)
// ---------------------------------------------------------------------------

/// Relay 1 set coil.
pub const RELAY1_A_GPIO: i32 = 16;
/// Relay 1 reset coil.
pub const RELAY1_B_GPIO: i32 = 14;
/// Relay 2 set coil.
pub const RELAY2_A_GPIO: i32 = 12;
/// Relay 2 reset coil.
pub const RELAY2_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Push-buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON1_GPIO: i32 = 5;
pub const BUTTON2_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// LED2 mirrors relay 2 (active HIGH).
pub const LED2_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Light output (LEDC PWM, active-low)
// ---------------------------------------------------------------------------

pub const LIGHT_PWM_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 10-bit gives 0 – 1023 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 10;
/// Highest duty value the LEDC timer can hold.
pub const PWM_MAX_DUTY: u16 = ((1u32 << PWM_RESOLUTION_BITS) - 1) as u16;
