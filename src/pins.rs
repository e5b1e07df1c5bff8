//! GPIO assignments and LED-matrix pixel map for the greenhouse board.
//!
//! Single source of truth. Status indicators and the fan animation share
//! one 8×8 matrix and rely on the disjoint positions declared here.

// ---------------------------------------------------------------------------
// Relays (active-low relay board)
// ---------------------------------------------------------------------------

/// Relay 1: exhaust fan.
pub const FAN_RELAY_GPIO: u32 = 17;
/// Relay 2: auxiliary load, toggled from the joystick only.
pub const AUX_RELAY_GPIO: u32 = 27;

// ---------------------------------------------------------------------------
// LED matrix
// ---------------------------------------------------------------------------

pub const MATRIX_WIDTH: u8 = 8;
pub const MATRIX_HEIGHT: u8 = 8;

/// Red on error, green after a persisted cycle.
pub const STATUS_PIXEL: (u8, u8) = (0, 0);
/// Lit while the auxiliary relay is energised.
pub const RELAY_PIXEL: (u8, u8) = (0, 2);

/// Top-left corner of the fan animation region.
pub const FAN_ANIMATION_ORIGIN: (u8, u8) = (3, 3);
/// Side length of the (square) fan animation region.
pub const FAN_ANIMATION_SIZE: u8 = 5;
