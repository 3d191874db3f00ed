//! Physical pin assignments for the SVIO main board.
//!
//! Single source of truth — every adapter references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

/// Number of configurable I/O channels exposed by the module.
pub const CHANNEL_COUNT: usize = 16;

/// Physical pin bound to each logical channel, in channel order.
///
/// Pins 0/1 carry the serial console and 7/8 the bus driver TX/RX, so the
/// configurable channels occupy the remaining header positions.
pub const PIN_MAP: [u8; CHANNEL_COUNT] = [
    2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
];

/// Bus driver transmit pin (owned by the transport, never a channel).
pub const BUS_TX_PIN: u8 = 7;
/// Bus driver receive pin (owned by the transport, never a channel).
pub const BUS_RX_PIN: u8 = 8;
