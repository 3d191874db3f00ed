//! Port traits — the hexagonal boundary between the module core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IoModule (domain)
//! ```
//!
//! Driven adapters (bus driver, pin bank, persistent store, event sinks)
//! implement these traits. The [`IoModule`](super::service::IoModule)
//! consumes them via generics, so the core never touches hardware directly.
//!
//! All ports are infallible at the trait level: the module must keep its
//! dispatch loop alive through any peripheral misbehavior, so adapters
//! absorb and log their own failures instead of propagating them.

use embedded_hal::digital::PinState;

use crate::bus::RawFrame;

// ───────────────────────────────────────────────────────────────
// Bus transport port (driven adapter: bus driver ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Framed access to the shared bus.
///
/// The adapter owns framing, checksum, and bus-access timing. The core
/// treats frames as opaque byte buffers with a known layout; the final
/// byte of every frame is the checksum slot, which the core leaves at 0
/// for the adapter to fill on transmit.
pub trait TransportPort {
    /// Fetch at most one complete inbound frame, without blocking.
    fn poll_receive(&mut self) -> Option<RawFrame>;

    /// Queue a frame for transmission. Fire-and-forget.
    fn send(&mut self, frame: &RawFrame);
}

// ───────────────────────────────────────────────────────────────
// Pin port (driven adapter: domain ↔ channel pins)
// ───────────────────────────────────────────────────────────────

/// Electrical direction of a channel pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Push-pull output.
    Output,
    /// Input with the internal pull-up enabled.
    InputPullUp,
}

/// One bank of channel pins, addressed by logical channel index.
///
/// The channel→physical-pin mapping lives in the adapter (seeded from
/// [`crate::pins::PIN_MAP`]); the core only ever speaks channel indices
/// `0..CHANNEL_COUNT`.
pub trait PinPort {
    /// Configure the direction of a channel's pin.
    fn set_mode(&mut self, channel: usize, mode: PinMode);

    /// Sample the current electrical level of a channel's pin.
    fn read(&self, channel: usize) -> PinState;

    /// Drive a channel's output pin to the given level.
    fn write(&mut self, channel: usize, state: PinState);
}

// ───────────────────────────────────────────────────────────────
// Persistent store port (driven adapter: domain ↔ EEPROM-class storage)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable persistent storage, at least
/// [`SV_TABLE_LEN`](crate::sv::SV_TABLE_LEN) bytes.
///
/// Writes are synchronous and best-effort durable. Failures are not
/// reported: the adapter logs them and the module carries on with its
/// in-memory mirror.
pub trait StoragePort {
    /// Read one byte.
    fn read_byte(&self, index: usize) -> u8;

    /// Write one byte, blocking until the underlying write completes.
    fn write_byte(&mut self, index: usize, value: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go. Never required for
/// correctness — a no-op sink is a valid implementation.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
