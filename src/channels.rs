//! Channel records and the per-channel behavior engine.
//!
//! Each of the 16 channels is described by a 3-byte record in the SV table
//! and bound to one fixed physical pin. The record's packed bits select
//! input or output behavior:
//!
//! - `cnfg` bit 7 — direction (set = output);
//! - `cnfg` bit 3 — output timing (set = pulse, self-resetting);
//! - `cnfg` bit 2 — continuous-output reset policy (set = hardware, the
//!   electrical direction flag drives both edges; clear = software, a
//!   single record toggles on activations only);
//! - `value1` — bound bus address minus one;
//! - `value2` bit 5 — polarity: which logical direction the record serves;
//! - `value2` bit 4 — last observed input level (ephemeral edge memory).
//!
//! The engine never enforces uniqueness of (address, polarity) bindings:
//! actuation scans in channel order and the first match wins, so duplicate
//! records are simply unreachable.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, PinMode, PinPort, TransportPort};
use crate::bus::input_report;
use crate::pins::CHANNEL_COUNT;
use crate::sv::SvTable;

/// Fixed hold time for pulsed outputs, in milliseconds.
pub const PULSE_DWELL_MS: u32 = 150;

// ───────────────────────────────────────────────────────────────
// Channel record accessors
// ───────────────────────────────────────────────────────────────

/// Snapshot of one channel's 3-byte record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub cnfg: u8,
    pub value1: u8,
    pub value2: u8,
}

impl ChannelConfig {
    /// `cnfg` bit 7: channel direction.
    pub const DIRECTION_MASK: u8 = 0x80;
    /// `cnfg` bit 3: pulse timing for outputs.
    pub const PULSE_MASK: u8 = 0x08;
    /// `cnfg` bit 2: hardware reset policy for continuous outputs.
    pub const HARD_RESET_MASK: u8 = 0x04;
    /// `value2` bit 5: polarity.
    pub const POLARITY_MASK: u8 = 0x20;
    /// `value2` bit 4: level memory for input edge detection.
    pub const LEVEL_MASK: u8 = 0x10;

    pub fn is_output(&self) -> bool {
        self.cnfg & Self::DIRECTION_MASK != 0
    }

    pub fn is_pulse(&self) -> bool {
        self.cnfg & Self::PULSE_MASK != 0
    }

    pub fn is_hardware_reset(&self) -> bool {
        self.cnfg & Self::HARD_RESET_MASK != 0
    }

    /// 1-based bus address this record is bound to.
    pub fn bound_address(&self) -> u16 {
        u16::from(self.value1) + 1
    }

    /// Polarity: the logical direction this record responds to.
    pub fn polarity(&self) -> bool {
        self.value2 & Self::POLARITY_MASK != 0
    }

    /// Last observed electrical level of an input channel.
    pub fn last_level(&self) -> bool {
        self.value2 & Self::LEVEL_MASK != 0
    }

    /// The 1-based sensor address a bus monitor decodes from this
    /// record's input reports (address and polarity interleaved).
    pub fn sensor_address(&self) -> u16 {
        (u16::from(self.value1) << 1) + u16::from(self.polarity()) + 1
    }
}

// ───────────────────────────────────────────────────────────────
// Engine: initialization
// ───────────────────────────────────────────────────────────────

/// Configure every channel's pin from its record and seed the input
/// level memory from the pins' current electrical state, so the first
/// poll after boot does not report a phantom edge.
pub fn init_pins(table: &mut SvTable, pins: &mut impl PinPort) {
    for n in 0..CHANNEL_COUNT {
        if table.channel(n).is_output() {
            pins.set_mode(n, PinMode::Output);
        } else {
            pins.set_mode(n, PinMode::InputPullUp);
            table.set_input_level(n, pins.read(n) == PinState::High);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Engine: input polling
// ───────────────────────────────────────────────────────────────

/// One edge-detection sweep over all input channels.
///
/// A channel whose electrical level differs from its level memory emits
/// one input report carrying the record's address bytes as they stand,
/// then the memory bit is updated — so each distinct change is reported
/// exactly once. No debounce: the physical layer is trusted to deliver
/// clean transitions.
pub fn poll_inputs(
    table: &mut SvTable,
    pins: &impl PinPort,
    bus: &mut impl TransportPort,
    sink: &mut impl EventSink,
) {
    for n in 0..CHANNEL_COUNT {
        let ch = table.channel(n);
        if ch.is_output() {
            continue;
        }
        let level = pins.read(n) == PinState::High;
        if level != ch.last_level() {
            debug!(
                "input {} changed to {}, reporting as sensor {}",
                n,
                u8::from(level),
                ch.sensor_address()
            );
            bus.send(&input_report(ch.value1, ch.value2));
            sink.emit(&AppEvent::InputChanged {
                channel: n,
                address: ch.sensor_address(),
                level,
            });
            table.set_input_level(n, level);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Engine: output actuation
// ───────────────────────────────────────────────────────────────

/// Serve a switch command on the first output channel bound to `address`
/// whose policy fires; later duplicates are never reached.
///
/// Policies:
/// - **pulse** — activations only (`output` set), matching polarity:
///   drive high, hold [`PULSE_DWELL_MS`], drive low. Self-resetting
///   regardless of the reset-policy bit.
/// - **continuous, hardware reset** — matching polarity; the pin follows
///   the `output` flag, so paired records serve the two directions.
/// - **continuous, software reset** — activations only; `direction`
///   selects low or high, one record toggling both ways. Deactivations
///   are ignored entirely.
pub fn actuate(
    table: &SvTable,
    pins: &mut impl PinPort,
    delay: &mut impl DelayNs,
    address: u16,
    output: bool,
    direction: bool,
) {
    for n in 0..CHANNEL_COUNT {
        let ch = table.channel(n);
        if !ch.is_output() || ch.bound_address() != address {
            continue;
        }

        if ch.is_pulse() {
            if ch.polarity() == direction && output {
                debug!("channel {} pulse for address {}", n, address);
                pins.write(n, PinState::High);
                delay.delay_ms(PULSE_DWELL_MS);
                pins.write(n, PinState::Low);
                return;
            }
        } else if ch.is_hardware_reset() {
            if ch.polarity() == direction {
                debug!("channel {} follows output={} for address {}", n, output, address);
                pins.write(n, PinState::from(output));
                return;
            }
        } else if output {
            // Software reset: one record serves both directions as a toggle.
            debug!("channel {} toggled by direction={} for address {}", n, direction, address);
            pins.write(n, PinState::from(!direction));
            return;
        }
    }
}
