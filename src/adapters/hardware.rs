//! Simulated channel pin bank and dwell clock.
//!
//! Host backend for [`PinPort`]: tracks pin modes and levels in memory
//! only. Unwired inputs float high, matching the pull-up behavior of the
//! real board. On target hardware a GPIO bank implements the same trait
//! against [`crate::pins::PIN_MAP`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{debug, trace};

use crate::app::ports::{PinMode, PinPort};
use crate::pins::{CHANNEL_COUNT, PIN_MAP};

#[derive(Clone, Copy)]
struct SimPin {
    mode: Option<PinMode>,
    level: PinState,
}

/// In-memory bank of the 16 channel pins.
pub struct SimPinBank {
    pins: [SimPin; CHANNEL_COUNT],
}

impl SimPinBank {
    pub fn new() -> Self {
        Self {
            pins: [SimPin {
                mode: None,
                level: PinState::High,
            }; CHANNEL_COUNT],
        }
    }

    /// External stimulus: drive a channel's electrical level, as a field
    /// device wired to the input would.
    pub fn set_level(&mut self, channel: usize, state: PinState) {
        self.pins[channel].level = state;
    }

    /// Current electrical level of a channel's pin.
    pub fn level(&self, channel: usize) -> PinState {
        self.pins[channel].level
    }

    /// Configured direction, if the channel was initialized.
    pub fn mode(&self, channel: usize) -> Option<PinMode> {
        self.pins[channel].mode
    }
}

impl Default for SimPinBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PinPort for SimPinBank {
    fn set_mode(&mut self, channel: usize, mode: PinMode) {
        debug!("pin {} (channel {}) -> {:?}", PIN_MAP[channel], channel, mode);
        self.pins[channel].mode = Some(mode);
    }

    fn read(&self, channel: usize) -> PinState {
        self.pins[channel].level
    }

    fn write(&mut self, channel: usize, state: PinState) {
        trace!("pin {} (channel {}) <- {:?}", PIN_MAP[channel], channel, state);
        self.pins[channel].level = state;
    }
}

// ───────────────────────────────────────────────────────────────
// SimDelay
// ───────────────────────────────────────────────────────────────

/// Dwell clock for the simulation: accounts time instead of sleeping, so
/// a scripted session with pulsed outputs finishes instantly.
pub struct SimDelay {
    elapsed_ns: u64,
}

impl SimDelay {
    pub fn new() -> Self {
        Self { elapsed_ns: 0 }
    }

    /// Total simulated time spent in dwells.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl Default for SimDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
