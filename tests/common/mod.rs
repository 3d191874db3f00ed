//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full interaction
//! history without touching real storage, pins, or a bus driver. The bus
//! itself is the library's own `QueueTransport` — tests inject frames and
//! inspect what the module transmits.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use svio::app::events::AppEvent;
use svio::app::ports::{EventSink, PinMode, PinPort, StoragePort};
use svio::pins::CHANNEL_COUNT;
use svio::sv::{DEFAULT_ADDR_HIGH, DEFAULT_ADDR_LOW, FIRMWARE_VERSION, SV_TABLE_LEN};

// ── MemStorage ────────────────────────────────────────────────

pub struct MemStorage {
    pub bytes: [u8; SV_TABLE_LEN],
    pub writes: Vec<(usize, u8)>,
}

#[allow(dead_code)]
impl MemStorage {
    /// Erased storage, as a factory-fresh part reads.
    pub fn erased() -> Self {
        Self {
            bytes: [0xFF; SV_TABLE_LEN],
            writes: Vec::new(),
        }
    }

    /// Valid table: current version, factory address, channel records
    /// zeroed (all channels plain inputs).
    pub fn valid() -> Self {
        let mut s = Self::erased();
        s.bytes = [0u8; SV_TABLE_LEN];
        s.bytes[0] = FIRMWARE_VERSION;
        s.bytes[1] = DEFAULT_ADDR_LOW;
        s.bytes[2] = DEFAULT_ADDR_HIGH;
        s
    }

    /// Valid table with channel `n`'s record set.
    pub fn with_channel(mut self, n: usize, record: [u8; 3]) -> Self {
        self.bytes[3 + 3 * n..3 + 3 * n + 3].copy_from_slice(&record);
        self
    }
}

impl StoragePort for MemStorage {
    fn read_byte(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    fn write_byte(&mut self, index: usize, value: u8) {
        self.bytes[index] = value;
        self.writes.push((index, value));
    }
}

// ── RecordingPins ─────────────────────────────────────────────

pub struct RecordingPins {
    pub modes: [Option<PinMode>; CHANNEL_COUNT],
    pub levels: [PinState; CHANNEL_COUNT],
    pub writes: Vec<(usize, PinState)>,
}

#[allow(dead_code)]
impl RecordingPins {
    pub fn new() -> Self {
        Self {
            modes: [None; CHANNEL_COUNT],
            levels: [PinState::High; CHANNEL_COUNT], // pull-ups float high
            writes: Vec::new(),
        }
    }
}

impl PinPort for RecordingPins {
    fn set_mode(&mut self, channel: usize, mode: PinMode) {
        self.modes[channel] = Some(mode);
    }

    fn read(&self, channel: usize) -> PinState {
        self.levels[channel]
    }

    fn write(&mut self, channel: usize, state: PinState) {
        self.levels[channel] = state;
        self.writes.push((channel, state));
    }
}

// ── RecordingDelay ────────────────────────────────────────────

pub struct RecordingDelay {
    pub delays_ns: Vec<u32>,
}

#[allow(dead_code)]
impl RecordingDelay {
    pub fn new() -> Self {
        Self { delays_ns: Vec::new() }
    }

    pub fn total_ms(&self) -> u64 {
        self.delays_ns.iter().map(|&ns| u64::from(ns)).sum::<u64>() / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(ns);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
