//! SV configuration table.
//!
//! The module's entire configuration is a 51-byte table mirrored from
//! persistent storage: three identity bytes followed by sixteen 3-byte
//! channel records. Every byte is one remotely addressable "system
//! variable" (SV).
//!
//! | offset   | contents                          |
//! |----------|-----------------------------------|
//! | 0        | firmware version                  |
//! | 1        | module address, low byte          |
//! | 2        | module address, high byte         |
//! | 3 + 3n   | channel n: cnfg, value1, value2   |
//!
//! Mutations flow through [`SvTable::write_byte`] (SV write commands,
//! persisted synchronously) with one exception: the per-channel
//! level-memory bit is updated in the mirror only, via
//! [`SvTable::set_input_level`].

use log::info;

use crate::app::ports::StoragePort;
use crate::channels::ChannelConfig;
use crate::pins::CHANNEL_COUNT;

/// Total table length in bytes.
pub const SV_TABLE_LEN: usize = 3 + 3 * CHANNEL_COUNT;

/// Version byte baked into this firmware build.
pub const FIRMWARE_VERSION: u8 = 101;

/// Factory-default module address (low byte).
pub const DEFAULT_ADDR_LOW: u8 = 81;
/// Factory-default module address (high byte).
pub const DEFAULT_ADDR_HIGH: u8 = 1;

/// SV index of the version byte.
pub const SV_VERSION: usize = 0;
/// SV index of the low address byte.
pub const SV_ADDR_LOW: usize = 1;
/// SV index of the high address byte.
pub const SV_ADDR_HIGH: usize = 2;

/// First channel record starts right after the identity bytes.
const CHANNEL_BASE: usize = 3;
/// Bytes per channel record.
const CHANNEL_STRIDE: usize = 3;

/// The module's bus identity, snapshotted from the table.
///
/// Used both for packet-destination filtering and as the source fields
/// echoed in SV responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleIdentity {
    pub version: u8,
    pub addr_low: u8,
    pub addr_high: u8,
}

/// In-memory mirror of the persisted SV table.
pub struct SvTable {
    data: [u8; SV_TABLE_LEN],
}

impl SvTable {
    /// Populate the mirror by reading every byte from persistent storage.
    pub fn load(storage: &impl StoragePort) -> Self {
        let mut data = [0u8; SV_TABLE_LEN];
        for (index, byte) in data.iter_mut().enumerate() {
            *byte = storage.read_byte(index);
        }
        Self { data }
    }

    /// Version check against the running firmware.
    ///
    /// On mismatch, resets the three identity bytes to factory defaults,
    /// persists exactly those three bytes, and returns the foreign version
    /// byte. Channel records are left as stored — a table written by an
    /// older layout keeps its bytes until reconfigured over the bus.
    pub fn validate(&mut self, storage: &mut impl StoragePort) -> Option<u8> {
        let stored = self.data[SV_VERSION];
        if stored == FIRMWARE_VERSION {
            return None;
        }
        self.data[SV_VERSION] = FIRMWARE_VERSION;
        self.data[SV_ADDR_LOW] = DEFAULT_ADDR_LOW;
        self.data[SV_ADDR_HIGH] = DEFAULT_ADDR_HIGH;
        storage.write_byte(SV_VERSION, FIRMWARE_VERSION);
        storage.write_byte(SV_ADDR_LOW, DEFAULT_ADDR_LOW);
        storage.write_byte(SV_ADDR_HIGH, DEFAULT_ADDR_HIGH);
        info!(
            "SV table version {} != firmware {}, identity reset to {}/{}",
            stored, FIRMWARE_VERSION, DEFAULT_ADDR_LOW, DEFAULT_ADDR_HIGH
        );
        Some(stored)
    }

    /// Read one byte. Out-of-range indices read as 0, so an SV read close
    /// to the table end degrades instead of faulting.
    pub fn get(&self, index: usize) -> u8 {
        self.data.get(index).copied().unwrap_or(0)
    }

    /// The 3-byte payload of an SV read response.
    pub fn read3(&self, index: usize) -> [u8; 3] {
        [self.get(index), self.get(index + 1), self.get(index + 2)]
    }

    /// Update one byte in the mirror and persist it synchronously.
    /// Out-of-range writes are ignored.
    pub fn write_byte(&mut self, index: usize, value: u8, storage: &mut impl StoragePort) {
        if let Some(byte) = self.data.get_mut(index) {
            *byte = value;
            storage.write_byte(index, value);
        }
    }

    /// Snapshot of the identity bytes.
    pub fn identity(&self) -> ModuleIdentity {
        ModuleIdentity {
            version: self.data[SV_VERSION],
            addr_low: self.data[SV_ADDR_LOW],
            addr_high: self.data[SV_ADDR_HIGH],
        }
    }

    /// Snapshot of channel `n`'s 3-byte record.
    ///
    /// Callers index `0..CHANNEL_COUNT`; the engine never goes past that.
    pub fn channel(&self, n: usize) -> ChannelConfig {
        let base = CHANNEL_BASE + n * CHANNEL_STRIDE;
        ChannelConfig {
            cnfg: self.data[base],
            value1: self.data[base + 1],
            value2: self.data[base + 2],
        }
    }

    /// Record the last observed electrical level of input channel `n`.
    ///
    /// Mirror-only: the level-memory bit shares the persisted record but
    /// is ephemeral state, not configuration.
    pub fn set_input_level(&mut self, n: usize, level: bool) {
        let idx = CHANNEL_BASE + n * CHANNEL_STRIDE + 2;
        if level {
            self.data[idx] |= ChannelConfig::LEVEL_MASK;
        } else {
            self.data[idx] &= !ChannelConfig::LEVEL_MASK;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MemStorage {
        bytes: [u8; SV_TABLE_LEN],
        writes: Vec<(usize, u8)>,
    }

    impl MemStorage {
        fn erased() -> Self {
            Self {
                bytes: [0xFF; SV_TABLE_LEN],
                writes: Vec::new(),
            }
        }

        fn valid() -> Self {
            let mut s = Self::erased();
            s.bytes[SV_VERSION] = FIRMWARE_VERSION;
            s.bytes[SV_ADDR_LOW] = DEFAULT_ADDR_LOW;
            s.bytes[SV_ADDR_HIGH] = DEFAULT_ADDR_HIGH;
            s
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

    #[test]
    fn validate_resets_identity_but_not_channel_records() {
        let mut storage = MemStorage::erased();
        let mut table = SvTable::load(&storage);

        assert_eq!(table.validate(&mut storage), Some(0xFF));
        assert_eq!(
            table.identity(),
            ModuleIdentity {
                version: FIRMWARE_VERSION,
                addr_low: DEFAULT_ADDR_LOW,
                addr_high: DEFAULT_ADDR_HIGH
            }
        );
        // Exactly the three identity bytes were persisted.
        assert_eq!(
            storage.writes,
            vec![
                (SV_VERSION, FIRMWARE_VERSION),
                (SV_ADDR_LOW, DEFAULT_ADDR_LOW),
                (SV_ADDR_HIGH, DEFAULT_ADDR_HIGH)
            ]
        );
        // Channel records keep their stale bytes.
        assert_eq!(table.get(3), 0xFF);
        assert_eq!(storage.bytes[3], 0xFF);
    }

    #[test]
    fn validate_leaves_matching_table_untouched() {
        let mut storage = MemStorage::valid();
        storage.bytes[5] = 0x2A;
        let mut table = SvTable::load(&storage);

        assert_eq!(table.validate(&mut storage), None);
        assert!(storage.writes.is_empty());
        assert_eq!(table.get(5), 0x2A);
    }

    #[test]
    fn write_byte_persists_and_ignores_out_of_range() {
        let mut storage = MemStorage::valid();
        let mut table = SvTable::load(&storage);

        table.write_byte(5, 0x2A, &mut storage);
        assert_eq!(table.get(5), 0x2A);
        assert_eq!(storage.bytes[5], 0x2A);

        table.write_byte(SV_TABLE_LEN, 0x55, &mut storage);
        assert_eq!(storage.writes, vec![(5, 0x2A)]);
    }

    #[test]
    fn reads_past_the_table_end_return_zero() {
        let storage = MemStorage::valid();
        let table = SvTable::load(&storage);
        assert_eq!(table.read3(SV_TABLE_LEN - 1), [0xFF, 0, 0]);
    }

    #[test]
    fn input_level_updates_stay_in_memory() {
        let mut storage = MemStorage::valid();
        storage.bytes[5] = 0x00; // channel 0 value2
        let mut table = SvTable::load(&storage);

        table.set_input_level(0, true);
        assert!(table.channel(0).last_level());
        table.set_input_level(0, false);
        assert!(!table.channel(0).last_level());
        // Never persisted.
        assert!(storage.writes.is_empty());
    }
}
