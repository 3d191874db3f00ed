//! File-backed persistent store.
//!
//! EEPROM stand-in for the host: the 51-byte SV table lives in a plain
//! file, rewritten synchronously on every byte write. Fresh storage reads
//! as 0xFF — the erased-cell convention — which fails version validation
//! and triggers the identity reset on first boot.
//!
//! Write failures are logged and swallowed: the store contract is
//! best-effort durability with no failure signaling, and the module keeps
//! running on its in-memory mirror.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::app::ports::StoragePort;
use crate::sv::SV_TABLE_LEN;

/// Byte table persisted to a host file.
pub struct FileStorage {
    path: PathBuf,
    bytes: [u8; SV_TABLE_LEN],
}

impl FileStorage {
    /// Open (or create) the backing file. Short or unreadable files fall
    /// back to the erased pattern.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut bytes = [0xFF; SV_TABLE_LEN];
        match fs::read(&path) {
            Ok(contents) if contents.len() >= SV_TABLE_LEN => {
                bytes.copy_from_slice(&contents[..SV_TABLE_LEN]);
                info!("storage: loaded {} bytes from {}", SV_TABLE_LEN, path.display());
            }
            Ok(_) => {
                info!("storage: {} too short, starting erased", path.display());
            }
            Err(_) => {
                info!("storage: {} absent, starting erased", path.display());
            }
        }
        Self { path, bytes }
    }

    fn flush(&self) {
        if let Err(e) = fs::write(&self.path, self.bytes) {
            warn!("storage: persist to {} failed: {}", self.path.display(), e);
        }
    }
}

impl StoragePort for FileStorage {
    fn read_byte(&self, index: usize) -> u8 {
        self.bytes.get(index).copied().unwrap_or(0xFF)
    }

    fn write_byte(&mut self, index: usize, value: u8) {
        if let Some(byte) = self.bytes.get_mut(index) {
            *byte = value;
            self.flush();
        }
    }
}
