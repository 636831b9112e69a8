//! Roster configuration.
//!
//! One TOML file selects the medium and the store layout; composition of
//! backend → store → manager happens here, so nothing below this module
//! ever branches on the device kind.
//!
//! ```toml
//! medium = "paged"
//! image_path = "roster.img"
//! page_size = 64
//! settle_ms = 5
//! record_has_name = true
//! has_device_address = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use locroster_nvm::{EmulatedNvm, NvmBackend, PagedNvm};
use locroster_store::{FORMAT_VERSION, RecordStore, StoreConfig};

use crate::manager::LocManager;
use crate::LocError;

/// Which storage medium backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediumKind {
    /// Byte-addressable emulated EEPROM (flash-sector class).
    Emulated,
    /// Paged serial EEPROM part.
    Paged,
}

/// Roster configuration, usually loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub medium: MediumKind,
    /// Backing file for the device image; `None` keeps it volatile.
    pub image_path: Option<PathBuf>,
    /// Device size in bytes; `None` picks the medium's usual size
    /// (4 KiB emulated sector, 32 KiB serial part).
    pub capacity_bytes: Option<u32>,
    /// Write-page size of a paged part.
    pub page_size: u16,
    /// Write-settle delay of a paged part, in milliseconds.
    pub settle_ms: u64,
    pub format_version: u8,
    pub record_has_name: bool,
    pub has_device_address: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            medium: MediumKind::Emulated,
            image_path: None,
            capacity_bytes: None,
            page_size: 64,
            settle_ms: 5,
            format_version: FORMAT_VERSION,
            record_has_name: true,
            has_device_address: false,
        }
    }
}

impl RosterConfig {
    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Resolved device capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity_bytes.unwrap_or(match self.medium {
            MediumKind::Emulated => 4096,
            MediumKind::Paged => 32 * 1024,
        })
    }

    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            expected_version: self.format_version,
            record_has_name: self.record_has_name,
            has_device_address: self.has_device_address,
        }
    }

    /// Opens the configured storage medium.
    pub fn open_backend(&self) -> Result<Box<dyn NvmBackend>, LocError> {
        let capacity = self.capacity();
        Ok(match (self.medium, &self.image_path) {
            (MediumKind::Emulated, Some(path)) => Box::new(EmulatedNvm::open(path, capacity)?),
            (MediumKind::Emulated, None) => Box::new(EmulatedNvm::in_memory(capacity)),
            (MediumKind::Paged, Some(path)) => Box::new(PagedNvm::open(
                path,
                capacity,
                self.page_size,
                Duration::from_millis(self.settle_ms),
            )?),
            (MediumKind::Paged, None) => Box::new(PagedNvm::in_memory(
                capacity,
                self.page_size,
                Duration::from_millis(self.settle_ms),
            )),
        })
    }

    /// Composes backend → store → manager and brings up the catalog.
    pub fn open(&self) -> Result<LocManager<Box<dyn NvmBackend>>, LocError> {
        let backend = self.open_backend()?;
        let store = RecordStore::open(backend, self.store_config())?;
        LocManager::initialize(store)
    }
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}
