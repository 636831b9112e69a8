//! The record store: persisted layout over one NVM backend.
//!
//! The store computes its field offsets once at open time from the backend's
//! [`Geometry`] and the [`StoreConfig`], then never branches on the device
//! kind again. Every record read or write is one self-contained backend
//! transaction sequence; no two records are ever batched into one.

use locroster_nvm::{Geometry, NvmBackend};
use locroster_types::{LocRecord, MAX_LOCS};

use crate::codec;
use crate::StoreError;

/// Current persisted-format version tag.
///
/// Bumping this reinitializes every device on next boot. A one-shot
/// migration gate, not a schema migrator.
pub const FORMAT_VERSION: u8 = 2;

/// The option bytes in the store header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOption {
    /// Direction changes gated behind an explicit control.
    AcControl,
    /// Emergency-stop behavior.
    EmergencyStop,
    /// Bus address of the device itself; present only on layouts configured
    /// with one.
    DeviceAddress,
}

/// Store layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Version tag a valid image must carry.
    pub expected_version: u8,
    /// Whether records carry a name field.
    pub record_has_name: bool,
    /// Whether the header carries a device-protocol address byte.
    pub has_device_address: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            expected_version: FORMAT_VERSION,
            record_has_name: true,
            has_device_address: false,
        }
    }
}

/// Field offsets, computed once at open.
#[derive(Debug, Clone, Copy)]
struct Layout {
    version_at: u32,
    ac_at: u32,
    emergency_at: u32,
    device_at: Option<u32>,
    count_at: u32,
    records_at: u32,
    record_len: usize,
    stride: u32,
}

impl Layout {
    fn compute(config: StoreConfig, geometry: Geometry) -> Result<Self, StoreError> {
        let record_len = codec::record_len(config.record_has_name);

        // A record must be writable in one in-page transaction.
        if let Some(page) = geometry.page_size {
            if record_len > usize::from(page) {
                return Err(StoreError::RecordTooLarge {
                    record_len,
                    page_size: page,
                });
            }
        }

        let device_at = config.has_device_address.then_some(3);
        let count_at = if device_at.is_some() { 4 } else { 3 };
        let records_at = geometry.page_round_up(count_at + 1);
        let stride = geometry.page_round_up(record_len as u32);

        let required = records_at + stride * u32::from(MAX_LOCS);
        if required > geometry.capacity {
            return Err(StoreError::InsufficientCapacity {
                required,
                available: geometry.capacity,
            });
        }

        Ok(Self {
            version_at: 0,
            ac_at: 1,
            emergency_at: 2,
            device_at,
            count_at,
            records_at,
            record_len,
            stride,
        })
    }
}

/// The record store.
///
/// Generic over its [`NvmBackend`]; the concrete medium is chosen by
/// composition, never by branching inside the store.
#[derive(Debug)]
pub struct RecordStore<B> {
    backend: B,
    config: StoreConfig,
    layout: Layout,
}

impl<B: NvmBackend> RecordStore<B> {
    /// Opens the store over a backend.
    ///
    /// Computes the layout and validates the geometry. Performs no format
    /// validation of the stored image; that is [`Self::version_check`]'s
    /// job, invoked by the boot path.
    pub fn open(backend: B, config: StoreConfig) -> Result<Self, StoreError> {
        let layout = Layout::compute(config, backend.geometry())?;
        tracing::debug!(
            records_at = layout.records_at,
            stride = layout.stride,
            record_len = layout.record_len,
            "record store opened"
        );
        Ok(Self {
            backend,
            config,
            layout,
        })
    }

    /// Compares the stored format tag to the expected one.
    ///
    /// On mismatch the expected tag is written and `false` is returned: the
    /// caller must reinitialize the catalog. A one-shot migration gate.
    pub fn version_check(&mut self) -> Result<bool, StoreError> {
        let stored = self.backend.read_byte(self.layout.version_at)?;
        if stored == self.config.expected_version {
            return Ok(true);
        }
        tracing::info!(
            stored,
            expected = self.config.expected_version,
            "format version mismatch, tagging image for reinitialization"
        );
        self.backend
            .write_byte(self.layout.version_at, self.config.expected_version)?;
        Ok(false)
    }

    /// Reads an option byte.
    pub fn option_get(&mut self, option: StoreOption) -> Result<u8, StoreError> {
        let addr = self.option_addr(option)?;
        Ok(self.backend.read_byte(addr)?)
    }

    /// Writes an option byte.
    pub fn option_set(&mut self, option: StoreOption, value: u8) -> Result<(), StoreError> {
        let addr = self.option_addr(option)?;
        self.backend.write_byte(addr, value)?;
        Ok(())
    }

    /// Reads the stored record count.
    pub fn count_get(&mut self) -> Result<u8, StoreError> {
        Ok(self.backend.read_byte(self.layout.count_at)?)
    }

    /// Writes the record count.
    pub fn count_set(&mut self, count: u8) -> Result<(), StoreError> {
        self.backend.write_byte(self.layout.count_at, count)?;
        Ok(())
    }

    /// Reads the record at `index`.
    ///
    /// The caller guarantees `index` addresses a live record; anything at or
    /// past the capacity is [`StoreError::InvalidIndex`].
    pub fn record_get(&mut self, index: u8) -> Result<LocRecord, StoreError> {
        let addr = self.record_addr(index)?;
        let image = self.backend.read_block(addr, self.layout.record_len)?;
        codec::decode(&image, self.config.record_has_name, index)
    }

    /// Writes the record at `index` as one self-contained transaction.
    pub fn record_set(&mut self, index: u8, record: &LocRecord) -> Result<(), StoreError> {
        let addr = self.record_addr(index)?;
        let image = codec::encode(record, self.config.record_has_name);
        tracing::trace!(index, addr, "writing record");
        self.backend.write_block(addr, &image)?;
        Ok(())
    }

    /// Fills the whole device with erased cells, invalidating the format
    /// tag. The explicit whole-store erase; everything is gone.
    pub fn erase(&mut self) -> Result<(), StoreError> {
        let geometry = self.backend.geometry();
        let chunk = geometry.page_size.map_or(geometry.capacity, u32::from);
        let fill = vec![0xFF; chunk as usize];

        let mut addr = 0;
        while addr < geometry.capacity {
            let len = chunk.min(geometry.capacity - addr) as usize;
            self.backend.write_block(addr, &fill[..len])?;
            addr += chunk;
        }
        tracing::warn!(capacity = geometry.capacity, "device image erased");
        Ok(())
    }

    /// Catalog capacity in records.
    pub fn capacity(&self) -> u8 {
        MAX_LOCS
    }

    /// Storage span reserved per record.
    pub fn stride(&self) -> u32 {
        self.layout.stride
    }

    /// Whether records on this store carry a name field.
    pub fn record_has_name(&self) -> bool {
        self.config.record_has_name
    }

    fn option_addr(&self, option: StoreOption) -> Result<u32, StoreError> {
        match option {
            StoreOption::AcControl => Ok(self.layout.ac_at),
            StoreOption::EmergencyStop => Ok(self.layout.emergency_at),
            StoreOption::DeviceAddress => self
                .layout
                .device_at
                .ok_or(StoreError::UnsupportedOption { option }),
        }
    }

    fn record_addr(&self, index: u8) -> Result<u32, StoreError> {
        if index >= MAX_LOCS {
            return Err(StoreError::InvalidIndex {
                index,
                capacity: MAX_LOCS,
            });
        }
        Ok(self.layout.records_at + self.layout.stride * u32::from(index))
    }
}
