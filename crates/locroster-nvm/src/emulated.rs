//! Byte-addressable emulated EEPROM.
//!
//! Models the flash-sector EEPROM emulation small WiFi modules provide: the
//! whole device is a RAM image, and every write commits the image back to
//! the backing file. Block writes may span any range; there are no pages
//! and no settle delay.

use std::path::PathBuf;

use bytes::Bytes;

use crate::backend::{Geometry, NvmBackend};
use crate::image::MediumImage;
use crate::NvmError;

/// Byte-addressable emulated NVM.
///
/// Use [`EmulatedNvm::in_memory`] for tests and [`EmulatedNvm::open`] for a
/// persistent image.
#[derive(Debug)]
pub struct EmulatedNvm {
    image: MediumImage,
}

impl EmulatedNvm {
    /// Creates a volatile device of `capacity` bytes, erased.
    pub fn in_memory(capacity: u32) -> Self {
        Self {
            image: MediumImage::in_memory(capacity),
        }
    }

    /// Opens a persistent device backed by `path`.
    pub fn open(path: impl Into<PathBuf>, capacity: u32) -> Result<Self, NvmError> {
        Ok(Self {
            image: MediumImage::open(path.into(), capacity)?,
        })
    }
}

impl NvmBackend for EmulatedNvm {
    fn read_byte(&mut self, addr: u32) -> Result<u8, NvmError> {
        Ok(self.image.read(addr, 1)?[0])
    }

    fn write_byte(&mut self, addr: u32, byte: u8) -> Result<(), NvmError> {
        self.image.write(addr, &[byte])
    }

    fn read_block(&mut self, addr: u32, len: usize) -> Result<Bytes, NvmError> {
        Ok(Bytes::copy_from_slice(self.image.read(addr, len)?))
    }

    fn write_block(&mut self, addr: u32, data: &[u8]) -> Result<(), NvmError> {
        self.image.write(addr, data)
    }

    fn geometry(&self) -> Geometry {
        Geometry {
            capacity: self.image.capacity(),
            page_size: None,
        }
    }
}
