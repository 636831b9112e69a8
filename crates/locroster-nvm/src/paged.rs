//! Paged serial EEPROM.
//!
//! Models an externally attached EEPROM part (the 32 KiB / 64-byte-page
//! class of serial chips): a block write must fit inside one write page, and
//! the part needs a settle delay after every write before it accepts the
//! next transaction. Reads are sequential-capable and may cross pages.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use bytes::Bytes;

use crate::backend::{Geometry, NvmBackend};
use crate::image::MediumImage;
use crate::NvmError;

/// Paged NVM with mandatory write-settle delay.
///
/// Pass [`Duration::ZERO`] as the settle delay in tests; real parts settle
/// for several milliseconds.
#[derive(Debug)]
pub struct PagedNvm {
    image: MediumImage,
    page_size: u16,
    settle: Duration,
}

impl PagedNvm {
    /// Creates a volatile paged device, erased.
    pub fn in_memory(capacity: u32, page_size: u16, settle: Duration) -> Self {
        Self {
            image: MediumImage::in_memory(capacity),
            page_size,
            settle,
        }
    }

    /// Opens a persistent paged device backed by `path`.
    pub fn open(
        path: impl Into<PathBuf>,
        capacity: u32,
        page_size: u16,
        settle: Duration,
    ) -> Result<Self, NvmError> {
        Ok(Self {
            image: MediumImage::open(path.into(), capacity)?,
            page_size,
            settle,
        })
    }

    /// Rejects block writes that would cross a page boundary.
    fn check_page(&self, addr: u32, len: usize) -> Result<(), NvmError> {
        if len == 0 {
            return Ok(());
        }
        let page = u32::from(self.page_size);
        let first = addr / page;
        let last = (addr + len as u32 - 1) / page;
        if first != last {
            return Err(NvmError::PageOverrun {
                addr,
                len,
                page_size: self.page_size,
            });
        }
        Ok(())
    }

    /// Blocks for the part's write-settle time.
    fn settle(&self) {
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
    }
}

impl NvmBackend for PagedNvm {
    fn read_byte(&mut self, addr: u32) -> Result<u8, NvmError> {
        Ok(self.image.read(addr, 1)?[0])
    }

    fn write_byte(&mut self, addr: u32, byte: u8) -> Result<(), NvmError> {
        self.image.write(addr, &[byte])?;
        self.settle();
        Ok(())
    }

    fn read_block(&mut self, addr: u32, len: usize) -> Result<Bytes, NvmError> {
        Ok(Bytes::copy_from_slice(self.image.read(addr, len)?))
    }

    fn write_block(&mut self, addr: u32, data: &[u8]) -> Result<(), NvmError> {
        self.check_page(addr, data.len())?;
        self.image.write(addr, data)?;
        self.settle();
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        Geometry {
            capacity: self.image.capacity(),
            page_size: Some(self.page_size),
        }
    }
}
