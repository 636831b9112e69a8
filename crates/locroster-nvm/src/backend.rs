//! NVM backend trait.
//!
//! The [`NvmBackend`] trait abstracts the storage medium behind the loc
//! catalog so the record layer above it never branches on the device kind.
//! The differences that matter to callers, paging and addressable size,
//! are exposed once through [`Geometry`].

use bytes::Bytes;

use crate::NvmError;

/// Addressing shape of a backend.
///
/// `page_size: None` means the device is byte-addressable and block writes
/// may span any range. `Some(p)` means block writes must stay inside one
/// `p`-byte page; callers align their layout accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Total addressable bytes.
    pub capacity: u32,
    /// Write-page size, if the device is paged.
    pub page_size: Option<u16>,
}

impl Geometry {
    /// Rounds `value` up to the device's page size; identity on
    /// byte-addressable devices.
    pub fn page_round_up(&self, value: u32) -> u32 {
        match self.page_size {
            Some(page) => {
                let page = u32::from(page);
                value.div_ceil(page) * page
            }
            None => value,
        }
    }
}

/// Abstraction over one physical non-volatile storage medium.
///
/// Every call is synchronous and blocks for the full hardware transaction,
/// including any settle delay the device mandates after a write. There is no
/// internal caching: a completed write is on the medium.
///
/// Execution is single-threaded by design; implementations are not required
/// to be `Send` or `Sync`.
pub trait NvmBackend {
    /// Reads one byte.
    fn read_byte(&mut self, addr: u32) -> Result<u8, NvmError>;

    /// Writes one byte.
    fn write_byte(&mut self, addr: u32, byte: u8) -> Result<(), NvmError>;

    /// Reads `len` bytes starting at `addr`. Reads may cross page
    /// boundaries on paged devices (sequential-read capable parts).
    fn read_block(&mut self, addr: u32, len: usize) -> Result<Bytes, NvmError>;

    /// Writes a block starting at `addr`.
    ///
    /// On paged devices the block must not cross a page boundary
    /// ([`NvmError::PageOverrun`] otherwise); callers align block addresses
    /// to the page size.
    fn write_block(&mut self, addr: u32, data: &[u8]) -> Result<(), NvmError>;

    /// Returns the addressing shape of this device.
    fn geometry(&self) -> Geometry;
}

impl<B: NvmBackend + ?Sized> NvmBackend for Box<B> {
    fn read_byte(&mut self, addr: u32) -> Result<u8, NvmError> {
        (**self).read_byte(addr)
    }

    fn write_byte(&mut self, addr: u32, byte: u8) -> Result<(), NvmError> {
        (**self).write_byte(addr, byte)
    }

    fn read_block(&mut self, addr: u32, len: usize) -> Result<Bytes, NvmError> {
        (**self).read_block(addr, len)
    }

    fn write_block(&mut self, addr: u32, data: &[u8]) -> Result<(), NvmError> {
        (**self).write_block(addr, data)
    }

    fn geometry(&self) -> Geometry {
        (**self).geometry()
    }
}
