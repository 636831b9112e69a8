//! Shared RAM image with write-through file persistence.
//!
//! Both media keep the full device contents in RAM and persist the whole
//! image to the backing file on every mutation, the way an emulated EEPROM
//! commits its sector. A blank device reads as erased flash: all `0xFF`.

use std::fs;
use std::path::PathBuf;

use crate::NvmError;

/// Erased-cell value of an EEPROM.
pub(crate) const ERASED: u8 = 0xFF;

#[derive(Debug)]
pub(crate) struct MediumImage {
    bytes: Vec<u8>,
    path: Option<PathBuf>,
}

impl MediumImage {
    /// Creates a volatile image, erased.
    pub(crate) fn in_memory(capacity: u32) -> Self {
        Self {
            bytes: vec![ERASED; capacity as usize],
            path: None,
        }
    }

    /// Opens a persistent image, reading the backing file if it exists.
    ///
    /// A short or missing file pads with erased cells; a long file is
    /// truncated to the device capacity.
    pub(crate) fn open(path: PathBuf, capacity: u32) -> Result<Self, NvmError> {
        let mut bytes = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), capacity, "no backing file, starting erased");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        bytes.resize(capacity as usize, ERASED);
        Ok(Self {
            bytes,
            path: Some(path),
        })
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.bytes.len() as u32
    }

    /// Bounds-checks an access window.
    pub(crate) fn check_range(&self, addr: u32, len: usize) -> Result<(), NvmError> {
        let end = addr as usize + len;
        if end > self.bytes.len() {
            return Err(NvmError::OutOfRange {
                addr,
                len,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    pub(crate) fn read(&self, addr: u32, len: usize) -> Result<&[u8], NvmError> {
        self.check_range(addr, len)?;
        let start = addr as usize;
        Ok(&self.bytes[start..start + len])
    }

    /// Writes and immediately persists the image. The write is on the
    /// medium when this returns.
    pub(crate) fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), NvmError> {
        self.check_range(addr, data.len())?;
        let start = addr as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        if let Some(path) = &self.path {
            fs::write(path, &self.bytes)?;
        }
        Ok(())
    }
}
