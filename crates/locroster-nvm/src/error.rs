//! NVM backend error types.

/// Errors from an NVM backend.
///
/// A failed transaction is always reported to the caller; retry policy is a
/// caller decision.
#[derive(Debug, thiserror::Error)]
pub enum NvmError {
    /// The backing medium's transaction failed.
    #[error("NVM I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Access past the end of the device.
    #[error("access out of range: {len} bytes at {addr} on a {capacity}-byte device")]
    OutOfRange { addr: u32, len: usize, capacity: u32 },

    /// A block write would cross a page boundary on a paged device.
    #[error("block write of {len} bytes at {addr} crosses a {page_size}-byte page boundary")]
    PageOverrun { addr: u32, len: usize, page_size: u16 },
}
