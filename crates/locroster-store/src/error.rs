//! Record store error types.

use locroster_nvm::NvmError;

use crate::store::StoreOption;

/// Errors from the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend transaction failed.
    #[error(transparent)]
    Nvm(#[from] NvmError),

    /// Direct index at or past the store capacity. A caller contract
    /// violation: surfaced, never recovered internally.
    #[error("record index {index} out of range (capacity {capacity})")]
    InvalidIndex { index: u8, capacity: u8 },

    /// The requested option byte is not part of this store's layout.
    #[error("option {option:?} is not present on this store layout")]
    UnsupportedOption { option: StoreOption },

    /// A record image does not fit inside one write page.
    #[error("record image of {record_len} bytes exceeds the {page_size}-byte page")]
    RecordTooLarge { record_len: usize, page_size: u16 },

    /// The device is too small for the full catalog.
    #[error("layout needs {required} bytes but the device has {available}")]
    InsufficientCapacity { required: u32, available: u32 },

    /// Stored direction byte decodes to no valid direction.
    #[error("invalid direction byte {byte:#04x} in record {index}")]
    InvalidDirection { byte: u8, index: u8 },

    /// Stored step-mode byte decodes to no valid step mode.
    #[error("invalid step-mode byte {byte:#04x} in record {index}")]
    InvalidStepMode { byte: u8, index: u8 },
}
