//! Catalog operation error types.

use locroster_nvm::NvmError;
use locroster_store::StoreError;
use locroster_types::LocAddress;

/// Errors from catalog operations.
///
/// Every failure surfaces as an explicit result from the operation that hit
/// it; nothing here panics or propagates unchecked.
#[derive(Debug, thiserror::Error)]
pub enum LocError {
    /// Change or remove targeted an address not in the catalog.
    #[error("no loc with address {address} in the catalog")]
    NotFound { address: LocAddress },

    /// Add targeted an address already in the catalog.
    #[error("loc address {address} is already in the catalog")]
    DuplicateAddress { address: LocAddress },

    /// Add attempted on a full catalog.
    #[error("catalog is full ({capacity} locs)")]
    CapacityExceeded { capacity: u8 },

    /// Remove attempted with a single loc left. The catalog never empties.
    #[error("cannot remove the last remaining loc")]
    LastLoc,

    /// Direct index at or past the live record count. A caller contract
    /// violation: surfaced, never recovered internally.
    #[error("record index {index} out of range (count {count})")]
    InvalidIndex { index: u8, count: u8 },

    /// The record store failed underneath.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The storage medium failed underneath.
    #[error(transparent)]
    Nvm(#[from] NvmError),
}
