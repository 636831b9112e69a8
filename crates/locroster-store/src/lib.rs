//! # locroster-store: Record store for the loc catalog
//!
//! Maps the logical persisted layout (format tag, option bytes, record
//! count, record array) onto [`NvmBackend`](locroster_nvm::NvmBackend)
//! addresses, hiding the differences between byte-addressable and paged
//! media behind one record-addressing scheme.
//!
//! # Persisted Layout
//!
//! ```text
//! ┌──────────┬─────────┬───────────┬──────────────┬───────┬─────────────────┐
//! │ version  │ AC flag │ emergency │ device addr  │ count │ record array    │
//! │  1 B     │  1 B    │  1 B      │ 1 B, optional│  1 B  │ count × stride  │
//! └──────────┴─────────┴───────────┴──────────────┴───────┴─────────────────┘
//! ```
//!
//! On paged media the record array starts at a page boundary and each record
//! occupies one full page (stride = page size), so a record write is a
//! single in-page transaction. On byte-addressable media the stride is the
//! raw record size.
//!
//! # What this layer does NOT do
//!
//! A record torn by power loss mid-write is neither detected nor repaired:
//! there are no checksums and no sentinels. The layer above treats whatever
//! decodes as the record's state.

mod codec;
mod error;
mod store;

pub use error::StoreError;
pub use store::{FORMAT_VERSION, RecordStore, StoreConfig, StoreOption};
