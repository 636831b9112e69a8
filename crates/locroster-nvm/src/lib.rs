//! # locroster-nvm: NVM Backend Abstraction for locroster
//!
//! This crate provides a trait-based abstraction over the non-volatile
//! memory a throttle stores its loc catalog in, so the record layer behaves
//! identically on either medium:
//!
//! - **[`EmulatedNvm`]**: byte-addressable emulated EEPROM, a RAM image
//!   written through to a backing file on every mutation
//! - **[`PagedNvm`]**: a paged serial EEPROM part; block writes must stay
//!   inside one page, and every write is followed by a settle delay
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │      locroster-store     │
//! │  (uses NvmBackend trait) │
//! └────────────┬─────────────┘
//!              │
//! ┌────────────┴─────────────┐
//! │       locroster-nvm      │
//! │  ┌──────────┐ ┌────────┐ │
//! │  │ Emulated │ │ Paged  │ │
//! │  │   Nvm    │ │  Nvm   │ │
//! │  └──────────┘ └────────┘ │
//! └──────────────────────────┘
//! ```
//!
//! All operations are synchronous and block for the full transaction,
//! including the settle delay on paged parts. There is no caching layer and
//! no queued-write path.

mod backend;
mod emulated;
mod error;
mod image;
mod paged;

pub use backend::{Geometry, NvmBackend};
pub use emulated::EmulatedNvm;
pub use error::NvmError;
pub use paged::PagedNvm;
