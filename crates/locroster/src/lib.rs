//! # locroster: loc catalog for a handheld throttle
//!
//! locroster persists a small catalog of locomotive control profiles
//! ("locs") and drives the speed/direction state of the active one. The
//! catalog is dense (gap-free), capacity-bounded, and address-unique, and it
//! behaves identically whether the medium underneath is byte-addressable
//! emulated EEPROM or a paged serial part with settle delays.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 UI layer                     │
//! │   (encoder, buttons, wireless: external)     │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────┐
//! │              LocManager                      │
//! │  cursor · active cache · drive state machine │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────┐
//! │          RecordStore (locroster-store)       │
//! │   layout · record codec · version gate       │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────┐
//! │          NvmBackend (locroster-nvm)          │
//! │      EmulatedNvm        PagedNvm             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Data flows bottom-up on reads and top-down on writes; the manager never
//! talks to the backend directly. Execution is single-threaded and
//! cooperative; every call blocks through its full storage transaction.

mod config;
mod error;
mod manager;
mod speed;

pub use config::{ConfigError, MediumKind, RosterConfig};
pub use error::LocError;
pub use manager::{LocManager, StoreMode};
pub use speed::{DrivePolicy, SpeedAdjust};

// Re-export the layers below so embedders need a single dependency.
pub use locroster_nvm::{EmulatedNvm, Geometry, NvmBackend, NvmError, PagedNvm};
pub use locroster_store::{FORMAT_VERSION, RecordStore, StoreConfig, StoreError, StoreOption};
pub use locroster_types::{
    DecoderSteps, Direction, FunctionAssignment, FunctionMask, LocAddress, LocName, LocRecord,
    MAX_LOCS,
};
