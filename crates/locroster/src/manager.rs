//! The loc manager: catalog business rules over the record store.
//!
//! [`LocManager`] owns its [`RecordStore`] by value plus the only mutable
//! state in the system: the active-record cache, the selection cursor, the
//! cached count, and the live drive policy. One instance, one execution
//! context, no hidden process-wide state.
//!
//! # Invariants
//!
//! - The catalog is dense: records occupy indices `[0, count)` with no gaps
//! - `count` stays in `1..=`[`MAX_LOCS`]; the catalog never empties
//! - Addresses are unique across the catalog
//! - The cursor stays in `[0, count)` across any operation sequence

use locroster_nvm::NvmBackend;
use locroster_store::{RecordStore, StoreOption};
use locroster_types::{
    DecoderSteps, Direction, FunctionAssignment, FunctionMask, LocAddress, LocName, LocRecord,
    MAX_LOCS,
};

use crate::speed::{self, DrivePolicy, SpeedAdjust};
use crate::LocError;

/// How [`LocManager::store_record`] treats the given address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Append a new loc and make it the active one.
    Add,
    /// Append a new loc, leaving the selection alone.
    AddNoAutoSelect,
    /// Update an existing loc's button binding (and name) in place.
    Change,
}

/// The catalog manager.
pub struct LocManager<B> {
    store: RecordStore<B>,
    /// Cache of the record at the cursor (drive state lives here).
    active: LocRecord,
    count: u8,
    cursor: u8,
    policy: DrivePolicy,
}

impl<B: NvmBackend> LocManager<B> {
    /// Brings up the catalog from storage. Invoked exactly once at boot.
    ///
    /// A failed version gate seeds the catalog with the single default loc
    /// and switches both options off. A stored count outside `1..=64` is
    /// treated as corrupt and repaired to 1, a format-level repair rather
    /// than an error.
    pub fn initialize(mut store: RecordStore<B>) -> Result<Self, LocError> {
        if !store.version_check()? {
            let seed = LocRecord::default_seed();
            store.record_set(0, &seed)?;
            store.count_set(1)?;
            store.option_set(StoreOption::AcControl, 0)?;
            store.option_set(StoreOption::EmergencyStop, 0)?;
            tracing::info!(address = %seed.address, "seeded blank catalog with the default loc");
        }

        let policy = DrivePolicy::from_ac_option(store.option_get(StoreOption::AcControl)? == 1);
        let active = store.record_get(0)?;
        let mut count = store.count_get()?;
        if count == 0 || count > MAX_LOCS {
            tracing::warn!(count, "corrupt record count, repairing to 1");
            store.count_set(1)?;
            count = 1;
        }

        Ok(Self {
            store,
            active,
            count,
            cursor: 0,
            policy,
        })
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Moves the selection one position and reloads the active cache.
    ///
    /// A positive delta advances (wrapping to 0 past the end), a negative
    /// one retreats (wrapping to `count - 1` before the start); zero is a
    /// no-op.
    pub fn select(&mut self, delta: i8) -> Result<(), LocError> {
        if delta == 0 {
            return Ok(());
        }
        if delta > 0 {
            self.cursor += 1;
            if self.cursor >= self.count {
                self.cursor = 0;
            }
        } else if self.cursor == 0 {
            self.cursor = self.count - 1;
        } else {
            self.cursor -= 1;
        }
        self.active = self.store.record_get(self.cursor)?;
        Ok(())
    }

    /// [`Self::select`], returning the newly active address.
    pub fn next_loc_address(&mut self, delta: i8) -> Result<LocAddress, LocError> {
        self.select(delta)?;
        Ok(self.active.address)
    }

    /// Reloads the active cache from an arbitrary live slot without moving
    /// the cursor (list-browsing UIs page through the catalog this way).
    pub fn load_by_index(&mut self, index: u8) -> Result<&LocRecord, LocError> {
        if index >= self.count {
            return Err(LocError::InvalidIndex {
                index,
                count: self.count,
            });
        }
        self.active = self.store.record_get(index)?;
        Ok(&self.active)
    }

    // ========================================================================
    // Drive state
    // ========================================================================

    /// Applies one speed-dial event to the active loc.
    ///
    /// Returns `None` when nothing changed; see [`speed::adjust`] for the
    /// policy rules. Drive state is runtime state and is never persisted
    /// here.
    pub fn adjust_speed(&mut self, delta: i8) -> Option<SpeedAdjust> {
        speed::adjust(&mut self.active, self.policy, delta)
    }

    pub fn speed(&self) -> u16 {
        self.active.speed
    }

    /// Writes the active loc's speed directly (protocol feedback path).
    pub fn set_speed(&mut self, speed: u16) {
        self.active.speed = speed;
    }

    pub fn direction(&self) -> Direction {
        self.active.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.active.direction = direction;
    }

    pub fn toggle_direction(&mut self) {
        self.active.direction = self.active.direction.opposite();
    }

    pub fn decoder_steps(&self) -> DecoderSteps {
        self.active.steps
    }

    pub fn set_decoder_steps(&mut self, steps: DecoderSteps) {
        self.active.steps = steps;
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Toggles function `n` on the active loc.
    pub fn toggle_function(&mut self, n: u8) {
        self.active.functions.toggle(n);
    }

    /// Replaces the active loc's whole function image (protocol feedback
    /// path).
    pub fn set_function_mask(&mut self, mask: FunctionMask) {
        self.active.functions = mask;
    }

    pub fn function_mask(&self) -> FunctionMask {
        self.active.functions
    }

    /// State of function `n` on the active loc, `None` above F28.
    pub fn function_status(&self, n: u8) -> Option<bool> {
        self.active.functions.get(n)
    }

    /// Function bound to a physical button on the active loc;
    /// [`FunctionAssignment::UNASSIGNED`] when the button has no binding.
    pub fn assigned_function(&self, button: u8) -> u8 {
        self.active.assignment.get(button)
    }

    /// Looks up the persisted button binding of any cataloged loc.
    pub fn stored_assignment(
        &mut self,
        address: LocAddress,
    ) -> Result<Option<FunctionAssignment>, LocError> {
        for index in 0..self.count {
            let record = self.store.record_get(index)?;
            if record.address == address {
                return Ok(Some(record.assignment));
            }
        }
        Ok(None)
    }

    // ========================================================================
    // Catalog mutation
    // ========================================================================

    /// Linear scan for an address; the index holding it, if any.
    pub fn check_record(&mut self, address: LocAddress) -> Result<Option<u8>, LocError> {
        for index in 0..self.count {
            if self.store.record_get(index)?.address == address {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Adds a loc or changes a stored one, per [`StoreMode`].
    ///
    /// Returns the index the record landed in. A `Change` leaves
    /// speed/direction/function state untouched; an add writes a fresh
    /// record with defaults. Failures mutate nothing.
    pub fn store_record(
        &mut self,
        address: LocAddress,
        assignment: FunctionAssignment,
        name: Option<&LocName>,
        mode: StoreMode,
    ) -> Result<u8, LocError> {
        match (self.check_record(address)?, mode) {
            (Some(index), StoreMode::Change) => {
                let mut record = self.store.record_get(index)?;
                record.assignment = assignment;
                if let Some(name) = name {
                    if self.store.record_has_name() {
                        record.name = name.clone();
                    }
                }
                self.store.record_set(index, &record)?;
                Ok(index)
            }
            (Some(_), _) => Err(LocError::DuplicateAddress { address }),
            (None, StoreMode::Change) => Err(LocError::NotFound { address }),
            (None, mode) => {
                if self.count >= MAX_LOCS {
                    return Err(LocError::CapacityExceeded { capacity: MAX_LOCS });
                }

                let mut record = LocRecord::fresh(address, assignment);
                if let Some(name) = name {
                    if self.store.record_has_name() {
                        record.name = name.clone();
                    }
                }

                let index = self.count;
                self.count += 1;
                self.store.count_set(self.count)?;
                self.store.record_set(index, &record)?;

                if mode == StoreMode::Add {
                    self.cursor = index;
                    self.active = self.store.record_get(index)?;
                }
                tracing::debug!(address = %address, index, "added loc");
                Ok(index)
            }
        }
    }

    /// Removes a loc, closing the hole by shifting successors down.
    ///
    /// Each shifted record moves in its own read-then-write transaction, in
    /// ascending order. At least one loc is always retained.
    pub fn remove_record(&mut self, address: LocAddress) -> Result<(), LocError> {
        if self.count <= 1 {
            return Err(LocError::LastLoc);
        }
        let Some(removed) = self.check_record(address)? else {
            return Err(LocError::NotFound { address });
        };

        for index in removed + 1..self.count {
            let record = self.store.record_get(index)?;
            self.store.record_set(index - 1, &record)?;
        }

        self.count -= 1;
        self.store.count_set(self.count)?;

        if removed < self.count {
            // The successor slid into the removed slot; show it.
            self.active = self.store.record_get(removed)?;
        } else {
            // The last slot went away; clamp the cursor onto the new tail.
            self.cursor = self.count - 1;
            self.active = self.store.record_get(self.cursor)?;
        }
        tracing::debug!(address = %address, index = removed, count = self.count, "removed loc");
        Ok(())
    }

    /// Sorts the catalog ascending by address, directly against the store.
    ///
    /// Bubble sort over indices: each adjacent comparison reads two records
    /// and writes both back on an inversion.
    pub fn sort(&mut self) -> Result<(), LocError> {
        for pass in 0..self.count.saturating_sub(1) {
            for j in 0..self.count - 1 - pass {
                let first = self.store.record_get(j)?;
                let second = self.store.record_get(j + 1)?;
                if first.address > second.address {
                    self.store.record_set(j, &second)?;
                    self.store.record_set(j + 1, &first)?;
                }
            }
        }
        tracing::debug!(count = self.count, "sorted catalog by address");
        Ok(())
    }

    /// Resets the catalog to the single default loc and persists it.
    pub fn remove_all(&mut self) -> Result<(), LocError> {
        let seed = LocRecord::default_seed();
        self.store.record_set(0, &seed)?;
        self.store.count_set(1)?;
        self.count = 1;
        self.cursor = 0;
        self.active = seed;
        tracing::info!("catalog reset to the default loc");
        Ok(())
    }

    // ========================================================================
    // Options and snapshots
    // ========================================================================

    /// Whether direction changes are gated behind the explicit control.
    pub fn ac_option(&self) -> bool {
        self.policy == DrivePolicy::IndependentDirection
    }

    /// Persists the AC option and swaps the live drive policy.
    pub fn set_ac_option(&mut self, on: bool) -> Result<(), LocError> {
        self.store.option_set(StoreOption::AcControl, u8::from(on))?;
        self.policy = DrivePolicy::from_ac_option(on);
        Ok(())
    }

    pub fn emergency_option(&mut self) -> Result<bool, LocError> {
        Ok(self.store.option_get(StoreOption::EmergencyStop)? == 1)
    }

    pub fn set_emergency_option(&mut self, on: bool) -> Result<(), LocError> {
        self.store
            .option_set(StoreOption::EmergencyStop, u8::from(on))?;
        Ok(())
    }

    /// Snapshot of the active loc.
    pub fn active(&self) -> &LocRecord {
        &self.active
    }

    pub fn address(&self) -> LocAddress {
        self.active.address
    }

    pub fn name(&self) -> &LocName {
        &self.active.name
    }

    pub fn record_count(&self) -> u8 {
        self.count
    }

    /// Zero-based cursor position.
    pub fn selected_index(&self) -> u8 {
        self.cursor
    }
}
