//! # locroster-types: Core types for the locroster catalog
//!
//! This crate contains the shared domain types used across the locroster
//! system:
//! - Loc identity ([`LocAddress`])
//! - Drive state ([`Direction`], [`DecoderSteps`])
//! - Function outputs ([`FunctionMask`], [`FunctionAssignment`])
//! - Naming ([`LocName`])
//! - The catalog record itself ([`LocRecord`])
//!
//! Types here carry no I/O. Persistence lives in `locroster-store`; the
//! control state machine lives in `locroster`.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Maximum number of locs the catalog can hold.
pub const MAX_LOCS: u8 = 64;

// ============================================================================
// Loc identity
// ============================================================================

/// Decoder address of a loc on the track bus.
///
/// Valid addresses are `1..=9999`. The catalog enforces uniqueness; this type
/// does not validate on construction (stored images are taken at face value),
/// but [`LocAddress::wrapped`] provides the rollover used by address-entry
/// UIs so a dial can never leave the valid range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct LocAddress(u16);

impl LocAddress {
    /// Lowest valid loc address.
    pub const MIN: u16 = 1;
    /// Highest valid loc address.
    pub const MAX: u16 = 9999;

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Rolls a raw address over the valid range: `0` wraps to [`Self::MAX`],
    /// anything above [`Self::MAX`] wraps to [`Self::MIN`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use locroster_types::LocAddress;
    /// assert_eq!(LocAddress::wrapped(0), LocAddress::new(9999));
    /// assert_eq!(LocAddress::wrapped(10000), LocAddress::new(1));
    /// assert_eq!(LocAddress::wrapped(42), LocAddress::new(42));
    /// ```
    pub fn wrapped(raw: u16) -> Self {
        if raw > Self::MAX {
            Self(Self::MIN)
        } else if raw == 0 {
            Self(Self::MAX)
        } else {
            Self(raw)
        }
    }

    /// Returns the address as a `u16`.
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl Display for LocAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for LocAddress {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<LocAddress> for u16 {
    fn from(addr: LocAddress) -> Self {
        addr.0
    }
}

// ============================================================================
// Drive state
// ============================================================================

/// Direction of travel, relative to the loc's forward end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Returns the storage byte for this direction.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
        }
    }

    /// Parses a storage byte, `None` if the byte is not a valid direction.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Forward),
            1 => Some(Self::Backward),
            _ => None,
        }
    }
}

/// Decoder speed-step resolution.
///
/// Determines the maximum speed value a decoder accepts: 14, 28, or 127
/// discrete steps above stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DecoderSteps {
    Step14,
    #[default]
    Step28,
    Step128,
}

impl DecoderSteps {
    /// Maximum speed value for this step mode.
    pub fn max_speed(self) -> u16 {
        match self {
            Self::Step14 => 14,
            Self::Step28 => 28,
            Self::Step128 => 127,
        }
    }

    /// Returns the storage byte for this step mode.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Step14 => 0,
            Self::Step28 => 1,
            Self::Step128 => 2,
        }
    }

    /// Parses a storage byte, `None` if the byte is not a valid step mode.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Step14),
            1 => Some(Self::Step28),
            2 => Some(Self::Step128),
            _ => None,
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// On/off state of the loc's function outputs F0..=F28.
///
/// Function *n* maps to bit *n* (bit 0 = F0). Bits above
/// [`FunctionMask::MAX_FUNCTION`] are never set by this type's operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub struct FunctionMask(u32);

impl FunctionMask {
    /// Highest addressable function index (F28).
    pub const MAX_FUNCTION: u8 = 28;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Toggles function `n`. Out-of-range indices are ignored.
    pub fn toggle(&mut self, n: u8) {
        if n <= Self::MAX_FUNCTION {
            self.0 ^= 1 << n;
        }
    }

    /// Returns the state of function `n`, `None` above F28.
    pub fn get(self, n: u8) -> Option<bool> {
        if n <= Self::MAX_FUNCTION {
            Some(self.0 & (1 << n) != 0)
        } else {
            None
        }
    }

    /// Returns the raw bit image.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl From<u32> for FunctionMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Bindings from the throttle's function buttons to function indices.
///
/// A handheld has [`FunctionAssignment::BUTTONS`] physical buttons; each slot
/// holds the function index that button drives, or
/// [`FunctionAssignment::UNASSIGNED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionAssignment([u8; 5]);

impl FunctionAssignment {
    /// Number of physical function buttons.
    pub const BUTTONS: usize = 5;
    /// Sentinel for a button with no function bound.
    pub const UNASSIGNED: u8 = 0xFF;

    pub const fn new(slots: [u8; Self::BUTTONS]) -> Self {
        Self(slots)
    }

    /// The factory binding: buttons 0..=4 drive F0..=F4.
    pub const fn front_panel() -> Self {
        Self([0, 1, 2, 3, 4])
    }

    /// Returns the function bound to `button`, or [`Self::UNASSIGNED`] for
    /// out-of-range buttons.
    pub fn get(self, button: u8) -> u8 {
        self.0
            .get(usize::from(button))
            .copied()
            .unwrap_or(Self::UNASSIGNED)
    }

    /// Returns the raw slot array.
    pub fn slots(&self) -> &[u8; Self::BUTTONS] {
        &self.0
    }
}

impl Default for FunctionAssignment {
    fn default() -> Self {
        Self([Self::UNASSIGNED; Self::BUTTONS])
    }
}

// ============================================================================
// Naming
// ============================================================================

/// Display name of a loc.
///
/// Capped at [`LocName::MAX_BYTES`] bytes; longer input is truncated on a
/// character boundary, the way a fixed storage span forces it to be.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct LocName(String);

impl LocName {
    /// Maximum stored name length in bytes (the storage span reserves one
    /// extra byte of padding).
    pub const MAX_BYTES: usize = 10;

    /// Creates a name, truncating to [`Self::MAX_BYTES`] on a char boundary.
    pub fn new(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if name.len() > Self::MAX_BYTES {
            let mut cut = Self::MAX_BYTES;
            while !name.is_char_boundary(cut) {
                cut -= 1;
            }
            name.truncate(cut);
        }
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for LocName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Catalog record
// ============================================================================

/// One locomotive control profile as held in the catalog.
///
/// `speed` is `u16` to match the stored image; the control layer clamps it to
/// `steps.max_speed()` on every adjustment, so persisted values never exceed
/// 127 in practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocRecord {
    pub address: LocAddress,
    pub speed: u16,
    pub direction: Direction,
    pub steps: DecoderSteps,
    pub functions: FunctionMask,
    pub assignment: FunctionAssignment,
    pub name: LocName,
}

impl LocRecord {
    /// The record a blank catalog is seeded with: address 3, 28 steps,
    /// forward, stopped, no functions on, factory button binding.
    pub fn default_seed() -> Self {
        Self {
            address: LocAddress::new(3),
            speed: 0,
            direction: Direction::Forward,
            steps: DecoderSteps::Step28,
            functions: FunctionMask::default(),
            assignment: FunctionAssignment::front_panel(),
            name: LocName::default(),
        }
    }

    /// A fresh record for a newly added address: defaults everywhere, with
    /// the caller's button binding.
    pub fn fresh(address: LocAddress, assignment: FunctionAssignment) -> Self {
        Self {
            address,
            speed: 0,
            direction: Direction::Forward,
            steps: DecoderSteps::Step28,
            functions: FunctionMask::default(),
            assignment,
            name: LocName::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_wraps_both_ends() {
        assert_eq!(LocAddress::wrapped(0).as_u16(), LocAddress::MAX);
        assert_eq!(LocAddress::wrapped(10_000).as_u16(), LocAddress::MIN);
        assert_eq!(LocAddress::wrapped(9999).as_u16(), 9999);
        assert_eq!(LocAddress::wrapped(1).as_u16(), 1);
    }

    #[test]
    fn direction_byte_roundtrip() {
        assert_eq!(Direction::from_byte(0), Some(Direction::Forward));
        assert_eq!(Direction::from_byte(1), Some(Direction::Backward));
        assert_eq!(Direction::from_byte(2), None);
        assert_eq!(Direction::Forward.opposite(), Direction::Backward);
    }

    #[test]
    fn step_mode_maxima() {
        assert_eq!(DecoderSteps::Step14.max_speed(), 14);
        assert_eq!(DecoderSteps::Step28.max_speed(), 28);
        assert_eq!(DecoderSteps::Step128.max_speed(), 127);
        assert_eq!(DecoderSteps::from_byte(3), None);
    }

    #[test]
    fn function_mask_bit_zero_is_f0() {
        let mut mask = FunctionMask::default();
        mask.toggle(0);
        assert_eq!(mask.as_u32(), 1);
        mask.toggle(28);
        assert_eq!(mask.get(28), Some(true));
        assert_eq!(mask.get(29), None);

        // Out-of-range toggles leave the image alone
        let before = mask.as_u32();
        mask.toggle(29);
        assert_eq!(mask.as_u32(), before);
    }

    #[test]
    fn assignment_out_of_range_button_is_unassigned() {
        let assignment = FunctionAssignment::front_panel();
        assert_eq!(assignment.get(4), 4);
        assert_eq!(assignment.get(5), FunctionAssignment::UNASSIGNED);
    }

    #[test]
    fn name_truncates_on_char_boundary() {
        let name = LocName::new("0123456789ab");
        assert_eq!(name.as_str(), "0123456789");

        // Multi-byte char straddling the limit is dropped whole
        let name = LocName::new("locomotivé");
        assert!(name.as_str().len() <= LocName::MAX_BYTES);
        assert!(name.as_str().is_char_boundary(name.as_str().len()));
    }

    #[test]
    fn seed_record_matches_factory_state() {
        let seed = LocRecord::default_seed();
        assert_eq!(seed.address.as_u16(), 3);
        assert_eq!(seed.speed, 0);
        assert_eq!(seed.direction, Direction::Forward);
        assert_eq!(seed.steps, DecoderSteps::Step28);
        assert_eq!(seed.assignment.slots(), &[0, 1, 2, 3, 4]);
        assert!(seed.name.is_empty());
    }
}
