//! Per-record binary codec.
//!
//! # Record Image
//!
//! ```text
//! [address:u16][speed:u16][direction:u8][steps:u8][functions:u32][assignment:5B][name:11B]
//!      2B          2B          1B          1B          4B             5B        optional
//! ```
//!
//! All integers are little-endian. The name span is present only on stores
//! configured with a name field; it is NUL-padded and always ends in at
//! least one NUL.

use locroster_types::{
    Direction, DecoderSteps, FunctionAssignment, FunctionMask, LocAddress, LocName, LocRecord,
};

use crate::StoreError;

/// Record image size without the name span.
pub(crate) const BASE_LEN: usize = 15;

/// Storage span of the name field: the name bytes plus one byte of padding.
pub(crate) const NAME_SPAN: usize = LocName::MAX_BYTES + 1;

/// Raw record image size for a store with or without names.
pub(crate) fn record_len(has_name: bool) -> usize {
    if has_name { BASE_LEN + NAME_SPAN } else { BASE_LEN }
}

/// Serializes a record into its storage image.
pub(crate) fn encode(record: &LocRecord, has_name: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(record_len(has_name));

    // address (bytes 0-1)
    buf.extend_from_slice(&record.address.as_u16().to_le_bytes());

    // speed (bytes 2-3)
    buf.extend_from_slice(&record.speed.to_le_bytes());

    // direction (byte 4), steps (byte 5)
    buf.push(record.direction.as_byte());
    buf.push(record.steps.as_byte());

    // functions (bytes 6-9)
    buf.extend_from_slice(&record.functions.as_u32().to_le_bytes());

    // assignment (bytes 10-14)
    buf.extend_from_slice(record.assignment.slots());

    // name (bytes 15-25), NUL-padded
    if has_name {
        let name = record.name.as_str().as_bytes();
        buf.extend_from_slice(name);
        buf.resize(record_len(true), 0);
    }

    buf
}

/// Deserializes a record from its storage image.
///
/// `index` is carried only for error context.
///
/// # Errors
///
/// - [`StoreError::InvalidDirection`] if the direction byte is invalid
/// - [`StoreError::InvalidStepMode`] if the step-mode byte is invalid
pub(crate) fn decode(data: &[u8], has_name: bool, index: u8) -> Result<LocRecord, StoreError> {
    debug_assert!(data.len() >= record_len(has_name), "caller sizes the read");

    let address = LocAddress::new(u16::from_le_bytes([data[0], data[1]]));
    let speed = u16::from_le_bytes([data[2], data[3]]);

    let direction = Direction::from_byte(data[4]).ok_or(StoreError::InvalidDirection {
        byte: data[4],
        index,
    })?;
    let steps = DecoderSteps::from_byte(data[5]).ok_or(StoreError::InvalidStepMode {
        byte: data[5],
        index,
    })?;

    let functions = FunctionMask::new(u32::from_le_bytes([data[6], data[7], data[8], data[9]]));

    let mut slots = [0u8; FunctionAssignment::BUTTONS];
    slots.copy_from_slice(&data[10..15]);
    let assignment = FunctionAssignment::new(slots);

    let name = if has_name {
        let span = &data[BASE_LEN..BASE_LEN + NAME_SPAN];
        let end = span.iter().position(|&b| b == 0).unwrap_or(span.len());
        LocName::new(String::from_utf8_lossy(&span[..end]).into_owned())
    } else {
        LocName::default()
    };

    Ok(LocRecord {
        address,
        speed,
        direction,
        steps,
        functions,
        assignment,
        name,
    })
}
