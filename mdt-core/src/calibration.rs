//! Calibration records: one per MDA axis
//!
//! A record is two blocks. The fixed fields come first, and the strings live in
//! a second block that starts `struct_len` bytes after the two length words,
//! not directly after the fixed fields. The whole record spans `total_len`
//! bytes.
//!
//! ```text
//! total_len  u32
//! struct_len u32   ─┐
//! name_len ... author_len, 36 reserved │ struct_len bytes
//!                                     ─┘
//! name, comment, unit, author (single-byte strings)
//! ...                                    up to total_len
//! ```

use crate::constants::{ElementType, UnitCode, CALIBRATION_RESERVED_SIZE};
use crate::cursor::{ByteCursor, Region};
use crate::encoding;
use crate::error::MdtError;
use crate::Result;
use alloc::string::String;
use serde::Serialize;

#[cfg(feature = "logging")]
use tracing::debug;

/// Description of one axis of an MDA frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationRecord {
    /// Record size in bytes
    pub total_len: u32,

    /// Size of the fixed-field block
    pub struct_len: u32,

    /// Axis name
    pub name: String,

    /// Free comment; non-empty on curve X axes whose values live in the XML
    pub comment: String,

    /// Unit string
    pub unit: String,

    /// Author
    pub author: String,

    /// Encoded SI unit
    pub unit_code: u64,

    /// Accuracy
    pub accuracy: f64,

    /// Function id (meaning unknown)
    pub fct_id: u32,

    /// Function pointer (meaning unknown)
    pub fct_pointer: u32,

    /// Offset applied to raw values
    pub bias: f64,

    /// Factor applied to raw values
    pub scale: f64,

    /// First index along the axis
    pub min_index: u64,

    /// Last index along the axis
    pub max_index: u64,

    /// Raw element type code (signed)
    pub element_type: i32,
}

impl CalibrationRecord {
    /// Element type of the stored samples, `None` if there is no reader for it
    pub fn element(&self) -> Option<ElementType> {
        ElementType::from_code(self.element_type)
    }

    /// Unit classified from [`unit_code`](Self::unit_code)
    pub fn unit_kind(&self) -> UnitCode {
        UnitCode::from_code(self.unit_code)
    }

    /// Stored unit string, or the symbol of the unit code when none is stored
    pub fn display_unit(&self) -> String {
        if self.unit.is_empty() {
            String::from(self.unit_kind().symbol())
        } else {
            self.unit.clone()
        }
    }

    /// Number of points between the index bounds, both inclusive
    ///
    /// `None` when `max_index < min_index` or the count does not fit in a `u64`.
    pub fn point_count(&self) -> Option<u64> {
        self.max_index
            .checked_sub(self.min_index)
            .and_then(|span| span.checked_add(1))
    }
}

/// Decode one calibration record at the cursor
///
/// On success the cursor sits exactly `total_len` bytes after the record start.
/// A `total_len` below 8 would move the cursor backwards and is rejected.
pub fn decode_calibration(cursor: &mut ByteCursor) -> Result<CalibrationRecord> {
    let record_start = cursor.tell();
    let total_len = cursor.read_u32()?;
    if total_len < 8 {
        return Err(MdtError::CalibrationSizeInvalid {
            offset: record_start,
            total_len,
        });
    }

    let struct_len = cursor.read_u32()?;
    let fixed = Region::new(cursor.tell(), struct_len as usize);

    let name_len = cursor.read_u32()?;
    let comment_len = cursor.read_u32()?;
    let unit_len = cursor.read_u32()?;
    let unit_code = cursor.read_u64()?;
    let accuracy = cursor.read_f64()?;
    let fct_id = cursor.read_u32()?;
    let fct_pointer = cursor.read_u32()?;
    let bias = cursor.read_f64()?;
    let scale = cursor.read_f64()?;
    let min_index = cursor.read_u64()?;
    let max_index = cursor.read_u64()?;
    let element_type = cursor.read_i32()?;
    let author_len = cursor.read_u32()?;

    cursor.shift(CALIBRATION_RESERVED_SIZE)?;

    // Strings start after the declared fixed block, wherever the fields ended
    fixed.resync(cursor)?;
    let mut read_string = |len: u32| -> Result<String> {
        Ok(encoding::latin1(&cursor.read_bytes(len as usize)?))
    };
    let name = read_string(name_len)?;
    let comment = read_string(comment_len)?;
    let unit = read_string(unit_len)?;
    let author = read_string(author_len)?;

    Region::new(record_start, total_len as usize).resync(cursor)?;

    #[cfg(feature = "logging")]
    debug!(
        "Calibration at {}: {:?} [{}..{}] scale {} bias {} unit {:?} type {}",
        record_start, name, min_index, max_index, scale, bias, unit, element_type
    );

    Ok(CalibrationRecord {
        total_len,
        struct_len,
        name,
        comment,
        unit,
        author,
        unit_code,
        accuracy,
        fct_id,
        fct_pointer,
        bias,
        scale,
        min_index,
        max_index,
        element_type,
    })
}
