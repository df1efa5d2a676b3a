//! Per-frame header decoding

use crate::constants::FrameKind;
use crate::cursor::ByteCursor;
use crate::types::{FrameHeader, Timestamp, Version};
use crate::Result;

#[cfg(feature = "logging")]
use tracing::debug;

/// Decode the fixed 22-byte frame header at the cursor
///
/// Layout (little-endian):
/// 1. Frame size including header (u32)
/// 2. Frame type (u16)
/// 3. Version (2 bytes: major, minor)
/// 4. Year, month, day, hour, minute, second (u16 each)
/// 5. Variable size (u16, unused since version 7)
///
/// Unknown type codes decode to [`FrameKind::Unknown`].
pub fn decode_frame_header(cursor: &mut ByteCursor) -> Result<FrameHeader> {
    let start_offset = cursor.tell();

    let byte_size = cursor.read_u32()?;
    let kind = FrameKind::from_code(cursor.read_u16()?);

    // Stored as ((b0 << 8) + b1); major and minor are recovered by dividing
    // and taking the remainder by 0x100.
    let b0 = cursor.read_u8()? as u32;
    let b1 = cursor.read_u8()? as u32;
    let version = Version {
        major: ((b0 << 8) / 256) as u8,
        minor: (b1 % 256) as u8,
    };

    let timestamp = Timestamp {
        year: cursor.read_u16()?,
        month: cursor.read_u16()?,
        day: cursor.read_u16()?,
        hour: cursor.read_u16()?,
        minute: cursor.read_u16()?,
        second: cursor.read_u16()?,
    };

    let var_size = cursor.read_u16()?;

    #[cfg(feature = "logging")]
    debug!(
        "Frame header at {}: {} ({}), {} bytes, version {}, {}",
        start_offset,
        kind.name(),
        kind.code(),
        byte_size,
        version,
        timestamp
    );

    Ok(FrameHeader {
        byte_size,
        kind,
        version,
        timestamp,
        var_size,
        start_offset,
    })
}
