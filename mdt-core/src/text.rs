//! Text annotation frames
//!
//! Layout after the frame header, as far as it is understood:
//!
//! - body length (u16), 16 zero bytes, body text (UTF-8)
//! - title length (u8) followed by 3 bytes, then the title (UTF-8)
//! - metadata length (u16), 2 zero bytes, metadata (UTF-16 XML)
//!
//! Some non-zero bytes follow the metadata; their meaning is unknown and they
//! are ignored.
//!
//! The title length byte is unreliable. When it is zero and the 3 bytes after
//! it are not all zero, the frame carries the default title and the length is
//! 11. When it is zero and the 3 bytes are zero, the title is empty and the
//! padding is one byte shorter than usual.

use crate::constants::{TEXT_DEFAULT_TITLE_LEN, TEXT_PREFIX_SIZE, TEXT_TITLE_FIELD_SIZE};
use crate::cursor::ByteCursor;
use crate::encoding;
use crate::error::{MdtError, TextStage};
use crate::types::FrameHeader;
use crate::Result;
use alloc::string::String;
use encoding_rs::UTF_16LE;
use serde::Serialize;

#[cfg(feature = "logging")]
use tracing::debug;

/// Decoded text frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFrame {
    /// Frame title
    pub title: String,

    /// Text entered by the user
    pub body: String,

    /// XML metadata
    pub metadata: String,
}

/// Decode a text frame; the cursor must sit right after the frame header
pub fn decode_text_frame(cursor: &mut ByteCursor, header: &FrameHeader) -> Result<TextFrame> {
    let available = header.payload_len();
    let check = |stage: TextStage, required: u64| -> Result<()> {
        if available < required {
            return Err(MdtError::FrameTooSmall {
                stage,
                required,
                available,
            });
        }
        Ok(())
    };

    check(TextStage::Payload, 1)?;

    let data_len = cursor.read_u16()?;
    let mut required = TEXT_PREFIX_SIZE + data_len as u64 + TEXT_TITLE_FIELD_SIZE;
    check(TextStage::Body, required)?;

    cursor.shift(16)?;
    let body = encoding::utf8(&cursor.read_bytes(data_len as usize)?);

    let mut title_len = cursor.read_u8()? as usize;
    let trailer_is_zero = cursor.peek(3)?.iter().all(|&b| b == 0);
    cursor.shift(3)?;

    if title_len == 0 {
        if trailer_is_zero {
            cursor.shift(-1)?;
        } else {
            title_len = TEXT_DEFAULT_TITLE_LEN;
        }
    }

    required += title_len as u64;
    check(TextStage::Title, required)?;
    let title = encoding::utf8(&cursor.read_bytes(title_len)?);

    required += 2;
    check(TextStage::MetadataHeader, required)?;
    let xml_len = cursor.read_u16()?;

    required += xml_len as u64;
    check(TextStage::Metadata, required)?;
    cursor.shift(2)?;
    // Little-endian unless a byte-order mark says otherwise
    let metadata = UTF_16LE
        .decode(&cursor.read_bytes(xml_len as usize)?)
        .0
        .into_owned();

    #[cfg(feature = "logging")]
    debug!(
        "Text frame at {}: title {:?}, {} body bytes, {} metadata bytes",
        header.start_offset, title, data_len, xml_len
    );

    Ok(TextFrame {
        title,
        body,
        metadata,
    })
}
