//! Container decoding: file header and the frame loop
//!
//! The file header is 33 bytes:
//!
//! | Offset | Size | Field                  |
//! |--------|------|------------------------|
//! | 0      | 4    | magic (not checked)    |
//! | 4      | 4    | payload size           |
//! | 8      | 4    | reserved               |
//! | 12     | 2    | last frame index       |
//! | 14     | 19   | reserved               |
//!
//! Frames follow back to back. After each frame the cursor is moved to the
//! frame's declared end no matter how much its decoder consumed, so frame
//! types without a decoder, and frames that failed to decode, are skipped
//! cleanly.

use crate::constants::{FrameKind, FRAMES_OFFSET, FRAME_HEADER_SIZE, MAGIC_SIZE, MIN_FILE_SIZE};
use crate::cursor::ByteCursor;
use crate::error::MdtError;
use crate::frame::decode_frame_header;
use crate::mda::decode_mda_frame;
use crate::text::decode_text_frame;
use crate::types::{Container, Frame, FrameHeader, FramePayload};
use crate::Result;
use alloc::vec::Vec;
use bytes::Bytes;

#[cfg(feature = "std")]
use std::{io::Read, path::Path};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// What to do when a frame's payload fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Keep the frame with a [`FramePayload::Faulted`] payload and continue
    #[default]
    Isolate,
    /// Abort the whole decode with the frame's error
    Strict,
}

/// Container decoder configuration
///
/// ```
/// use mdt_core::container::{Decoder, FaultPolicy};
///
/// let decoder = Decoder::new().strict();
/// assert_eq!(decoder.policy(), FaultPolicy::Strict);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    policy: FaultPolicy,
}

impl Decoder {
    /// Decoder that isolates frame-local failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Propagate frame-local failures instead of isolating them
    pub fn strict(mut self) -> Self {
        self.policy = FaultPolicy::Strict;
        self
    }

    /// Set the fault policy
    pub fn fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current fault policy
    pub fn policy(&self) -> FaultPolicy {
        self.policy
    }

    /// Decode a complete in-memory file
    pub fn decode(&self, data: Bytes) -> Result<Container> {
        let source_len = data.len();
        let mut cursor = ByteCursor::new(data);

        let (payload_size, last_frame_index) = decode_file_header(&mut cursor, source_len)?;
        let frame_count = last_frame_index as usize + 1;

        #[cfg(feature = "logging")]
        debug!(
            "Decoding {} bytes: payload {} bytes, {} frames",
            source_len, payload_size, frame_count
        );

        let mut frames = Vec::new();
        for index in 0..frame_count {
            let frame = self.decode_frame(&mut cursor, index, source_len)?;
            frame.header.region().resync(&mut cursor)?;
            frames.push(frame);
        }

        Ok(Container {
            payload_size,
            last_frame_index,
            frames,
        })
    }

    /// Decode a file held in a byte slice
    pub fn decode_slice(&self, data: &[u8]) -> Result<Container> {
        self.decode(Bytes::copy_from_slice(data))
    }

    /// Read a source to the end and decode it
    #[cfg(feature = "std")]
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Container> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.decode(Bytes::from(data))
    }

    /// Open, read and decode a file; the file is closed before decoding starts
    #[cfg(feature = "std")]
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<Container> {
        let data = std::fs::read(path)?;
        self.decode(Bytes::from(data))
    }

    fn decode_frame(
        &self,
        cursor: &mut ByteCursor,
        index: usize,
        source_len: usize,
    ) -> Result<Frame> {
        let header = decode_frame_header(cursor)?;

        if (header.byte_size as usize) < FRAME_HEADER_SIZE {
            return Err(MdtError::FrameSizeInvalid {
                index,
                byte_size: header.byte_size,
            });
        }
        if header.region().end() > source_len {
            return Err(MdtError::TruncatedInput {
                offset: header.start_offset,
                needed: header.byte_size as usize,
                available: source_len.saturating_sub(header.start_offset),
            });
        }

        let payload = match decode_payload(cursor, &header) {
            Ok(payload) => payload,
            Err(err) if self.policy == FaultPolicy::Isolate && err.is_frame_local() => {
                #[cfg(feature = "logging")]
                warn!(
                    "Frame #{} ({}) at offset {} failed to decode: {:?}",
                    index,
                    header.kind.name(),
                    header.start_offset,
                    err
                );
                FramePayload::Faulted(err)
            }
            Err(err) => return Err(err),
        };

        Ok(Frame::new(header, payload))
    }
}

/// Decode the 33-byte file header, leaving the cursor on frame 0
///
/// `source_len` is the full length of the source; the declared payload must fit.
pub fn decode_file_header(cursor: &mut ByteCursor, source_len: usize) -> Result<(u32, u16)> {
    if source_len < MIN_FILE_SIZE {
        return Err(MdtError::HeaderTooSmall {
            required: MIN_FILE_SIZE,
            actual: source_len,
        });
    }

    cursor.shift(MAGIC_SIZE as i64)?;
    let payload_size = cursor.read_u32()?;
    cursor.shift(4)?;
    let last_frame_index = cursor.read_u16()?;
    // 18 reserved bytes, then one more before frame 0
    cursor.shift(18)?;
    cursor.shift(1)?;
    debug_assert_eq!(cursor.tell(), FRAMES_OFFSET);

    let required = payload_size as u64 + FRAMES_OFFSET as u64;
    if (source_len as u64) < required {
        return Err(MdtError::SizeMismatch {
            declared: payload_size,
            required,
            actual: source_len,
        });
    }

    Ok((payload_size, last_frame_index))
}

/// Dispatch on the frame type; the cursor sits right after the frame header
fn decode_payload(cursor: &mut ByteCursor, header: &FrameHeader) -> Result<FramePayload> {
    match header.kind {
        FrameKind::Text => Ok(FramePayload::Text(decode_text_frame(cursor, header)?)),
        FrameKind::Mda => Ok(FramePayload::Mda(decode_mda_frame(cursor, header)?)),
        FrameKind::Scanned
        | FrameKind::Spectroscopy
        | FrameKind::Curves
        | FrameKind::OldMda
        | FrameKind::CurvesNew
        | FrameKind::Palette
        | FrameKind::Unknown(_) => {
            #[cfg(feature = "logging")]
            warn!(
                "Cannot read {} frame (type {}) at offset {}, keeping header only",
                header.kind.name(),
                header.kind.code(),
                header.start_offset
            );
            Ok(FramePayload::HeaderOnly)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    fn file_header(payload_size: u32, last_frame_index: u16) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_slice(&[0x01, 0xB0, 0x04, 0x00]);
        buf.put_u32_le(payload_size);
        buf.put_bytes(0, 4);
        buf.put_u16_le(last_frame_index);
        buf.put_bytes(0, 19);
        buf
    }

    fn palette_frame(byte_size: u32) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u32_le(byte_size);
        buf.put_u16_le(107);
        buf.put_slice(&[1, 0]);
        buf.put_bytes(0, 14);
        buf.put_bytes(0x5A, byte_size as usize - FRAME_HEADER_SIZE);
        buf
    }

    #[test]
    fn test_header_too_small() {
        let err = Decoder::new().decode_slice(&[0u8; 33]).unwrap_err();
        assert_eq!(
            err,
            MdtError::HeaderTooSmall {
                required: 34,
                actual: 33
            }
        );
    }

    #[test]
    fn test_size_check_boundary() {
        let mut ok = file_header(1, 0);
        ok.put_u8(0);
        assert_eq!(ok.len(), 34);
        let mut cursor = ByteCursor::new(ok.freeze());
        assert_eq!(decode_file_header(&mut cursor, 34).unwrap(), (1, 0));
        assert_eq!(cursor.tell(), FRAMES_OFFSET);

        let mut too_big = file_header(2, 0);
        too_big.put_u8(0);
        let err = Decoder::new().decode(too_big.freeze()).unwrap_err();
        assert!(matches!(err, MdtError::SizeMismatch { declared: 2, .. }));
    }

    #[test]
    fn test_single_palette_frame() {
        let frame = palette_frame(40);
        let mut data = file_header(frame.len() as u32, 0);
        data.put_slice(&frame);

        let container = Decoder::new().decode(data.freeze()).unwrap();
        assert_eq!(container.frames.len(), 1);
        assert_eq!(container.frame_count(), 1);
        let frame = &container.frames[0];
        assert_eq!(frame.kind(), FrameKind::Palette);
        assert_eq!(frame.header.byte_size, 40);
        assert_eq!(frame.start_offset(), 33);
        assert_eq!(frame.payload, FramePayload::HeaderOnly);
    }

    #[test]
    fn test_frame_smaller_than_header() {
        let mut data = file_header(30, 0);
        data.put_u32_le(10);
        data.put_bytes(0, 26);

        let err = Decoder::new().decode(data.freeze()).unwrap_err();
        assert_eq!(
            err,
            MdtError::FrameSizeInvalid {
                index: 0,
                byte_size: 10
            }
        );
    }

    #[test]
    fn test_frame_past_end_is_truncated() {
        let mut data = file_header(22, 0);
        let frame = palette_frame(40);
        data.put_slice(&frame[..22]);

        let err = Decoder::new().decode(data.freeze()).unwrap_err();
        assert!(matches!(err, MdtError::TruncatedInput { offset: 33, .. }));
    }
}
