//! Core types for decoded MDT containers

use crate::calibration::CalibrationRecord;
use crate::constants::{FrameKind, FRAME_HEADER_SIZE};
use crate::cursor::Region;
use crate::error::MdtError;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::Serialize;

/// Frame format version as stored in the frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Acquisition date and time of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Timestamp {
    /// Year
    pub year: u16,
    /// Month
    pub month: u16,
    /// Day
    pub day: u16,
    /// Hour
    pub hour: u16,
    /// Minute
    pub minute: u16,
    /// Second
    pub second: u16,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Fixed 22-byte header in front of every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameHeader {
    /// Frame size in bytes, header included
    pub byte_size: u32,

    /// Frame type
    pub kind: FrameKind,

    /// Frame format version
    pub version: Version,

    /// Acquisition time
    pub timestamp: Timestamp,

    /// Size of variables (version 6 and older only)
    pub var_size: u16,

    /// Absolute offset of the first header byte
    pub start_offset: usize,
}

impl FrameHeader {
    /// The whole frame as a declared region
    pub fn region(&self) -> Region {
        Region::new(self.start_offset, self.byte_size as usize)
    }

    /// Bytes declared after the fixed header, zero when the size is bogus
    pub fn payload_len(&self) -> u64 {
        (self.byte_size as u64).saturating_sub(FRAME_HEADER_SIZE as u64)
    }
}

/// Type-specific content of a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FramePayload {
    /// Frame type without a payload decoder; only the header was read
    HeaderOnly,

    /// Text annotation
    Text(crate::text::TextFrame),

    /// Multi-dimensional array measurement
    Mda(crate::mda::MdaFrame),

    /// Payload decode failed; the failure stayed local to this frame
    Faulted(MdtError),
}

/// One decoded frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Frame header
    pub header: FrameHeader,

    /// Decoded payload
    pub payload: FramePayload,
}

impl Frame {
    /// Create a frame
    pub fn new(header: FrameHeader, payload: FramePayload) -> Self {
        Self { header, payload }
    }

    /// Frame type
    pub fn kind(&self) -> FrameKind {
        self.header.kind
    }

    /// Absolute offset where the frame starts
    pub fn start_offset(&self) -> usize {
        self.header.start_offset
    }

    /// Absolute offset where the next frame starts
    pub fn end_offset(&self) -> usize {
        self.header.region().end()
    }

    /// Frame title, empty when the payload has none
    pub fn title(&self) -> &str {
        match &self.payload {
            FramePayload::Text(text) => &text.title,
            FramePayload::Mda(mda) => &mda.title,
            FramePayload::HeaderOnly | FramePayload::Faulted(_) => "",
        }
    }

    /// XML metadata string, empty when the payload has none
    pub fn metadata(&self) -> &str {
        match &self.payload {
            FramePayload::Text(text) => &text.metadata,
            FramePayload::Mda(mda) => &mda.metadata,
            FramePayload::HeaderOnly | FramePayload::Faulted(_) => "",
        }
    }

    /// Calibration records of an MDA frame, dimensions first
    pub fn calibrations(&self) -> impl Iterator<Item = &CalibrationRecord> {
        let (dims, meas): (&[CalibrationRecord], &[CalibrationRecord]) = match &self.payload {
            FramePayload::Mda(mda) => (&mda.dimensions, &mda.measurands),
            _ => (&[], &[]),
        };
        dims.iter().chain(meas.iter())
    }

    /// The isolated decode failure, if any
    pub fn fault(&self) -> Option<&MdtError> {
        match &self.payload {
            FramePayload::Faulted(err) => Some(err),
            _ => None,
        }
    }
}

/// A decoded MDT file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    /// Payload size declared in the file header (file size minus header)
    pub payload_size: u32,

    /// Index of the last frame, as stored
    pub last_frame_index: u16,

    /// Frames in file order
    pub frames: Vec<Frame>,
}

impl Container {
    /// Number of frames declared by the header
    pub fn frame_count(&self) -> usize {
        self.last_frame_index as usize + 1
    }

    /// Frames whose payload decode was isolated as a fault
    pub fn faulted(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(|f| f.fault().is_some())
    }

    /// Frames with a title, paired with the title
    pub fn titles(&self) -> Vec<(usize, String)> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.title().is_empty())
            .map(|(i, f)| (i, String::from(f.title())))
            .collect()
    }
}
