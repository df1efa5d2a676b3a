//! Error types for MDT decoding

use alloc::string::String;
use core::fmt;
use serde::Serialize;

/// Size check stages of a text frame, in the order they are performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextStage {
    /// Frame carries no payload at all after its header
    Payload,
    /// Body text plus fixed padding
    Body,
    /// Title bytes
    Title,
    /// Metadata length field
    MetadataHeader,
    /// Metadata bytes
    Metadata,
}

impl fmt::Display for TextStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextStage::Payload => "payload",
            TextStage::Body => "body text",
            TextStage::Title => "title",
            TextStage::MetadataHeader => "metadata header",
            TextStage::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while decoding an MDT container
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MdtError {
    /// Source is shorter than the fixed container header
    #[cfg_attr(feature = "std", error("File is shorter than its header: {actual} bytes, need at least {required}"))]
    HeaderTooSmall {
        /// Minimum number of bytes.
        required: usize,
        /// Number of bytes in the source.
        actual: usize,
    },

    /// Declared payload size does not fit in the source
    #[cfg_attr(feature = "std", error("Declared payload of {declared} bytes needs {required} bytes, source has {actual}"))]
    SizeMismatch {
        /// Payload size from the container header.
        declared: u32,
        /// Bytes required for the declared payload plus header.
        required: u64,
        /// Number of bytes in the source.
        actual: usize,
    },

    /// Read or seek went past the end of the source
    #[cfg_attr(feature = "std", error("Truncated input at offset {offset}: needed {needed} bytes, {available} available"))]
    TruncatedInput {
        /// Cursor position of the failed access.
        offset: usize,
        /// Bytes the access needed.
        needed: usize,
        /// Bytes left in the source.
        available: usize,
    },

    /// Frame declares a size smaller than its own header
    #[cfg_attr(feature = "std", error("Frame #{index} declares {byte_size} bytes, smaller than its header"))]
    FrameSizeInvalid {
        /// Index of the frame in the container.
        index: usize,
        /// Declared frame size.
        byte_size: u32,
    },

    /// Text frame is too small for the stage being read
    #[cfg_attr(feature = "std", error("Text frame too small for {stage}: need {required} bytes, have {available}"))]
    FrameTooSmall {
        /// Stage that failed its size check.
        stage: TextStage,
        /// Payload bytes the stage requires.
        required: u64,
        /// Payload bytes declared by the frame.
        available: u64,
    },

    /// MDA frame total size is smaller than its header size
    #[cfg_attr(feature = "std", error("MDA total size {total_size} is smaller than header size {head_size}"))]
    HeaderSizeMismatch {
        /// Declared MDA header size.
        head_size: u32,
        /// Declared MDA total size.
        total_size: u32,
    },

    /// The two copies of the MDA variable block size disagree
    #[cfg_attr(feature = "std", error("Variable block size mismatch: header says {header}, data says {data}"))]
    VariableSizeMismatch {
        /// Size from the MDA header.
        header: u32,
        /// Size repeated in front of the variable block.
        data: u32,
    },

    /// Calibration record too short to hold its own length fields
    #[cfg_attr(feature = "std", error("Calibration record at {offset} declares {total_len} bytes"))]
    CalibrationSizeInvalid {
        /// Absolute offset of the record.
        offset: usize,
        /// Declared record size.
        total_len: u32,
    },

    /// Calibration index range does not describe a countable axis
    #[cfg_attr(feature = "std", error("Axis index range {min_index}..={max_index} is not a valid point count"))]
    AxisSizeInvalid {
        /// First index along the axis.
        min_index: u64,
        /// Last index along the axis.
        max_index: u64,
    },

    /// Cursor is not where the data block was expected to start
    #[cfg_attr(feature = "std", error("Cursor drifted: expected data block at {expected}, cursor at {actual}"))]
    CursorDriftError {
        /// Recorded data block start.
        expected: usize,
        /// Actual cursor position.
        actual: usize,
    },

    /// MDA frame holds a layout the decoder cannot extract
    #[cfg_attr(feature = "std", error("Unsupported MDA data: {dimensions} dimensions, {measurands} measurands"))]
    UnsupportedFrameData {
        /// Number of dimension records.
        dimensions: u32,
        /// Number of measurand records.
        measurands: u32,
    },

    /// IO error while acquiring the source
    #[cfg_attr(feature = "std", error("IO error: {0}"))]
    Io(String),
}

impl MdtError {
    /// Whether the error only invalidates the frame it occurred in
    ///
    /// These are the errors the per-frame fault boundary turns into a
    /// degraded frame. Everything else aborts the container decode.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            MdtError::FrameTooSmall { .. }
                | MdtError::HeaderSizeMismatch { .. }
                | MdtError::VariableSizeMismatch { .. }
                | MdtError::CalibrationSizeInvalid { .. }
                | MdtError::AxisSizeInvalid { .. }
                | MdtError::CursorDriftError { .. }
                | MdtError::UnsupportedFrameData { .. }
        )
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for MdtError {
    fn from(err: std::io::Error) -> Self {
        MdtError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_local_classification() {
        assert!(MdtError::VariableSizeMismatch { header: 1, data: 2 }.is_frame_local());
        assert!(MdtError::UnsupportedFrameData {
            dimensions: 3,
            measurands: 1
        }
        .is_frame_local());
        assert!(MdtError::AxisSizeInvalid {
            min_index: 0,
            max_index: u64::MAX
        }
        .is_frame_local());
        assert!(!MdtError::TruncatedInput {
            offset: 0,
            needed: 4,
            available: 0
        }
        .is_frame_local());
        assert!(!MdtError::HeaderTooSmall {
            required: 34,
            actual: 3
        }
        .is_frame_local());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_display_names_text_stage() {
        let err = MdtError::FrameTooSmall {
            stage: TextStage::Title,
            required: 40,
            available: 30,
        };
        assert!(err.to_string().contains("title"));
    }
}
