//! Layout constants and type codes for the MDT container format

use serde::Serialize;

/// Minimum source size accepted by the container decoder
pub const MIN_FILE_SIZE: usize = 34;

/// Offset of frame 0.
///
/// The container header is documented as 32 bytes, but frame 0 starts at byte 33
/// in every file seen so far.
pub const FRAMES_OFFSET: usize = 33;

/// Magic bytes at the start of the file (never checked)
pub const MAGIC_SIZE: usize = 4;

/// Fixed per-frame header size:
/// 4 (size) + 2 (type) + 2 (version) + 12 (datetime) + 2 (var size) = 22 bytes
pub const FRAME_HEADER_SIZE: usize = 22;

/// Text frame: u16 data length + 16 reserved bytes
pub const TEXT_PREFIX_SIZE: u64 = 18;

/// Text frame: title length byte + 3 byte trailer
pub const TEXT_TITLE_FIELD_SIZE: u64 = 4;

/// Length assumed for the implicit default text frame title ("Text Frame")
pub const TEXT_DEFAULT_TITLE_LEN: usize = 11;

/// Size of one MDA GUID
pub const GUID_SIZE: usize = 16;

/// Reserved bytes after the fixed fields of a calibration record
pub const CALIBRATION_RESERVED_SIZE: i64 = 36;

/// Frame types stored in the frame header type field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FrameKind {
    /// Legacy scanned image (code 0)
    Scanned,
    /// Legacy spectroscopy (code 1)
    Spectroscopy,
    /// Text annotation (code 3)
    Text,
    /// Old multi-dimensional array (code 105)
    OldMda,
    /// Multi-dimensional array (code 106)
    Mda,
    /// Palette (code 107)
    Palette,
    /// New-style curves (code 190)
    CurvesNew,
    /// Legacy curves (code 201)
    Curves,
    /// Any other code
    Unknown(u16),
}

impl FrameKind {
    /// Map a raw type code to a frame kind
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => FrameKind::Scanned,
            1 => FrameKind::Spectroscopy,
            3 => FrameKind::Text,
            105 => FrameKind::OldMda,
            106 => FrameKind::Mda,
            107 => FrameKind::Palette,
            190 => FrameKind::CurvesNew,
            201 => FrameKind::Curves,
            other => FrameKind::Unknown(other),
        }
    }

    /// Raw type code
    pub const fn code(&self) -> u16 {
        match self {
            FrameKind::Scanned => 0,
            FrameKind::Spectroscopy => 1,
            FrameKind::Text => 3,
            FrameKind::OldMda => 105,
            FrameKind::Mda => 106,
            FrameKind::Palette => 107,
            FrameKind::CurvesNew => 190,
            FrameKind::Curves => 201,
            FrameKind::Unknown(code) => *code,
        }
    }

    /// Human readable name
    pub const fn name(&self) -> &'static str {
        match self {
            FrameKind::Scanned => "scanned",
            FrameKind::Spectroscopy => "spectroscopy",
            FrameKind::Text => "text",
            FrameKind::OldMda => "old-mda",
            FrameKind::Mda => "mda",
            FrameKind::Palette => "palette",
            FrameKind::CurvesNew => "curves-new",
            FrameKind::Curves => "curves",
            FrameKind::Unknown(_) => "unknown",
        }
    }
}

/// Numeric element types of MDA data blocks
///
/// Codes are the byte width, negated for signed and floating types. Floats add
/// the mantissa width times 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementType {
    /// Signed 8-bit integer (code -1)
    Int8,
    /// Unsigned 8-bit integer (code 1)
    Uint8,
    /// Signed 16-bit integer (code -2)
    Int16,
    /// Unsigned 16-bit integer (code 2)
    Uint16,
    /// Signed 32-bit integer (code -4)
    Int32,
    /// Unsigned 32-bit integer (code 4)
    Uint32,
    /// Signed 64-bit integer (code -8)
    Int64,
    /// Unsigned 64-bit integer (code 8)
    Uint64,
    /// IEEE single (code -(4 + 23 * 256))
    Float32,
    /// IEEE double (code -(8 + 52 * 256))
    Float64,
}

impl ElementType {
    /// Code of [`ElementType::Float32`]
    pub const FLOAT32_CODE: i32 = -(4 + 23 * 256);
    /// Code of [`ElementType::Float64`]
    pub const FLOAT64_CODE: i32 = -(8 + 52 * 256);

    /// Look up an element type by its code; `None` for types without a reader
    /// (48/80-bit floats, fixed point, garbage)
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(ElementType::Int8),
            1 => Some(ElementType::Uint8),
            -2 => Some(ElementType::Int16),
            2 => Some(ElementType::Uint16),
            -4 => Some(ElementType::Int32),
            4 => Some(ElementType::Uint32),
            -8 => Some(ElementType::Int64),
            8 => Some(ElementType::Uint64),
            Self::FLOAT32_CODE => Some(ElementType::Float32),
            Self::FLOAT64_CODE => Some(ElementType::Float64),
            _ => None,
        }
    }

    /// Raw type code
    pub const fn code(&self) -> i32 {
        match self {
            ElementType::Int8 => -1,
            ElementType::Uint8 => 1,
            ElementType::Int16 => -2,
            ElementType::Uint16 => 2,
            ElementType::Int32 => -4,
            ElementType::Uint32 => 4,
            ElementType::Int64 => -8,
            ElementType::Uint64 => 8,
            ElementType::Float32 => Self::FLOAT32_CODE,
            ElementType::Float64 => Self::FLOAT64_CODE,
        }
    }

    /// Width of one element in bytes
    pub const fn size(&self) -> usize {
        match self {
            ElementType::Int8 | ElementType::Uint8 => 1,
            ElementType::Int16 | ElementType::Uint16 => 2,
            ElementType::Int32 | ElementType::Uint32 | ElementType::Float32 => 4,
            ElementType::Int64 | ElementType::Uint64 | ElementType::Float64 => 8,
        }
    }
}

/// Physical unit derived from a calibration record's unit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitCode {
    /// Dimensionless
    None,
    /// Metre
    Meter,
    /// Volt squared
    VoltSquared,
    /// Second
    Second,
    /// Code without a known meaning
    Other(u64),
}

impl UnitCode {
    /// Classify a raw unit code
    pub const fn from_code(code: u64) -> Self {
        match code {
            0x0000_0000_0000_0001 | 0x0000_0000_0100_0001 => UnitCode::None,
            0x0000_0000_0000_0101 => UnitCode::Meter,
            0x0000_0000_0010_0001 => UnitCode::VoltSquared,
            0x0000_00ff_fd01_0200 => UnitCode::Second,
            other => UnitCode::Other(other),
        }
    }

    /// Unit symbol, empty when dimensionless or unknown
    pub const fn symbol(&self) -> &'static str {
        match self {
            UnitCode::None | UnitCode::Other(_) => "",
            UnitCode::Meter => "m",
            UnitCode::VoltSquared => "V\u{b2}",
            UnitCode::Second => "s",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_kind_codes() {
        for code in [0u16, 1, 3, 105, 106, 107, 190, 201] {
            assert_eq!(FrameKind::from_code(code).code(), code);
        }
        assert_eq!(FrameKind::from_code(2), FrameKind::Unknown(2));
        assert_eq!(FrameKind::from_code(107), FrameKind::Palette);
    }

    #[test]
    fn test_element_type_codes() {
        assert_eq!(ElementType::from_code(-5892), Some(ElementType::Float32));
        assert_eq!(ElementType::from_code(-13320), Some(ElementType::Float64));
        assert_eq!(ElementType::from_code(-1), Some(ElementType::Int8));
        // 48-bit float has no reader
        assert_eq!(ElementType::from_code(-(6 + 39 * 256)), None);
        assert_eq!(ElementType::Float64.size(), 8);
    }

    #[test]
    fn test_unit_codes() {
        assert_eq!(UnitCode::from_code(0x101), UnitCode::Meter);
        assert_eq!(UnitCode::from_code(0x1000001), UnitCode::None);
        assert_eq!(UnitCode::from_code(0xfffd010200).symbol(), "s");
        assert_eq!(UnitCode::from_code(42), UnitCode::Other(42));
    }
}
