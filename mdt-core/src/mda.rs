//! Multi-dimensional array (MDA) frames
//!
//! An MDA frame nests several size-prefixed blocks:
//!
//! 1. Header: head size, total size, two GUIDs, the sizes of the title, XML,
//!    view info, frame spec, source info and variable blocks, data size.
//! 2. Title (UTF-8) and XML metadata (UTF-16), then the frame spec, view info
//!    and source info blocks, which are skipped.
//! 3. The variable block: its size again, then an array description struct
//!    followed by one calibration record per dimension and per measurand.
//! 4. The data block.

use crate::calibration::{decode_calibration, CalibrationRecord};
use crate::constants::GUID_SIZE;
use crate::cursor::{ByteCursor, Region};
use crate::encoding;
use crate::error::MdtError;
use crate::extract::{
    extract_curve, extract_grid, extract_interleaved_curve, Curve, Grid, MdaData,
};
use crate::types::FrameHeader;
use crate::Result;
use alloc::string::String;
use alloc::vec::Vec;
use encoding_rs::UTF_16LE;
use serde::Serialize;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Sizes of the blocks following the MDA header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BlockSizes {
    /// Title block
    pub title: u32,
    /// XML metadata block
    pub xml: u32,
    /// View info block
    pub view_info: u32,
    /// Frame spec block
    pub spec: u32,
    /// Source info block
    pub source_info: u32,
    /// Variable block (array struct + calibrations)
    pub var: u32,
}

/// Decoded MDA frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MdaFrame {
    /// Frame title
    pub title: String,

    /// XML metadata
    pub metadata: String,

    /// The two header GUIDs as lowercase hex, uninterpreted
    pub guids: [String; 2],

    /// MDA header size
    pub head_size: u32,

    /// MDA total size
    pub total_size: u32,

    /// Block sizes from the header
    pub blocks: BlockSizes,

    /// Data size from the header (not authoritative)
    pub data_size: u32,

    /// Number of elements from the array struct
    pub array_size: u64,

    /// Cell size from the array struct
    pub cell_size: u32,

    /// Independent axes
    pub dimensions: Vec<CalibrationRecord>,

    /// Measured quantities
    pub measurands: Vec<CalibrationRecord>,

    /// Extracted samples
    pub data: MdaData,
}

impl MdaFrame {
    /// The 2D scan, if this frame holds one
    pub fn grid(&self) -> Option<&Grid> {
        match &self.data {
            MdaData::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    /// The curve, if this frame holds one
    pub fn curve(&self) -> Option<&Curve> {
        match &self.data {
            MdaData::Curve(curve) => Some(curve),
            _ => None,
        }
    }
}

/// Decode an MDA frame; the cursor must sit right after the frame header
pub fn decode_mda_frame(cursor: &mut ByteCursor, header: &FrameHeader) -> Result<MdaFrame> {
    let frame = header.region();
    let mda_start = cursor.tell();

    let head_size = cursor.read_u32()?;
    let total_size = cursor.read_u32()?;
    if total_size < head_size {
        return Err(MdtError::HeaderSizeMismatch {
            head_size,
            total_size,
        });
    }

    let guids = [
        hex::encode(cursor.read_bytes(GUID_SIZE)?),
        hex::encode(cursor.read_bytes(GUID_SIZE)?),
    ];
    cursor.shift(4)?;

    let blocks = BlockSizes {
        title: cursor.read_u32()?,
        xml: cursor.read_u32()?,
        view_info: cursor.read_u32()?,
        spec: cursor.read_u32()?,
        source_info: cursor.read_u32()?,
        var: cursor.read_u32()?,
    };
    // Data offset, unused
    cursor.shift(4)?;
    let data_size = cursor.read_u32()?;

    #[cfg(feature = "logging")]
    debug!(
        "MDA header at {}: head {} total {} blocks {:?} data {}",
        mda_start, head_size, total_size, blocks, data_size
    );

    // Blocks start after the declared header, not after what was read
    Region::new(mda_start, head_size as usize).resync(cursor)?;

    let title = if blocks.title > 0 && frame.fits(cursor.tell(), blocks.title as usize) {
        encoding::utf8(&cursor.read_bytes(blocks.title as usize)?)
    } else {
        String::new()
    };

    let metadata = if blocks.xml > 0 && frame.fits(cursor.tell(), blocks.xml as usize) {
        UTF_16LE
            .decode(&cursor.read_bytes(blocks.xml as usize)?)
            .0
            .into_owned()
    } else {
        String::new()
    };

    cursor.shift(blocks.spec as i64)?;
    cursor.shift(blocks.view_info as i64)?;
    cursor.shift(blocks.source_info as i64)?;

    let var_size = cursor.read_u32()?;
    if var_size != blocks.var {
        return Err(MdtError::VariableSizeMismatch {
            header: blocks.var,
            data: var_size,
        });
    }

    let struct_size = cursor.read_u32()?;
    let array_struct = Region::new(cursor.tell(), struct_size as usize);
    let array_size = cursor.read_u64()?;
    let cell_size = cursor.read_u32()?;
    let dimension_count = cursor.read_u32()?;
    let measurand_count = cursor.read_u32()?;
    array_struct.resync(cursor)?;

    let dimensions = (0..dimension_count)
        .map(|_| decode_calibration(cursor))
        .collect::<Result<Vec<_>>>()?;
    let measurands = (0..measurand_count)
        .map(|_| decode_calibration(cursor))
        .collect::<Result<Vec<_>>>()?;

    let data_start = cursor.tell();

    #[cfg(feature = "logging")]
    debug!(
        "MDA {:?}: {} dimensions, {} measurands, {} elements, data at {}",
        title, dimension_count, measurand_count, array_size, data_start
    );

    let data = match (dimensions.as_slice(), measurands.as_slice()) {
        ([x, y], [z]) => MdaData::Grid(extract_grid(cursor, x, y, z, data_start)?),
        ([x], [y]) => MdaData::Curve(extract_curve(cursor, x, y, array_size, data_start)?),
        ([], [x, y]) => MdaData::Curve(extract_interleaved_curve(
            cursor, x, y, array_size, data_start,
        )?),
        ([_, _, _], [_, ..]) => {
            return Err(MdtError::UnsupportedFrameData {
                dimensions: dimension_count,
                measurands: measurand_count,
            })
        }
        _ => {
            #[cfg(feature = "logging")]
            warn!(
                "MDA frame {:?} with {} dimensions and {} measurands is not supported",
                title, dimension_count, measurand_count
            );
            MdaData::Empty
        }
    };

    Ok(MdaFrame {
        title,
        metadata,
        guids,
        head_size,
        total_size,
        blocks,
        data_size,
        array_size,
        cell_size,
        dimensions,
        measurands,
        data,
    })
}
