//! Numeric extraction from MDA data blocks

use crate::calibration::CalibrationRecord;
use crate::constants::ElementType;
use crate::cursor::ByteCursor;
use crate::error::MdtError;
use crate::Result;
use alloc::string::String;
use alloc::vec::Vec;
use serde::Serialize;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Samples extracted from an MDA frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MdaData {
    /// Nothing extracted (unsupported dimension/measurand combination)
    Empty,
    /// 2D scan
    Grid(Grid),
    /// 1D curve or spectrum
    Curve(Curve),
}

/// A 2D scan: two dimensions and one measurand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    /// Points along X
    pub width: usize,
    /// Points along Y
    pub height: usize,
    /// Physical size along X
    pub x_extent: f64,
    /// Physical size along Y
    pub y_extent: f64,
    /// Unit of the X (and Y) axis
    pub xy_unit: String,
    /// Unit of the measured values
    pub z_unit: String,
    /// Element type of the stored samples, `None` if unsupported
    pub element: Option<ElementType>,
    /// Scaled values in storage order (X outer, Y inner); empty when the
    /// element type is unsupported
    pub values: Vec<f64>,
}

impl Grid {
    /// Value at column `x`, row `y`
    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(x * self.height + y).copied()
    }

    /// Whether samples were extracted
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }
}

/// How the X samples of a curve were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CurveLayout {
    /// X regenerated from the X axis bias and scale
    Generated,
    /// X values live in the XML metadata; X is the sample index
    Indexed,
    /// X and Y stored interleaved in the data block
    Interleaved,
}

/// A 1D curve of paired samples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    /// Origin of the X samples
    pub layout: CurveLayout,
    /// X samples
    pub x: Vec<f64>,
    /// Y samples
    pub y: Vec<f64>,
    /// X unit
    pub x_unit: String,
    /// Y unit
    pub y_unit: String,
}

impl Curve {
    /// Number of (x, y) pairs available
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    /// Whether no pair is available
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over (x, y) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Read one raw element and widen it to `f64`
fn read_element(cursor: &mut ByteCursor, element: ElementType) -> Result<f64> {
    Ok(match element {
        ElementType::Int8 => cursor.read_i8()? as f64,
        ElementType::Uint8 => cursor.read_u8()? as f64,
        ElementType::Int16 => cursor.read_i16()? as f64,
        ElementType::Uint16 => cursor.read_u16()? as f64,
        ElementType::Int32 => cursor.read_i32()? as f64,
        ElementType::Uint32 => cursor.read_u32()? as f64,
        ElementType::Int64 => cursor.read_i64()? as f64,
        ElementType::Uint64 => cursor.read_u64()? as f64,
        ElementType::Float32 => cursor.read_f32()? as f64,
        ElementType::Float64 => cursor.read_f64()?,
    })
}

fn check_position(cursor: &ByteCursor, expected: usize) -> Result<()> {
    if cursor.tell() != expected {
        return Err(MdtError::CursorDriftError {
            expected,
            actual: cursor.tell(),
        });
    }
    Ok(())
}

/// Ensure `count` elements of `stride` bytes are present before allocating for them
fn sample_count(cursor: &ByteCursor, count: u64, stride: usize) -> Result<usize> {
    let needed = usize::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(stride).map(|bytes| (n, bytes)));

    match needed {
        Some((n, bytes)) if bytes <= cursor.remaining() => Ok(n),
        _ => Err(MdtError::TruncatedInput {
            offset: cursor.tell(),
            needed: needed.map_or(usize::MAX, |(_, bytes)| bytes),
            available: cursor.remaining(),
        }),
    }
}

/// Points along a grid axis
fn axis_len(axis: &CalibrationRecord) -> Result<usize> {
    axis.point_count()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(MdtError::AxisSizeInvalid {
            min_index: axis.min_index,
            max_index: axis.max_index,
        })
}

fn element_or_warn(axis: &CalibrationRecord, role: &str) -> Option<ElementType> {
    let element = axis.element();
    if element.is_none() {
        #[cfg(feature = "logging")]
        warn!(
            "Unsupported element type {} for {} axis {:?}, no data extracted",
            axis.element_type, role, axis.name
        );
        #[cfg(not(feature = "logging"))]
        let _ = role;
    }
    element
}

/// Extract a 2D scan from dimensions X, Y and measurand Z
///
/// `data_start` is where the MDA decoder found the data block; the cursor must
/// still be there.
pub fn extract_grid(
    cursor: &mut ByteCursor,
    x_axis: &CalibrationRecord,
    y_axis: &CalibrationRecord,
    z_axis: &CalibrationRecord,
    data_start: usize,
) -> Result<Grid> {
    check_position(cursor, data_start)?;

    if x_axis.unit != y_axis.unit {
        #[cfg(feature = "logging")]
        warn!(
            "X unit {:?} differs from Y unit {:?}, using X",
            x_axis.unit, y_axis.unit
        );
    }

    let width = axis_len(x_axis)?;
    let height = axis_len(y_axis)?;

    let element = element_or_warn(z_axis, "Z");
    let values = match element {
        Some(element) => {
            let total = sample_count(
                cursor,
                (width as u64).saturating_mul(height as u64),
                element.size(),
            )?;

            // Stored X outer, Y inner
            let mut values = Vec::with_capacity(total);
            for _ in 0..total {
                let raw = read_element(cursor, element)?;
                values.push(z_axis.bias + z_axis.scale * raw);
            }
            values
        }
        None => Vec::new(),
    };

    let x_extent = x_axis.scale * (width as f64 - 1.0);
    let y_extent = y_axis.scale * (height as f64 - 1.0);

    #[cfg(feature = "logging")]
    debug!(
        "Grid {}x{} ({} x {} {}), {} values",
        width,
        height,
        x_extent,
        y_extent,
        x_axis.display_unit(),
        values.len()
    );

    Ok(Grid {
        width,
        height,
        x_extent,
        y_extent,
        xy_unit: x_axis.display_unit(),
        z_unit: z_axis.display_unit(),
        element,
        values,
    })
}

/// Extract an old-style curve: one dimension X, one measurand Y
///
/// Only Y samples are stored. X is rebuilt from the X axis unless its comment
/// says the real values are in the XML metadata.
pub fn extract_curve(
    cursor: &mut ByteCursor,
    x_axis: &CalibrationRecord,
    y_axis: &CalibrationRecord,
    array_size: u64,
    data_start: usize,
) -> Result<Curve> {
    check_position(cursor, data_start)?;

    let mut count = x_axis.max_index.saturating_sub(x_axis.min_index);
    if count == 0 {
        count = array_size;
    }

    // Every sample takes at least one byte, so the count is bounded by the source
    let n = sample_count(cursor, count, 1)?;

    let y = match element_or_warn(y_axis, "Y") {
        Some(element) => {
            sample_count(cursor, count, element.size())?;
            let mut y = Vec::with_capacity(n);
            for _ in 0..n {
                y.push(y_axis.scale * read_element(cursor, element)?);
            }
            y
        }
        None => Vec::new(),
    };

    let (layout, x) = if x_axis.comment.is_empty() {
        let x = (0..n)
            .map(|i| x_axis.bias + i as f64 * x_axis.scale)
            .collect();
        (CurveLayout::Generated, x)
    } else {
        #[cfg(feature = "logging")]
        warn!(
            "X values of curve {:?} are stored in the XML metadata, using sample index",
            y_axis.name
        );
        (CurveLayout::Indexed, (0..n).map(|i| i as f64).collect())
    };

    Ok(Curve {
        layout,
        x,
        y,
        x_unit: x_axis.display_unit(),
        y_unit: y_axis.display_unit(),
    })
}

/// Extract a new-style curve: two measurands X and Y stored interleaved
pub fn extract_interleaved_curve(
    cursor: &mut ByteCursor,
    x_axis: &CalibrationRecord,
    y_axis: &CalibrationRecord,
    array_size: u64,
    data_start: usize,
) -> Result<Curve> {
    check_position(cursor, data_start)?;

    let x_element = element_or_warn(x_axis, "X");
    let y_element = element_or_warn(y_axis, "Y");

    let (x, y) = match (x_element, y_element) {
        (Some(xe), Some(ye)) => {
            let n = sample_count(cursor, array_size, xe.size() + ye.size())?;
            let mut x = Vec::with_capacity(n);
            let mut y = Vec::with_capacity(n);
            for _ in 0..n {
                x.push(x_axis.scale * read_element(cursor, xe)?);
                y.push(y_axis.scale * read_element(cursor, ye)?);
            }
            (x, y)
        }
        // Without both widths the interleaving stride is unknown
        _ => (Vec::new(), Vec::new()),
    };

    Ok(Curve {
        layout: CurveLayout::Interleaved,
        x,
        y,
        x_unit: x_axis.display_unit(),
        y_unit: y_axis.display_unit(),
    })
}
