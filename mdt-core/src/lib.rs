//! # MDT Core
//!
//! Decoder for NT-MDT `.mdt` containers written by scanning-probe microscopes.
//!
//! ## Modules
//!
//! - `constants`: Layout constants, frame and element type codes
//! - `cursor`: Little-endian byte cursor and declared-length regions
//! - `types`: Core types (Container, Frame, FrameHeader, FramePayload)
//! - `frame`: Frame header decoding
//! - `text`: Text annotation frames
//! - `calibration`: Axis calibration records
//! - `mda`: Multi-dimensional array frames
//! - `extract`: 2D scan and curve extraction
//! - `container`: File header, frame loop and fault isolation
//!
//! ## Example
//!
//! ```no_run
//! let container = mdt_core::decode_file("scan.mdt").unwrap();
//! for frame in &container.frames {
//!     println!("{} {:?}", frame.header.kind.name(), frame.title());
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod calibration;
pub mod constants;
pub mod container;
pub mod cursor;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod frame;
pub mod mda;
pub mod text;
pub mod types;

// Re-export commonly used types
pub use calibration::CalibrationRecord;
pub use constants::{ElementType, FrameKind, UnitCode};
pub use container::{Decoder, FaultPolicy};
pub use error::MdtError;
pub use extract::{Curve, CurveLayout, Grid, MdaData};
pub use mda::MdaFrame;
pub use text::TextFrame;
pub use types::{Container, Frame, FrameHeader, FramePayload};

use bytes::Bytes;

/// Result type alias for MDT operations
pub type Result<T> = core::result::Result<T, MdtError>;

/// Decode an in-memory file, isolating frame-local failures
pub fn decode(data: Bytes) -> Result<Container> {
    Decoder::new().decode(data)
}

/// Decode a file held in a byte slice
pub fn decode_slice(data: &[u8]) -> Result<Container> {
    Decoder::new().decode_slice(data)
}

/// Read a source to the end and decode it
#[cfg(feature = "std")]
pub fn decode_reader<R: std::io::Read>(reader: R) -> Result<Container> {
    Decoder::new().decode_reader(reader)
}

/// Decode a file from disk
#[cfg(feature = "std")]
pub fn decode_file<P: AsRef<std::path::Path>>(path: P) -> Result<Container> {
    Decoder::new().decode_file(path)
}
