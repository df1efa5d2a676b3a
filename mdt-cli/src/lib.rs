//! Library entry for mdt-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

use anyhow::{Context, Result};
use bytes::Bytes;
use mdt_core::{Container, Decoder};
use std::fs;
use tracing::info;

/// Read and decode a file, logging what was found
pub fn load(input: &str, strict: bool) -> Result<Container> {
    info!("Reading file: {}", input);

    let data = fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?;

    info!("File size: {} bytes", data.len());

    let decoder = if strict {
        Decoder::new().strict()
    } else {
        Decoder::new()
    };

    decoder
        .decode(Bytes::from(data))
        .with_context(|| format!("Failed to decode MDT file: {}", input))
}
