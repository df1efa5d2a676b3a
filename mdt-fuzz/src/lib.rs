//! Fuzzing entry points for the mdt-core decoder
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decode

use mdt_core::Decoder;

pub fn fuzz_decode(data: &[u8]) {
    // Try to decode - should never panic
    let _ = Decoder::new().decode_slice(data);
}

pub fn fuzz_decode_strict(data: &[u8]) {
    let _ = Decoder::new().strict().decode_slice(data);
}

/// Decode `data` as the frame area behind a valid file header
pub fn fuzz_frames(last_frame_index: u16, data: &[u8]) {
    let mut file = Vec::with_capacity(33 + data.len());
    file.extend_from_slice(&[0x01, 0xB0, 0x04, 0x00]);
    file.extend_from_slice(&(data.len() as u32).to_le_bytes());
    file.extend_from_slice(&[0; 4]);
    file.extend_from_slice(&last_frame_index.to_le_bytes());
    file.extend_from_slice(&[0; 19]);
    file.extend_from_slice(data);

    fuzz_decode(&file);
    fuzz_decode_strict(&file);
}
