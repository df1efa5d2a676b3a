//! Single-byte and UTF-8 string decoding
//!
//! UTF-16 metadata goes through `encoding_rs` at the call sites.

use alloc::string::String;

/// Decode UTF-8, replacing invalid sequences
pub fn utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Map every byte to the code point of the same value
///
/// Calibration strings are single-byte encoded and carry bytes such as 0xB0
/// (degree sign) that are not valid UTF-8 on their own.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
