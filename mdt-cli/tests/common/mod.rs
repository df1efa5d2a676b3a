#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

fn frame(kind: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&((22 + payload.len()) as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&[2, 1]);
    for field in [2023u16, 11, 2, 8, 5, 9] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn text_frame(body: &str, title: &str) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&(body.len() as u16).to_le_bytes());
    payload.extend_from_slice(&[0; 16]);
    payload.extend_from_slice(body.as_bytes());
    payload.push(title.len() as u8);
    payload.extend_from_slice(&[0; 3]);
    payload.extend_from_slice(title.as_bytes());
    payload.extend_from_slice(&[0; 4]);
    frame(3, &payload)
}

pub fn palette_frame() -> Vec<u8> {
    frame(107, &[0x40; 96])
}

/// MDA frame whose variable size disagrees with its header
pub fn broken_mda_frame() -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&76u32.to_le_bytes());
    payload.extend_from_slice(&200u32.to_le_bytes());
    payload.extend_from_slice(&[0; 36]);
    for size in [0u32, 0, 0, 0, 0, 20] {
        payload.extend_from_slice(&size.to_le_bytes());
    }
    payload.extend_from_slice(&[0; 8]);
    payload.extend_from_slice(&99u32.to_le_bytes());
    payload.extend_from_slice(&[0; 20]);
    frame(106, &payload)
}

pub fn container(frames: &[Vec<u8>]) -> Vec<u8> {
    let payload: usize = frames.iter().map(|f| f.len()).sum();
    let mut out = vec![0x01, 0xB0, 0x04, 0x00];
    out.extend_from_slice(&(payload as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&((frames.len() - 1) as u16).to_le_bytes());
    out.extend_from_slice(&[0; 19]);
    for frame in frames {
        out.extend_from_slice(frame);
    }
    out
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}
