//! Little-endian byte cursor and declared-length regions
//!
//! Every structure in an MDT file is located by absolute offsets derived from
//! declared sizes, so the cursor supports absolute and relative seeks on top of
//! typed reads. All reads fail with [`MdtError::TruncatedInput`] past the end.

use crate::error::MdtError;
use crate::Result;
use bytes::{Buf, Bytes};
use serde::Serialize;

/// Sequential typed reader over an immutable byte source
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Bytes,
    pos: usize,
}

impl ByteCursor {
    /// Create a cursor positioned at offset 0
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Total length of the source
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the source is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current absolute position
    pub fn tell(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the source
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Move to an absolute position; the end of the source is a valid target
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(MdtError::TruncatedInput {
                offset: self.pos,
                needed: pos.saturating_sub(self.pos),
                available: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Move relative to the current position
    pub fn shift(&mut self, delta: i64) -> Result<()> {
        let target = if delta >= 0 {
            self.pos.checked_add(delta as usize)
        } else {
            self.pos.checked_sub(delta.unsigned_abs() as usize)
        };

        match target {
            Some(pos) => self.seek(pos),
            None => Err(MdtError::TruncatedInput {
                offset: self.pos,
                needed: delta.unsigned_abs() as usize,
                available: if delta < 0 { self.pos } else { self.remaining() },
            }),
        }
    }

    /// Look at the next `n` bytes without advancing
    pub fn peek(&self, n: usize) -> Result<&[u8]> {
        self.ensure(n)?;
        Ok(&self.data[self.pos..self.pos + n])
    }

    /// Read `n` raw bytes as a zero-copy slice of the source
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        let out = self.data.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(out)
    }

    /// Read an unsigned 8-bit integer
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?.get_u8())
    }

    /// Read a signed 8-bit integer
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?.get_i8())
    }

    /// Read a little-endian `u16`
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.take(2)?.get_u16_le())
    }

    /// Read a little-endian `i16`
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.take(2)?.get_i16_le())
    }

    /// Read a little-endian `u32`
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.take(4)?.get_u32_le())
    }

    /// Read a little-endian `i32`
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.take(4)?.get_i32_le())
    }

    /// Read a little-endian `u64`
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.take(8)?.get_u64_le())
    }

    /// Read a little-endian `i64`
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.take(8)?.get_i64_le())
    }

    /// Read a little-endian IEEE single
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.take(4)?.get_f32_le())
    }

    /// Read a little-endian IEEE double
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.take(8)?.get_f64_le())
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(MdtError::TruncatedInput {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        self.ensure(n)?;
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..start + n])
    }
}

/// A block of the source located by its start offset and declared length
///
/// Decoders never trust how many bytes they consumed inside a block; they
/// [`resync`](Region::resync) to its declared end instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Absolute start offset
    pub start: usize,
    /// Declared length in bytes
    pub len: usize,
}

impl Region {
    /// Create a region
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Absolute offset one past the declared end
    pub const fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    /// Declared bytes left after `pos` (zero once `pos` is past the end)
    pub const fn remaining_from(&self, pos: usize) -> usize {
        self.end().saturating_sub(pos)
    }

    /// Whether `n` bytes starting at `pos` stay inside the region
    pub const fn fits(&self, pos: usize, n: usize) -> bool {
        self.remaining_from(pos) >= n
    }

    /// Move the cursor to the declared end of the region
    pub fn resync(&self, cursor: &mut ByteCursor) -> Result<()> {
        cursor.seek(self.end())
    }
}
