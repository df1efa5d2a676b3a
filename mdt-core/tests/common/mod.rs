//! Builders for synthetic MDT files used across the integration tests

#![allow(dead_code)]

use bytes::{BufMut, Bytes, BytesMut};

pub const TEXT: u16 = 3;
pub const MDA: u16 = 106;
pub const PALETTE: u16 = 107;
pub const SCANNED: u16 = 0;

pub const INT16: i32 = -2;
pub const INT32: i32 = -4;
pub const FLOAT32: i32 = -(4 + 23 * 256);
pub const FLOAT64: i32 = -(8 + 52 * 256);

/// Wrap frames into a file with a correct header
pub fn container(frames: &[Bytes]) -> Bytes {
    assert!(!frames.is_empty(), "a container holds at least one frame");
    let payload: usize = frames.iter().map(|f| f.len()).sum();

    let mut buf = BytesMut::new();
    buf.put_slice(&[0x01, 0xB0, 0x04, 0x00]);
    buf.put_u32_le(payload as u32);
    buf.put_bytes(0, 4);
    buf.put_u16_le((frames.len() - 1) as u16);
    buf.put_bytes(0, 19);
    for frame in frames {
        buf.put_slice(frame);
    }
    buf.freeze()
}

/// Frame header plus payload
pub fn frame(kind: u16, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u32_le((22 + payload.len()) as u32);
    buf.put_u16_le(kind);
    buf.put_slice(&[1, 5]);
    for field in [2024u16, 3, 15, 10, 20, 30] {
        buf.put_u16_le(field);
    }
    buf.put_u16_le(0);
    buf.put_slice(payload);
    buf.freeze()
}

pub fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

/// Text frame with a non-empty title
pub fn text_frame(body: &str, title: &str, xml: &str) -> Bytes {
    let xml = utf16le(xml);
    let mut buf = BytesMut::new();
    buf.put_u16_le(body.len() as u16);
    buf.put_bytes(0, 16);
    buf.put_slice(body.as_bytes());
    buf.put_u8(title.len() as u8);
    buf.put_bytes(0, 3);
    buf.put_slice(title.as_bytes());
    buf.put_u16_le(xml.len() as u16);
    buf.put_bytes(0, 2);
    buf.put_slice(&xml);
    frame(TEXT, &buf)
}

/// Calibration record description
#[derive(Clone)]
pub struct Axis {
    pub name: &'static str,
    pub comment: &'static str,
    pub unit: &'static str,
    pub unit_code: u64,
    pub bias: f64,
    pub scale: f64,
    pub min_index: u64,
    pub max_index: u64,
    pub element_type: i32,
}

impl Axis {
    pub fn new(name: &'static str, element_type: i32) -> Self {
        Self {
            name,
            comment: "",
            unit: "",
            unit_code: 0x101,
            bias: 0.0,
            scale: 1.0,
            min_index: 0,
            max_index: 0,
            element_type,
        }
    }

    pub fn range(mut self, min_index: u64, max_index: u64) -> Self {
        self.min_index = min_index;
        self.max_index = max_index;
        self
    }

    pub fn scale(mut self, scale: f64, bias: f64) -> Self {
        self.scale = scale;
        self.bias = bias;
        self
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    pub fn comment(mut self, comment: &'static str) -> Self {
        self.comment = comment;
        self
    }
}

/// Calibration record with the usual 112-byte fixed block
pub fn calibration(axis: &Axis) -> Bytes {
    let strings = [axis.name, axis.comment, axis.unit, ""];
    let string_len: usize = strings.iter().map(|s| s.len()).sum();
    let struct_len = 112u32;

    let mut buf = BytesMut::new();
    buf.put_u32_le(8 + struct_len + string_len as u32);
    buf.put_u32_le(struct_len);
    buf.put_u32_le(axis.name.len() as u32);
    buf.put_u32_le(axis.comment.len() as u32);
    buf.put_u32_le(axis.unit.len() as u32);
    buf.put_u64_le(axis.unit_code);
    buf.put_f64_le(0.0);
    buf.put_u32_le(0);
    buf.put_u32_le(0);
    buf.put_f64_le(axis.bias);
    buf.put_f64_le(axis.scale);
    buf.put_u64_le(axis.min_index);
    buf.put_u64_le(axis.max_index);
    buf.put_i32_le(axis.element_type);
    buf.put_u32_le(0);
    buf.put_bytes(0, 36);
    for s in strings {
        buf.put_slice(s.as_bytes());
    }
    buf.freeze()
}

/// MDA frame contents
pub struct Mda<'a> {
    pub title: &'a str,
    pub xml: &'a str,
    pub dimensions: Vec<Axis>,
    pub measurands: Vec<Axis>,
    pub array_size: u64,
    pub data: Vec<u8>,
    /// Added to the variable size stored in the header
    pub var_size_skew: u32,
}

impl<'a> Mda<'a> {
    pub fn new(title: &'a str, dimensions: Vec<Axis>, measurands: Vec<Axis>) -> Self {
        Self {
            title,
            xml: "",
            dimensions,
            measurands,
            array_size: 0,
            data: Vec::new(),
            var_size_skew: 0,
        }
    }

    pub fn data(mut self, array_size: u64, data: Vec<u8>) -> Self {
        self.array_size = array_size;
        self.data = data;
        self
    }

    pub fn xml(mut self, xml: &'a str) -> Self {
        self.xml = xml;
        self
    }

    pub fn build(&self) -> Bytes {
        let xml = utf16le(self.xml);

        let mut var = BytesMut::new();
        var.put_u32_le(20);
        var.put_u64_le(self.array_size);
        var.put_u32_le(0);
        var.put_u32_le(self.dimensions.len() as u32);
        var.put_u32_le(self.measurands.len() as u32);
        for axis in self.dimensions.iter().chain(self.measurands.iter()) {
            var.put_slice(&calibration(axis));
        }

        let head_size = 76u32;
        let total_size =
            head_size as usize + self.title.len() + xml.len() + 4 + var.len() + self.data.len();

        let mut buf = BytesMut::new();
        buf.put_u32_le(head_size);
        buf.put_u32_le(total_size as u32);
        buf.put_bytes(0x11, 16);
        buf.put_bytes(0x22, 16);
        buf.put_bytes(0, 4);
        for size in [
            self.title.len() as u32,
            xml.len() as u32,
            0,
            0,
            0,
            var.len() as u32 + self.var_size_skew,
        ] {
            buf.put_u32_le(size);
        }
        buf.put_u32_le(0);
        buf.put_u32_le(self.data.len() as u32);

        buf.put_slice(self.title.as_bytes());
        buf.put_slice(&xml);
        buf.put_u32_le(var.len() as u32);
        buf.put_slice(&var);
        buf.put_slice(&self.data);
        frame(MDA, &buf)
    }
}

/// 256 x 128 int16 scan; raw value at (x, y) is `(x * 128 + y) % 1000`
pub fn scan_frame() -> Bytes {
    let mut data = Vec::with_capacity(256 * 128 * 2);
    for x in 0..256i16 {
        for y in 0..128i16 {
            data.extend_from_slice(&((x * 128 + y) % 1000).to_le_bytes());
        }
    }
    Mda::new(
        "Height",
        vec![
            Axis::new("X", INT16).range(0, 255).scale(1e-8, 0.0).unit("m"),
            Axis::new("Y", INT16).range(0, 127).scale(2e-8, 0.0).unit("m"),
        ],
        vec![Axis::new("Z", INT16).scale(0.5, 1.0).unit("nm")],
    )
    .data(256 * 128, data)
    .build()
}
