//! Protocol-buffer wire primitives: varints, zigzag varints, little-endian doubles,
//! and tagged, length-delimited fields over a flat byte buffer. The column cache writes
//! every column through this layer, and the published Open Vector Tile byte layout is
//! built entirely out of these primitives.

use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Protobuf wire types used by the tile format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u64(v: u64) -> Result<WireType> {
        match v {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            _ => Err(Error::MalformedValue(format!("unknown wire type {}", v))),
        }
    }
}

fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// A cursor over an immutable byte buffer. Running out of bytes is always reported as
/// [`Error::BufferOverrun`], never silently clamped.
#[derive(Clone, Debug)]
pub struct PbfReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PbfReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// A cursor positioned partway into the buffer, for decoding an entry whose byte
    /// position was recorded during an earlier scan.
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::BufferOverrun {
                needed: n,
                remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let mut val = 0u64;
        for shift in 0..10 {
            let byte = self.take(1)?[0];
            val |= ((byte & 0x7f) as u64) << (7 * shift);
            if byte < 0x80 {
                return Ok(val);
            }
        }
        Err(Error::MalformedValue(
            "varint exceeds 10 bytes".to_string(),
        ))
    }

    pub fn read_svarint(&mut self) -> Result<i64> {
        Ok(zigzag_decode(self.read_varint()?))
    }

    pub fn read_double(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::MalformedValue(format!("invalid UTF-8 in string column: {}", e)))
    }

    /// Reads the next field key, or `None` at the end of the buffer.
    pub fn read_tag(&mut self) -> Result<Option<(u32, WireType)>> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        let key = self.read_varint()?;
        let wire = WireType::from_u64(key & 0x7)?;
        Ok(Some(((key >> 3) as u32, wire)))
    }

    /// Skips over one field's payload without decoding it.
    pub fn skip(&mut self, wire: WireType) -> Result<()> {
        match wire {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::LengthDelimited => {
                let len = self.read_varint()? as usize;
                self.take(len)?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
        }
        Ok(())
    }
}

/// An append-only output buffer with the matching write primitives.
#[derive(Clone, Debug, Default)]
pub struct PbfWriter {
    buf: Vec<u8>,
}

impl PbfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_varint(&mut self, mut v: u64) {
        while v >= 0x80 {
            self.buf.push((v as u8) | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
    }

    pub fn write_svarint(&mut self, v: i64) {
        self.write_varint(zigzag_encode(v));
    }

    pub fn write_double(&mut self, v: f64) {
        let mut bytes = [0u8; 8];
        LittleEndian::write_f64(&mut bytes, v);
        self.buf.extend_from_slice(&bytes);
    }

    fn write_key(&mut self, field: u32, wire: WireType) {
        self.write_varint(((field as u64) << 3) | wire as u64);
    }

    pub fn write_varint_field(&mut self, field: u32, v: u64) {
        self.write_key(field, WireType::Varint);
        self.write_varint(v);
    }

    pub fn write_svarint_field(&mut self, field: u32, v: i64) {
        self.write_key(field, WireType::Varint);
        self.write_svarint(v);
    }

    pub fn write_double_field(&mut self, field: u32, v: f64) {
        self.write_key(field, WireType::Fixed64);
        self.write_double(v);
    }

    pub fn write_string_field(&mut self, field: u32, v: &str) {
        self.write_key(field, WireType::LengthDelimited);
        self.write_varint(v.len() as u64);
        self.buf.extend_from_slice(v.as_bytes());
    }

    /// Embeds one column as a length-delimited sub-message.
    pub fn write_message(&mut self, field: u32, payload: &[u8]) {
        self.write_key(field, WireType::LengthDelimited);
        self.write_varint(payload.len() as u64);
        self.buf.extend_from_slice(payload);
    }
}
