//! The column cache owns every column of a tile's attribute data. The writer side
//! deduplicates scalars on insert and serializes all columns as sibling fields of one
//! wire message. The reader side scans that message once, recording only byte
//! positions, and decodes individual entries on demand, memoizing each result so
//! repeat reads are O(1).

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::pbf::{PbfReader, PbfWriter, WireType};
use crate::value::Value;

/// Field numbers of the columns inside the tile message. These are fixed by the Open
/// Vector Tile specification and must not be reassigned. The low three bits of a scalar
/// column reference hold one of the first four kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    String = 0,
    Unsigned = 1,
    Signed = 2,
    Double = 3,
    Shapes = 6,
    Values = 7,
}

impl ColumnKind {
    /// The scalar column named by the low bits of a reference token. Only the four
    /// scalar kinds are addressable this way.
    pub fn from_ref_bits(v: u64) -> Result<ColumnKind> {
        match v {
            0 => Ok(ColumnKind::String),
            1 => Ok(ColumnKind::Unsigned),
            2 => Ok(ColumnKind::Signed),
            3 => Ok(ColumnKind::Double),
            _ => Err(Error::MalformedValue(format!(
                "reference into unknown column {}",
                v
            ))),
        }
    }
}

/// Packs a scalar column reference into one token: `(index << 3) | column`.
pub(crate) fn ref_token(kind: ColumnKind, index: usize) -> u64 {
    ((index as u64) << 3) | kind as u64
}

/// Splits a reference token back into its column bits and index.
pub(crate) fn split_ref(token: u64) -> (u64, usize) {
    (token & 0x7, (token >> 3) as usize)
}

/// The writer half of the column cache: every column is a live, append-only sequence,
/// with a hash-map side table per scalar column so interning the same value twice
/// returns the same index without growing the column. Indices are stable for the life
/// of the cache.
#[derive(Clone, Debug, Default)]
pub struct ColumnCacheWriter {
    strings: Vec<String>,
    string_dedup: HashMap<String, usize>,
    unsigned: Vec<u64>,
    unsigned_dedup: HashMap<u64, usize>,
    signed: Vec<i64>,
    signed_dedup: HashMap<i64, usize>,
    doubles: Vec<f64>,
    // Keyed by bit pattern so NaN and -0.0 dedup deterministically.
    double_dedup: HashMap<u64, usize>,
    shapes: Vec<Vec<u64>>,
    shape_dedup: HashMap<Vec<u64>, usize>,
    values: Vec<Vec<u64>>,
}

impl ColumnCacheWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern_string(&mut self, v: &str) -> usize {
        if let Some(&index) = self.string_dedup.get(v) {
            return index;
        }
        let index = self.strings.len();
        self.strings.push(v.to_string());
        self.string_dedup.insert(v.to_string(), index);
        index
    }

    pub fn intern_unsigned(&mut self, v: u64) -> usize {
        if let Some(&index) = self.unsigned_dedup.get(&v) {
            return index;
        }
        let index = self.unsigned.len();
        self.unsigned.push(v);
        self.unsigned_dedup.insert(v, index);
        index
    }

    pub fn intern_signed(&mut self, v: i64) -> usize {
        if let Some(&index) = self.signed_dedup.get(&v) {
            return index;
        }
        let index = self.signed.len();
        self.signed.push(v);
        self.signed_dedup.insert(v, index);
        index
    }

    pub fn intern_double(&mut self, v: f64) -> usize {
        let bits = v.to_bits();
        if let Some(&index) = self.double_dedup.get(&bits) {
            return index;
        }
        let index = self.doubles.len();
        self.doubles.push(v);
        self.double_dedup.insert(bits, index);
        index
    }

    /// Interns a shape entry, deduplicating by full ordered equality.
    pub fn intern_shape(&mut self, shape: Vec<u64>) -> usize {
        if let Some(&index) = self.shape_dedup.get(&shape) {
            return index;
        }
        let index = self.shapes.len();
        self.shape_dedup.insert(shape.clone(), index);
        self.shapes.push(shape);
        index
    }

    /// Appends a values-column entry. Never deduplicated: a cheap append beats a deep
    /// comparison at this layer, and dedup savings are already captured by the scalar
    /// and shape columns.
    pub fn push_value_entry(&mut self, tokens: Vec<u64>) -> usize {
        let index = self.values.len();
        self.values.push(tokens);
        index
    }

    /// Number of entries currently held in one column.
    pub fn len(&self, kind: ColumnKind) -> usize {
        match kind {
            ColumnKind::String => self.strings.len(),
            ColumnKind::Unsigned => self.unsigned.len(),
            ColumnKind::Signed => self.signed.len(),
            ColumnKind::Double => self.doubles.len(),
            ColumnKind::Shapes => self.shapes.len(),
            ColumnKind::Values => self.values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
            && self.unsigned.is_empty()
            && self.signed.is_empty()
            && self.doubles.is_empty()
            && self.shapes.is_empty()
            && self.values.is_empty()
    }

    /// Serializes every non-empty column into `out`, one field occurrence per entry,
    /// in fixed field-number order. Shape entries are delta-plus-zigzag coded varint
    /// lists; values entries are plain varint lists.
    pub fn write(&self, out: &mut PbfWriter) {
        for s in &self.strings {
            out.write_string_field(ColumnKind::String as u32, s);
        }
        for &v in &self.unsigned {
            out.write_varint_field(ColumnKind::Unsigned as u32, v);
        }
        for &v in &self.signed {
            out.write_svarint_field(ColumnKind::Signed as u32, v);
        }
        for &v in &self.doubles {
            out.write_double_field(ColumnKind::Double as u32, v);
        }
        for shape in &self.shapes {
            let mut payload = PbfWriter::new();
            let mut prev = 0i64;
            for &token in shape {
                payload.write_svarint(token as i64 - prev);
                prev = token as i64;
            }
            out.write_message(ColumnKind::Shapes as u32, payload.as_slice());
        }
        for entry in &self.values {
            let mut payload = PbfWriter::new();
            for &token in entry {
                payload.write_varint(token);
            }
            out.write_message(ColumnKind::Values as u32, payload.as_slice());
        }
    }
}

/// One reader-side column slot: a byte position until first access, the decoded value
/// afterwards.
#[derive(Clone, Debug)]
enum Slot<T> {
    Unresolved(usize),
    Resolved(T),
}

#[derive(Clone, Debug)]
struct LazyColumn<T> {
    name: &'static str,
    slots: Vec<Slot<T>>,
}

impl<T: Clone> LazyColumn<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Vec::new(),
        }
    }

    fn push(&mut self, pos: usize) {
        self.slots.push(Slot::Unresolved(pos));
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&mut self, index: usize, decode: impl FnOnce(usize) -> Result<T>) -> Result<T> {
        match self.slots.get(index) {
            None => Err(Error::MalformedValue(format!(
                "{} column index {} out of range ({} entries)",
                self.name,
                index,
                self.slots.len()
            ))),
            Some(Slot::Resolved(v)) => Ok(v.clone()),
            Some(Slot::Unresolved(pos)) => {
                let v = decode(*pos)?;
                self.slots[index] = Slot::Resolved(v.clone());
                Ok(v)
            }
        }
    }
}

/// The reader half of the column cache. Construction performs a single linear scan of
/// the tile message and records, per column, the byte position of each entry without
/// decoding anything, so decode cost is bounded by the entries actually requested.
#[derive(Clone, Debug)]
pub struct ColumnCacheReader<'a> {
    buf: &'a [u8],
    strings: LazyColumn<String>,
    unsigned: LazyColumn<u64>,
    signed: LazyColumn<i64>,
    doubles: LazyColumn<f64>,
    shapes: LazyColumn<Vec<u64>>,
    // The values column keeps a position directory plus two memo tables: raw token
    // lists (shared by both codecs) and fully decoded documents (value codec only).
    value_positions: Vec<usize>,
    token_memo: HashMap<usize, Vec<u64>>,
    decoded_memo: HashMap<usize, Value>,
}

impl<'a> ColumnCacheReader<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let mut cache = ColumnCacheReader {
            buf,
            strings: LazyColumn::new("string"),
            unsigned: LazyColumn::new("unsigned"),
            signed: LazyColumn::new("signed"),
            doubles: LazyColumn::new("double"),
            shapes: LazyColumn::new("shapes"),
            value_positions: Vec::new(),
            token_memo: HashMap::new(),
            decoded_memo: HashMap::new(),
        };
        let mut pbf = PbfReader::new(buf);
        while let Some((field, wire)) = pbf.read_tag()? {
            let pos = pbf.pos();
            match (field, wire) {
                (0, WireType::LengthDelimited) => cache.strings.push(pos),
                (1, WireType::Varint) => cache.unsigned.push(pos),
                (2, WireType::Varint) => cache.signed.push(pos),
                (3, WireType::Fixed64) => cache.doubles.push(pos),
                (6, WireType::LengthDelimited) => cache.shapes.push(pos),
                (7, WireType::LengthDelimited) => cache.value_positions.push(pos),
                // Unknown fields are tolerated so newer tiles still parse.
                _ => {}
            }
            pbf.skip(wire)?;
        }
        Ok(cache)
    }

    /// Number of entries the scan found in one column.
    pub fn len(&self, kind: ColumnKind) -> usize {
        match kind {
            ColumnKind::String => self.strings.len(),
            ColumnKind::Unsigned => self.unsigned.len(),
            ColumnKind::Signed => self.signed.len(),
            ColumnKind::Double => self.doubles.len(),
            ColumnKind::Shapes => self.shapes.len(),
            ColumnKind::Values => self.value_positions.len(),
        }
    }

    pub fn string(&mut self, index: usize) -> Result<String> {
        let buf = self.buf;
        self.strings
            .get(index, |pos| PbfReader::at(buf, pos).read_string())
    }

    pub fn unsigned(&mut self, index: usize) -> Result<u64> {
        let buf = self.buf;
        self.unsigned
            .get(index, |pos| PbfReader::at(buf, pos).read_varint())
    }

    pub fn signed(&mut self, index: usize) -> Result<i64> {
        let buf = self.buf;
        self.signed
            .get(index, |pos| PbfReader::at(buf, pos).read_svarint())
    }

    pub fn double(&mut self, index: usize) -> Result<f64> {
        let buf = self.buf;
        self.doubles
            .get(index, |pos| PbfReader::at(buf, pos).read_double())
    }

    /// One shape entry, delta-decoded back to absolute tokens.
    pub fn shape(&mut self, index: usize) -> Result<Vec<u64>> {
        let buf = self.buf;
        self.shapes.get(index, |pos| {
            let mut pbf = bounded_entry(buf, pos)?;
            let mut tokens = Vec::new();
            let mut prev = 0i64;
            while pbf.remaining() > 0 {
                prev = prev.checked_add(pbf.read_svarint()?).ok_or_else(|| {
                    Error::MalformedValue("shape entry delta overflows".to_string())
                })?;
                if prev < 0 {
                    return Err(Error::MalformedValue(
                        "shape entry delta decodes below zero".to_string(),
                    ));
                }
                tokens.push(prev as u64);
            }
            Ok(tokens)
        })
    }

    /// The raw token list of one values-column entry. How the tokens are interpreted
    /// is up to the codec that wrote them.
    pub fn value_tokens(&mut self, index: usize) -> Result<Vec<u64>> {
        if let Some(tokens) = self.token_memo.get(&index) {
            return Ok(tokens.clone());
        }
        let pos = *self.value_positions.get(index).ok_or_else(|| {
            Error::MalformedValue(format!(
                "values column index {} out of range ({} entries)",
                index,
                self.value_positions.len()
            ))
        })?;
        let mut pbf = bounded_entry(self.buf, pos)?;
        let mut tokens = Vec::new();
        while pbf.remaining() > 0 {
            tokens.push(pbf.read_varint()?);
        }
        self.token_memo.insert(index, tokens.clone());
        Ok(tokens)
    }

    pub(crate) fn cached_value(&self, index: usize) -> Option<Value> {
        self.decoded_memo.get(&index).cloned()
    }

    pub(crate) fn memoize_value(&mut self, index: usize, value: Value) {
        self.decoded_memo.insert(index, value);
    }
}

/// A cursor over one length-delimited entry, clipped to the entry's own bytes so a
/// varint can never run past the entry boundary unnoticed.
fn bounded_entry(buf: &[u8], pos: usize) -> Result<PbfReader<'_>> {
    let mut pbf = PbfReader::at(buf, pos);
    let len = pbf.read_varint()? as usize;
    let start = pbf.pos();
    let remaining = buf.len() - start;
    if len > remaining {
        return Err(Error::BufferOverrun {
            needed: len,
            remaining,
        });
    }
    Ok(PbfReader::at(&buf[..start + len], start))
}
