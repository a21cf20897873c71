//! Declarative field tables for the fixed-size records.
//!
//! Each record type declares its fields once as [`FieldSpec`] constants and
//! lists them in a [`RecordSchema`]. Decode and encode both address fields
//! through those constants, and [`RecordSchema::validate`] checks that the
//! table tiles the record with no gaps, which is what makes
//! `encode(decode(raw)) == raw` hold for every blob.

use std::fmt;
use std::io;
use std::ops::Range;

use crate::error::{Result, SaveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    Bytes(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    pub const fn width(&self) -> usize {
        match self.kind {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::Bytes(n) => n,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.width()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub kind: &'static str,
    pub size: usize,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    pub fn validate(&self) -> io::Result<()> {
        let mut expected = 0usize;
        for field in self.fields {
            if field.offset != expected {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "{} schema gap/overlap at field {}: expected offset {:#04x}, got {:#04x}",
                        self.kind, field.name, expected, field.offset
                    ),
                ));
            }
            if field.width() == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} schema field {} has zero width", self.kind, field.name),
                ));
            }
            expected = field.range().end;
        }

        if expected != self.size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{} schema does not cover record: ended at {}, record size {}",
                    self.kind, expected, self.size
                ),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    Bytes(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::Bytes(bytes) => {
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Every field of `raw` as `(name, value)` in schema order.
pub fn dump(schema: &RecordSchema, raw: &[u8]) -> Result<Vec<(&'static str, FieldValue)>> {
    if raw.len() != schema.size {
        return Err(SaveError::BlobSize {
            kind: schema.kind,
            expected: schema.size,
            actual: raw.len(),
        });
    }
    let r = BlobReader::new(raw);
    Ok(schema
        .fields
        .iter()
        .map(|field| {
            let value = match field.kind {
                FieldKind::U8 => FieldValue::U8(r.u8(field)),
                FieldKind::U16 => FieldValue::U16(r.u16(field)),
                FieldKind::U32 => FieldValue::U32(r.u32(field)),
                FieldKind::Bytes(_) => FieldValue::Bytes(raw[field.range()].to_vec()),
            };
            (field.name, value)
        })
        .collect())
}

/// Field-addressed reads over a blob whose length was already checked.
pub struct BlobReader<'a> {
    raw: &'a [u8],
}

impl<'a> BlobReader<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        Self { raw }
    }

    pub fn u8(&self, field: &FieldSpec) -> u8 {
        debug_assert_eq!(field.kind, FieldKind::U8, "{}", field.name);
        self.raw[field.offset]
    }

    pub fn u16(&self, field: &FieldSpec) -> u16 {
        debug_assert_eq!(field.kind, FieldKind::U16, "{}", field.name);
        u16::from_le_bytes([self.raw[field.offset], self.raw[field.offset + 1]])
    }

    pub fn u32(&self, field: &FieldSpec) -> u32 {
        debug_assert_eq!(field.kind, FieldKind::U32, "{}", field.name);
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.raw[field.range()]);
        u32::from_le_bytes(buf)
    }

    pub fn bytes<const N: usize>(&self, field: &FieldSpec) -> [u8; N] {
        debug_assert_eq!(field.kind, FieldKind::Bytes(N), "{}", field.name);
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.raw[field.range()]);
        buf
    }
}

pub struct BlobWriter {
    buf: Vec<u8>,
}

impl BlobWriter {
    pub fn new(schema: &RecordSchema) -> Self {
        Self {
            buf: vec![0u8; schema.size],
        }
    }

    pub fn put_u8(&mut self, field: &FieldSpec, value: u8) {
        debug_assert_eq!(field.kind, FieldKind::U8, "{}", field.name);
        self.buf[field.offset] = value;
    }

    pub fn put_u16(&mut self, field: &FieldSpec, value: u16) {
        debug_assert_eq!(field.kind, FieldKind::U16, "{}", field.name);
        self.buf[field.range()].copy_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, field: &FieldSpec, value: u32) {
        debug_assert_eq!(field.kind, FieldKind::U32, "{}", field.name);
        self.buf[field.range()].copy_from_slice(&value.to_le_bytes());
    }

    pub fn put_bytes(&mut self, field: &FieldSpec, value: &[u8]) {
        debug_assert_eq!(field.kind, FieldKind::Bytes(value.len()), "{}", field.name);
        self.buf[field.range()].copy_from_slice(value);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// A fixed-size record occupying one slot of a save-file array.
pub trait Record: Sized {
    const SCHEMA: RecordSchema;
    const COUNT: usize;

    fn decode(slot: usize, raw: &[u8]) -> Result<Self>;

    fn encode(&self) -> Vec<u8>;

    fn slot(&self) -> usize;

    /// Text a selective save compares after re-decoding its own output.
    fn identity(&self) -> String;
}

pub(crate) fn check_blob(schema: &RecordSchema, count: usize, slot: usize, raw: &[u8]) -> Result<()> {
    if slot >= count {
        return Err(SaveError::SlotOutOfRange {
            kind: schema.kind,
            slot,
            count,
        });
    }
    if raw.len() != schema.size {
        return Err(SaveError::BlobSize {
            kind: schema.kind,
            expected: schema.size,
            actual: raw.len(),
        });
    }
    Ok(())
}
