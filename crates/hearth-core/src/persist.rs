//! Versioned binary records
//!
//! Every persisted type writes an encoded-int version followed by its
//! fields in a fixed order. Newer versions only append fields, so a reader
//! decodes exactly what the stored version wrote and then migrates the raw
//! fields to the current shape, defaulting anything the old version lacked.

use crate::error::{Error, Result};

/// Little-endian record writer
#[derive(Debug, Clone, Default)]
pub struct GenericWriter {
    buf: Vec<u8>,
}

impl GenericWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a 7-bit variable length integer
    pub fn write_encoded_int(&mut self, value: i32) {
        let mut v = value as u32;
        while v >= 0x80 {
            self.buf.push((v as u8) | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
    }

    pub fn write_int(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Write a presence flag followed by a length-prefixed UTF-8 string
    pub fn write_string(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.write_bool(true);
                self.write_encoded_int(s.len() as i32);
                self.buf.extend_from_slice(s.as_bytes());
            }
            None => self.write_bool(false),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Little-endian record reader over a borrowed buffer
#[derive(Debug, Clone)]
pub struct GenericReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> GenericReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(Error::UnexpectedEof { needed, remaining });
        }
        let bytes = &self.buf[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    pub fn read_encoded_int(&mut self) -> Result<i32> {
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_byte()?;
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value as i32);
            }
        }
        Err(Error::MalformedEncodedInt)
    }

    pub fn read_int(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_string(&mut self) -> Result<Option<String>> {
        if !self.read_bool()? {
            return Ok(None);
        }
        let len = self.read_encoded_int()?;
        let len = usize::try_from(len).map_err(|_| Error::MalformedEncodedInt)?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|_| Error::InvalidUtf8)
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }
}

/// A type persisted as a version tag plus version-gated fields
///
/// `read_raw` decodes exactly the fields the given version wrote and
/// leaves everything else at `Raw::default()`; `migrate` turns those raw
/// fields into the current shape. Versions newer than [`Versioned::VERSION`]
/// read nothing and migrate to `Self::default()`.
pub trait Versioned: Sized + Default {
    /// Fields as decoded from a record of any version
    type Raw: Default;

    /// Version written by [`Versioned::serialize`]
    const VERSION: i32;

    /// Write the fields of the current version (without the version tag)
    fn write_fields(&self, writer: &mut GenericWriter);

    /// Read the fields a record of `version` contains
    fn read_raw(version: i32, reader: &mut GenericReader<'_>) -> Result<Self::Raw>;

    /// Convert raw fields of `version` into the current shape
    fn migrate(version: i32, raw: Self::Raw) -> Self;

    fn serialize(&self, writer: &mut GenericWriter) {
        writer.write_encoded_int(Self::VERSION);
        self.write_fields(writer);
    }

    fn deserialize(reader: &mut GenericReader<'_>) -> Result<Self> {
        let version = reader.read_encoded_int()?;
        let raw = Self::read_raw(version, reader)?;
        Ok(Self::migrate(version, raw))
    }

    /// Serialize into a fresh buffer
    fn to_record(&self) -> Vec<u8> {
        let mut writer = GenericWriter::new();
        self.serialize(&mut writer);
        writer.into_bytes()
    }

    /// Deserialize from a complete buffer
    fn from_record(bytes: &[u8]) -> Result<Self> {
        Self::deserialize(&mut GenericReader::new(bytes))
    }
}
