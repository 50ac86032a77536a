//! Bounds-checked little-endian decoding over a byte slice at an origin offset.
//!
//! A [`View`] never copies the bytes it wraps; it is a thin cursor type that
//! every decoded structure in this crate borrows from (or, for fixed-up
//! records, a view over a freshly-allocated private buffer — see
//! [`crate::fixup`]).

use crate::error::{MftError, Result};
use crate::filetime::filetime_to_datetime;
use chrono::{DateTime, Utc};

/// An immutable reference to a contiguous byte region plus an origin offset.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    buf: &'a [u8],
    origin: u64,
}

impl<'a> View<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, origin: 0 }
    }

    #[must_use]
    pub fn with_origin(buf: &'a [u8], origin: u64) -> Self {
        Self { buf, origin }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn origin(&self) -> u64 {
        self.origin
    }

    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.buf
    }

    fn check(&self, offset: usize, width: usize) -> Result<()> {
        if offset.checked_add(width).is_none_or(|end| end > self.buf.len()) {
            return Err(MftError::Overrun {
                offset: self.origin + offset as u64,
                width,
                buffer_len: self.buf.len(),
            });
        }
        Ok(())
    }

    /// Returns a sub-view starting at `offset` with the first `len` bytes,
    /// or the remainder of the buffer if `len` is `None`.
    pub fn slice(&self, offset: usize, len: Option<usize>) -> Result<View<'a>> {
        let available = self.buf.len().saturating_sub(offset);
        let len = len.unwrap_or(available);
        self.check(offset, len)?;
        Ok(View {
            buf: &self.buf[offset..offset + len],
            origin: self.origin + offset as u64,
        })
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        self.check(offset, 1)?;
        Ok(self.buf[offset])
    }

    pub fn read_i8(&self, offset: usize) -> Result<i8> {
        Ok(self.read_u8(offset)? as i8)
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        self.check(offset, 2)?;
        Ok(u16::from_le_bytes(self.buf[offset..offset + 2].try_into().unwrap()))
    }

    pub fn read_i16(&self, offset: usize) -> Result<i16> {
        self.check(offset, 2)?;
        Ok(i16::from_le_bytes(self.buf[offset..offset + 2].try_into().unwrap()))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        self.check(offset, 4)?;
        Ok(u32::from_le_bytes(self.buf[offset..offset + 4].try_into().unwrap()))
    }

    pub fn read_i32(&self, offset: usize) -> Result<i32> {
        self.check(offset, 4)?;
        Ok(i32::from_le_bytes(self.buf[offset..offset + 4].try_into().unwrap()))
    }

    pub fn read_u64(&self, offset: usize) -> Result<u64> {
        self.check(offset, 8)?;
        Ok(u64::from_le_bytes(self.buf[offset..offset + 8].try_into().unwrap()))
    }

    pub fn read_i64(&self, offset: usize) -> Result<i64> {
        self.check(offset, 8)?;
        Ok(i64::from_le_bytes(self.buf[offset..offset + 8].try_into().unwrap()))
    }

    /// Reads a 64-bit Windows FILETIME and converts it to a calendar date-time.
    pub fn read_filetime(&self, offset: usize) -> Result<DateTime<Utc>> {
        let ticks = self.read_u64(offset)?;
        filetime_to_datetime(ticks)
    }

    /// Reads `len_chars` UTF-16LE code units starting at `offset`.
    pub fn read_utf16(&self, offset: usize, len_chars: usize) -> Result<String> {
        self.check(offset, len_chars.saturating_mul(2))?;
        let units: Vec<u16> = self.buf[offset..offset + len_chars * 2]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        Ok(String::from_utf16_lossy(&units))
    }

    /// Reads `len` raw bytes starting at `offset`.
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        self.check(offset, len)?;
        Ok(&self.buf[offset..offset + len])
    }
}
