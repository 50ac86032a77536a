//! The node header shared by $INDEX_ROOT and every $INDEX_ALLOCATION block:
//! where the entry stream starts, how much of it is in use, and how much is
//! allocated (the gap between the two is slack space).

use crate::error::Result;
use crate::view::View;
use serde::Serialize;

/// A minimum on-disk footprint below which no further entry can fit; used to
/// bound both the live-entry and slack-entry scan loops.
pub const MIN_ENTRY_SIZE: usize = 0x52;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexHeader {
    pub entries_offset: u32,
    pub index_length: u32,
    pub allocated_size: u32,
    pub flags: u8,
}

impl IndexHeader {
    pub const SIZE: usize = 0x10;

    pub fn decode(view: View<'_>, offset: usize) -> Result<Self> {
        Ok(Self {
            entries_offset: view.read_u32(offset)?,
            index_length: view.read_u32(offset + 0x04)?,
            allocated_size: view.read_u32(offset + 0x08)?,
            flags: view.read_u8(offset + 0x0C)?,
        })
    }

    #[must_use]
    pub fn is_small_index(&self) -> bool {
        self.flags & 0x1 == 0
    }

    #[must_use]
    pub fn is_large_index(&self) -> bool {
        self.flags & 0x1 != 0
    }

    #[must_use]
    pub fn is_leaf_node(&self) -> bool {
        self.flags & 0x1 != 0
    }

    #[must_use]
    pub fn is_index_node(&self) -> bool {
        self.flags & 0x2 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(entries_offset: u32, index_length: u32, allocated_size: u32, flags: u8) -> Vec<u8> {
        let mut buf = vec![0u8; IndexHeader::SIZE];
        buf[0x00..0x04].copy_from_slice(&entries_offset.to_le_bytes());
        buf[0x04..0x08].copy_from_slice(&index_length.to_le_bytes());
        buf[0x08..0x0C].copy_from_slice(&allocated_size.to_le_bytes());
        buf[0x0C] = flags;
        buf
    }

    #[test]
    fn decodes_fields() {
        let buf = build(0x28, 0x100, 0x1000, 0x01);
        let header = IndexHeader::decode(View::new(&buf), 0).unwrap();
        assert_eq!(header.entries_offset, 0x28);
        assert!(header.is_large_index());
        assert!(header.is_leaf_node());
        assert!(!header.is_index_node());
    }

    #[test]
    fn small_index_has_low_bit_clear() {
        let buf = build(0x28, 0x100, 0x100, 0x00);
        let header = IndexHeader::decode(View::new(&buf), 0).unwrap();
        assert!(header.is_small_index());
    }
}
