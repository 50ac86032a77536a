//! Directory index decoding: $INDEX_ROOT (the small, resident index kept
//! inline in an MFT record), $INDEX_ALLOCATION (the non-resident run of
//! 4096-byte INDX blocks a large directory spills into), and the entry
//! streams held by both.

pub mod entry;
pub mod header;

pub use entry::{DirectoryEntry, IndexEntryCodec, SdhEntry, SiiEntry};
pub use header::IndexHeader;

use crate::error::{MftError, Result};
use crate::fixup::apply_fixup;
use crate::view::View;
use header::MIN_ENTRY_SIZE;
use serde::Serialize;

pub const INDX_MAGIC: u32 = 0x5844_4E49;
pub const INDX_BLOCK_SIZE: usize = 0x1000;

/// Walks the live entry stream starting at `header.entries_offset`, stopping
/// once fewer than [`MIN_ENTRY_SIZE`] bytes remain before `index_length`.
pub fn decode_entries<E: IndexEntryCodec>(view: View<'_>, header: &IndexHeader) -> Result<Vec<E>> {
    let mut out = Vec::new();
    let mut offset = header.entries_offset as usize;
    if offset == 0 {
        return Ok(out);
    }
    let index_length = header.index_length as usize;
    while index_length >= MIN_ENTRY_SIZE && offset <= index_length - MIN_ENTRY_SIZE {
        let entry = E::decode(view, offset)?;
        let len = entry.on_disk_length();
        out.push(entry);
        offset += len.max(1);
    }
    Ok(out)
}

/// Walks the slack region between `index_length` and `allocated_size`. A
/// decode failure or a failed validity check never aborts the scan: it
/// advances one byte and retries, matching the reference scanner's
/// "keep scanning forward" recovery behavior. Overruns end the scan
/// silently, since slack space legitimately runs out mid-structure.
pub fn decode_slack_entries<E: IndexEntryCodec>(view: View<'_>, header: &IndexHeader) -> Vec<E> {
    let mut out = Vec::new();
    let mut offset = header.index_length as usize;
    let allocated_size = header.allocated_size as usize;

    while allocated_size >= MIN_ENTRY_SIZE && offset <= allocated_size - MIN_ENTRY_SIZE {
        match E::decode(view, offset) {
            Ok(entry) if entry.is_valid_slack_candidate() => {
                let len = entry.on_disk_length().max(1);
                out.push(entry);
                offset += len;
            }
            _ => offset += 1,
        }
    }
    out
}

/// The resident $INDEX_ROOT attribute value: a fixed header describing the
/// indexed attribute plus an embedded, non-fixup-protected index node.
#[derive(Debug, Clone, Serialize)]
pub struct IndexRoot {
    pub indexed_attribute_type: u32,
    pub collation_rule: u32,
    pub index_record_size_bytes: u32,
    pub index_record_size_clusters: u8,
    pub header: IndexHeader,
}

impl IndexRoot {
    const HEADER_OFFSET: usize = 0x10;

    pub fn decode(view: View<'_>) -> Result<Self> {
        let header = IndexHeader::decode(view, Self::HEADER_OFFSET)?;
        Ok(Self {
            indexed_attribute_type: view.read_u32(0x00)?,
            collation_rule: view.read_u32(0x04)?,
            index_record_size_bytes: view.read_u32(0x08)?,
            index_record_size_clusters: view.read_u8(0x0C)?,
            header,
        })
    }

    fn index_view<'a>(&self, view: View<'a>) -> Result<View<'a>> {
        view.slice(Self::HEADER_OFFSET, None)
    }

    pub fn directory_entries(&self, view: View<'_>) -> Result<Vec<DirectoryEntry>> {
        decode_entries(self.index_view(view)?, &self.header)
    }

    pub fn sii_entries(&self, view: View<'_>) -> Result<Vec<SiiEntry>> {
        decode_entries(self.index_view(view)?, &self.header)
    }

    pub fn sdh_entries(&self, view: View<'_>) -> Result<Vec<SdhEntry>> {
        decode_entries(self.index_view(view)?, &self.header)
    }
}

/// A single fixed-up 4096-byte INDX block belonging to an $INDEX_ALLOCATION
/// run.
#[derive(Debug)]
pub struct IndexBlock {
    buf: Vec<u8>,
    pub lsn: u64,
    pub vcn: u64,
    pub header: IndexHeader,
}

impl IndexBlock {
    const NODE_HEADER_OFFSET: usize = 0x18;

    /// Decodes one block from a raw, not-yet-fixed-up 4096-byte slice.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let raw_view = View::new(raw);
        let magic = raw_view.read_u32(0x00)?;
        if magic != INDX_MAGIC {
            return Err(MftError::Parse {
                offset: raw_view.origin(),
                message: format!("bad INDX magic {magic:#010x}"),
            });
        }
        let usa_offset = raw_view.read_u16(0x04)?;
        let usa_count = raw_view.read_u16(0x06)?;
        let buf = apply_fixup(&raw_view, usa_offset as usize, usa_count);

        let fixed = View::new(&buf);
        let lsn = fixed.read_u64(0x08)?;
        let vcn = fixed.read_u64(0x10)?;
        let header = IndexHeader::decode(fixed, Self::NODE_HEADER_OFFSET)?;

        Ok(Self { buf, lsn, vcn, header })
    }

    fn index_view(&self) -> View<'_> {
        View::new(&self.buf)
            .slice(Self::NODE_HEADER_OFFSET, None)
            .expect("fixed-up buffer always covers its own node header")
    }

    pub fn directory_entries(&self) -> Result<Vec<DirectoryEntry>> {
        decode_entries(self.index_view(), &self.header)
    }

    pub fn directory_slack_entries(&self) -> Vec<DirectoryEntry> {
        decode_slack_entries(self.index_view(), &self.header)
    }
}

/// The non-resident $INDEX_ALLOCATION attribute: a run of INDX blocks, one
/// every 4096 bytes, for as long as the `INDX` magic keeps matching.
///
/// Block count is *not* read from any header field — it is discovered by
/// scanning forward from the start of the materialized attribute data for
/// consecutive `INDX` signatures, stopping at the first mismatch or at the
/// end of the buffer.
#[derive(Debug)]
pub struct IndexAllocation {
    blocks: Vec<IndexBlock>,
}

impl IndexAllocation {
    pub fn decode(data: &[u8]) -> Self {
        let mut blocks = Vec::new();
        let mut offset = 0;
        while offset + INDX_BLOCK_SIZE <= data.len() {
            let candidate = &data[offset..offset + INDX_BLOCK_SIZE];
            match IndexBlock::decode(candidate) {
                Ok(block) => blocks.push(block),
                Err(_) => break,
            }
            offset += INDX_BLOCK_SIZE;
        }
        Self { blocks }
    }

    #[must_use]
    pub fn blocks(&self) -> &[IndexBlock] {
        &self.blocks
    }
}
