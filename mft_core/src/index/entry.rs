//! Index entry flavors: the $I30 directory entry embedded in every directory
//! index, and the $SECURE `$SII`/`$SDH` entries kept around for completeness.

use crate::attribute::FileNameAttribute;
use crate::error::Result;
use crate::reference::MftReference;
use crate::view::View;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct EntryFlags: u16 {
        const HAS_CHILD_NODE = 0x0001;
        const LAST_ENTRY     = 0x0002;
    }
}

/// The tail shared by every index entry flavor: entry length, key length,
/// and flags. Directory entries carry an `mft_reference` ahead of this;
/// $SECURE entries carry a `data_offset`/`data_length` pair instead. Both
/// layouts put this tail at the same relative offset (+0x08) from the
/// entry's start, which is why `structure_size` in the source reads the
/// length word at a fixed offset regardless of flavor.
#[derive(Debug, Clone, Copy, Serialize)]
struct EntryTail {
    length: u16,
    key_length: u16,
    flags: EntryFlags,
}

fn decode_tail(view: View<'_>, offset: usize) -> Result<EntryTail> {
    Ok(EntryTail {
        length: view.read_u16(offset + 0x08)?,
        key_length: view.read_u16(offset + 0x0A)?,
        flags: EntryFlags::from_bits_truncate(view.read_u16(offset + 0x0C)?),
    })
}

fn align8(offset: usize) -> usize {
    (offset + 7) & !7
}

fn in_validity_window(ts: DateTime<Utc>) -> bool {
    let recent = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
    let future = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    ts > recent && ts < future
}

/// Common behavior every index entry flavor supports, so the generic
/// scan/slack-scan loops in [`crate::index`] can stay flavor-agnostic.
pub trait IndexEntryCodec: Sized {
    fn decode(view: View<'_>, offset: usize) -> Result<Self>;
    fn on_disk_length(&self) -> usize;
    fn is_valid_slack_candidate(&self) -> bool;
}

/// A $I30 directory index entry: an MFT reference plus the embedded
/// $FILE_NAME of the referenced file, and (for interior nodes) a child VCN.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    length: u16,
    pub mft_reference: MftReference,
    pub flags: EntryFlags,
    pub filename_information: FileNameAttribute,
    pub child_vcn: Option<u64>,
}

impl IndexEntryCodec for DirectoryEntry {
    fn decode(view: View<'_>, offset: usize) -> Result<Self> {
        let mft_reference = MftReference::from_raw(view.read_u64(offset)?);
        let tail = decode_tail(view, offset)?;
        let fn_view = view.slice(offset + 0x10, Some(tail.key_length as usize))?;
        let filename_information = FileNameAttribute::decode(fn_view)?;

        let child_vcn = if tail.flags.contains(EntryFlags::HAS_CHILD_NODE) {
            let vcn_offset = align8(offset + 0x10 + tail.key_length as usize);
            Some(view.read_u64(vcn_offset)?)
        } else {
            None
        };

        Ok(Self {
            length: tail.length,
            mft_reference,
            flags: tail.flags,
            filename_information,
            child_vcn,
        })
    }

    // The on-disk length field, not a recomputed size: real entries pad this
    // to an 8-byte boundary, which a from-scratch recomputation off the
    // decoded filename would under-count whenever the name length isn't
    // already aligned, misplacing every entry that follows in the index.
    fn on_disk_length(&self) -> usize {
        self.length as usize
    }

    fn is_valid_slack_candidate(&self) -> bool {
        let fn_info = &self.filename_information;
        in_validity_window(fn_info.created)
            && in_validity_window(fn_info.modified)
            && in_validity_window(fn_info.changed)
            && in_validity_window(fn_info.accessed)
    }
}

/// Header fields for a $SECURE `$SII`/`$SDH` index entry: an offset/length
/// pair pointing at the security descriptor stream payload, plus the same
/// length/key_length/flags tail as a directory entry.
#[derive(Debug, Clone, Copy, Serialize)]
struct SecureHeader {
    tail: EntryTail,
}

fn decode_secure_header(view: View<'_>, offset: usize) -> Result<SecureHeader> {
    Ok(SecureHeader {
        tail: decode_tail(view, offset)?,
    })
}

/// `1 < length < 0x30 && 1 < key_length < 0x20`, the bounds check used for
/// both $SII and $SDH entries.
fn secure_bounds_valid(tail: &EntryTail) -> bool {
    tail.length > 1 && tail.length < 0x30 && tail.key_length > 1 && tail.key_length < 0x20
}

/// A $SECURE:`$SII` index entry, keyed by security_id.
#[derive(Debug, Clone, Serialize)]
pub struct SiiEntry {
    length: u16,
    key_length: u16,
    pub security_id: u32,
}

impl IndexEntryCodec for SiiEntry {
    fn decode(view: View<'_>, offset: usize) -> Result<Self> {
        let header = decode_secure_header(view, offset)?;
        let security_id = view.read_u32(offset + 0x10)?;
        Ok(Self {
            length: header.tail.length,
            key_length: header.tail.key_length,
            security_id,
        })
    }

    fn on_disk_length(&self) -> usize {
        self.length as usize
    }

    fn is_valid_slack_candidate(&self) -> bool {
        secure_bounds_valid(&EntryTail {
            length: self.length,
            key_length: self.key_length,
            flags: EntryFlags::empty(),
        })
    }
}

/// A $SECURE:`$SDH` index entry, keyed by (hash, security_id).
#[derive(Debug, Clone, Serialize)]
pub struct SdhEntry {
    length: u16,
    key_length: u16,
    pub hash: u32,
    pub security_id: u32,
}

impl IndexEntryCodec for SdhEntry {
    fn decode(view: View<'_>, offset: usize) -> Result<Self> {
        let header = decode_secure_header(view, offset)?;
        let hash = view.read_u32(offset + 0x10)?;
        let security_id = view.read_u32(offset + 0x14)?;
        Ok(Self {
            length: header.tail.length,
            key_length: header.tail.key_length,
            hash,
            security_id,
        })
    }

    fn on_disk_length(&self) -> usize {
        self.length as usize
    }

    fn is_valid_slack_candidate(&self) -> bool {
        secure_bounds_valid(&EntryTail {
            length: self.length,
            key_length: self.key_length,
            flags: EntryFlags::empty(),
        })
    }
}
