//! MFT record decoding: the 1024-byte `FILE` record header, its attribute
//! stream, and the handful of attribute lookups every consumer needs
//! ($STANDARD_INFORMATION, $FILE_NAME, the unnamed $DATA stream).

use crate::attribute::filename::FileNameType;
use crate::attribute::{Attribute, AttributeType, FileNameAttribute, StandardInformation};
use crate::error::{MftError, Result};
use crate::fixup::apply_fixup;
use crate::reference::MftReference;
use crate::view::View;
use serde::Serialize;

pub const MFT_RECORD_SIZE: usize = 1024;
pub const RECORD_MAGIC: u32 = 0x454C_4946; // "FILE"

bitflags::bitflags! {
    /// Record-level in-use/directory flags at offset 0x16.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct RecordFlags: u16 {
        const IN_USE      = 0x0001;
        const IS_DIRECTORY = 0x0002;
    }
}

/// A decoded, fixup-applied MFT record.
///
/// Owns its own fixed-up 1024-byte buffer (see [`crate::fixup`]): the
/// caller's raw slice is never mutated, and every attribute borrowed from
/// this record borrows from that owned copy instead.
#[derive(Debug)]
pub struct MftRecord {
    buf: Vec<u8>,
    pub magic: u32,
    pub lsn: u64,
    pub sequence_number: u16,
    pub link_count: u16,
    pub flags: RecordFlags,
    pub bytes_in_use: u32,
    pub bytes_allocated: u32,
    pub base_mft_record: MftReference,
    pub mft_record_number: u64,
    attrs_offset: u16,
}

impl MftRecord {
    /// Decodes a record from a raw, not-yet-fixed-up 1024-byte slice.
    /// `record_number` is the slot this record was read from; it is used
    /// only to annotate [`MftError::InvalidRecord`] and is not re-derived
    /// from the on-disk `mft_record_number` field (the two can legitimately
    /// disagree for a stale or corrupted slot).
    pub fn decode(raw: &[u8], record_number: u64) -> Result<Self> {
        let raw_view = View::new(raw);
        let magic = raw_view.read_u32(0x00)?;
        if magic != RECORD_MAGIC {
            return Err(MftError::InvalidRecord(record_number));
        }

        let usa_offset = raw_view.read_u16(0x04)?;
        let usa_count = raw_view.read_u16(0x06)?;
        let buf = apply_fixup(&raw_view, usa_offset as usize, usa_count);
        let view = View::new(&buf);

        Ok(Self {
            lsn: view.read_u64(0x08)?,
            sequence_number: view.read_u16(0x10)?,
            link_count: view.read_u16(0x12)?,
            attrs_offset: view.read_u16(0x14)?,
            flags: RecordFlags::from_bits_truncate(view.read_u16(0x16)?),
            bytes_in_use: view.read_u32(0x18)?,
            bytes_allocated: view.read_u32(0x1C)?,
            base_mft_record: MftReference::from_raw(view.read_u64(0x20)?),
            mft_record_number: view.read_u32(0x2C)? as u64,
            magic,
            buf,
        })
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.flags.contains(RecordFlags::IS_DIRECTORY)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.flags.contains(RecordFlags::IN_USE)
    }

    fn view(&self) -> View<'_> {
        View::new(&self.buf)
    }

    /// Decodes every attribute in the record, stopping at a terminator type
    /// (`0` or `0xFFFFFFFF`), at an attribute whose claimed size would cross
    /// `bytes_in_use`, or at the first decode failure.
    pub fn attributes(&self) -> Vec<Attribute<'_>> {
        let view = self.view();
        let right_border = self.bytes_in_use as usize;
        let mut offset = self.attrs_offset as usize;
        let mut out = Vec::new();

        loop {
            let Ok(raw_type) = view.read_u32(offset) else { break };
            if raw_type == 0 || raw_type == 0xFFFF_FFFF {
                break;
            }
            let Ok(raw_size) = view.read_u32(offset + 4) else { break };
            if offset + raw_size as usize > right_border {
                break;
            }
            let Ok(attr) = Attribute::decode(view, offset) else { break };
            offset += attr.total_size as usize;
            out.push(attr);
        }
        out
    }

    pub fn attribute(&self, attr_type: AttributeType) -> Result<Attribute<'_>> {
        self.attributes()
            .into_iter()
            .find(|a| a.attr_type == attr_type)
            .ok_or(MftError::AttributeNotFound(attr_type.raw()))
    }

    /// Every $FILE_NAME attribute on the record: one per namespace a file
    /// was recorded under (POSIX, Win32, DOS, or both).
    pub fn filename_informations(&self) -> Vec<FileNameAttribute> {
        self.attributes()
            .into_iter()
            .filter(|a| a.attr_type == AttributeType::FileName)
            .filter_map(|a| a.resident_value().ok())
            .filter_map(|value| FileNameAttribute::decode(View::new(value)).ok())
            .collect()
    }

    /// The "most complete" $FILE_NAME: prefers Win32 or Win32-and-DOS over a
    /// bare 8.3 or POSIX name, falling back to whatever name is present.
    pub fn filename_information(&self) -> Option<FileNameAttribute> {
        let mut fallback = None;
        for fna in self.filename_informations() {
            match fna.filename_type {
                FileNameType::Win32 | FileNameType::Win32AndDos => return Some(fna),
                _ => fallback = Some(fna),
            }
        }
        fallback
    }

    pub fn standard_information(&self) -> Option<StandardInformation<'_>> {
        let attr = self.attribute(AttributeType::StandardInformation).ok()?;
        let value = attr.resident_value().ok()?;
        StandardInformation::decode(View::new(value)).ok()
    }

    /// The unnamed $DATA attribute (a file's primary content stream), if any.
    pub fn data_attribute(&self) -> Option<Attribute<'_>> {
        self.attributes()
            .into_iter()
            .find(|a| a.attr_type == AttributeType::Data && a.name.is_none())
    }

    /// The bytes this record actually occupies, `buf[..bytes_in_use]`.
    #[must_use]
    pub fn active_data(&self) -> &[u8] {
        &self.buf[..(self.bytes_in_use as usize).min(self.buf.len())]
    }

    /// The unused tail of the record, `buf[bytes_in_use..]`, where a
    /// previous incarnation's attributes or index entries may still survive.
    #[must_use]
    pub fn slack_data(&self) -> &[u8] {
        let start = (self.bytes_in_use as usize).min(self.buf.len());
        &self.buf[start..]
    }
}
