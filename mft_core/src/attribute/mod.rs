//! Attribute header decoding: the type tag, resident/non-resident body, and
//! (for non-resident attributes) the run list.

pub mod filename;
pub mod runlist;
pub mod standard_information;
pub mod volume_information;

pub use filename::FileNameAttribute;
pub use standard_information::StandardInformation;
pub use volume_information::VolumeInformation;

use crate::error::{MftError, Result};
use crate::view::View;
use runlist::{decode_runs, Run};
use serde::Serialize;

/// Canonical NTFS attribute type codes, preserved in full for display even
/// though only a subset is decoded into a typed payload by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeType {
    StandardInformation,
    AttributeList,
    FileName,
    ObjectId,
    SecurityDescriptor,
    VolumeName,
    VolumeInformation,
    Data,
    IndexRoot,
    IndexAllocation,
    Bitmap,
    ReparsePoint,
    EaInformation,
    Ea,
    LoggedUtilityStream,
    Other(u32),
}

impl AttributeType {
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0x10 => Self::StandardInformation,
            0x20 => Self::AttributeList,
            0x30 => Self::FileName,
            0x40 => Self::ObjectId,
            0x50 => Self::SecurityDescriptor,
            0x60 => Self::VolumeName,
            0x70 => Self::VolumeInformation,
            0x80 => Self::Data,
            0x90 => Self::IndexRoot,
            0xA0 => Self::IndexAllocation,
            0xB0 => Self::Bitmap,
            0xC0 => Self::ReparsePoint,
            0xD0 => Self::EaInformation,
            0xE0 => Self::Ea,
            0x100 => Self::LoggedUtilityStream,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn raw(&self) -> u32 {
        match self {
            Self::StandardInformation => 0x10,
            Self::AttributeList => 0x20,
            Self::FileName => 0x30,
            Self::ObjectId => 0x40,
            Self::SecurityDescriptor => 0x50,
            Self::VolumeName => 0x60,
            Self::VolumeInformation => 0x70,
            Self::Data => 0x80,
            Self::IndexRoot => 0x90,
            Self::IndexAllocation => 0xA0,
            Self::Bitmap => 0xB0,
            Self::ReparsePoint => 0xC0,
            Self::EaInformation => 0xD0,
            Self::Ea => 0xE0,
            Self::LoggedUtilityStream => 0x100,
            Self::Other(raw) => *raw,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StandardInformation => "$STANDARD_INFORMATION",
            Self::AttributeList => "$ATTRIBUTE_LIST",
            Self::FileName => "$FILE_NAME",
            Self::ObjectId => "$OBJECT_ID",
            Self::SecurityDescriptor => "$SECURITY_DESCRIPTOR",
            Self::VolumeName => "$VOLUME_NAME",
            Self::VolumeInformation => "$VOLUME_INFORMATION",
            Self::Data => "$DATA",
            Self::IndexRoot => "$INDEX_ROOT",
            Self::IndexAllocation => "$INDEX_ALLOCATION",
            Self::Bitmap => "$BITMAP",
            Self::ReparsePoint => "$REPARSE_POINT",
            Self::EaInformation => "$EA_INFORMATION",
            Self::Ea => "$EA",
            Self::LoggedUtilityStream => "$LOGGED_UTILITY_STREAM",
            Self::Other(_) => "$UNKNOWN",
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

bitflags::bitflags! {
    /// 16-bit attribute header flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct AttributeFlags: u16 {
        const READONLY        = 0x0001;
        const HIDDEN           = 0x0002;
        const SYSTEM           = 0x0004;
        const UNUSED_DOS       = 0x0008;
        const DIRECTORY_DOS    = 0x0010;
        const ARCHIVE          = 0x0020;
        const DEVICE           = 0x0040;
        const NORMAL           = 0x0080;
        const TEMPORARY        = 0x0100;
        const SPARSE           = 0x0200;
        const REPARSE_POINT    = 0x0400;
        const COMPRESSED       = 0x0800;
        const OFFLINE          = 0x1000;
        const NOT_INDEXED      = 0x2000;
        const ENCRYPTED        = 0x4000;
        const HAS_INDX         = 0x1000_0000;
        const HAS_VIEW_INDEX   = 0x2000_0000;
    }
}

/// The resident/non-resident specific portion of an attribute.
#[derive(Debug, Clone)]
pub enum AttributeBody<'a> {
    Resident {
        value_offset: u16,
        value_flags: u8,
        value: &'a [u8],
    },
    NonResident {
        lowest_vcn: u64,
        highest_vcn: u64,
        runlist_offset: u16,
        compression_unit: u8,
        allocated_size: u64,
        data_size: u64,
        initialized_size: u64,
        compressed_size: u64,
        runlist_view: View<'a>,
    },
}

/// A decoded attribute header plus its resident/non-resident body.
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    pub attr_type: AttributeType,
    pub total_size: u32,
    pub name: Option<String>,
    pub flags: AttributeFlags,
    pub instance: u16,
    pub body: AttributeBody<'a>,
}

impl<'a> Attribute<'a> {
    /// Decodes an attribute header (and its body) at `offset` in `view`.
    pub fn decode(view: View<'a>, offset: usize) -> Result<Self> {
        let raw_type = view.read_u32(offset)?;
        let raw_size = view.read_u32(offset + 4)?;
        let total_size = pad_to_8(raw_size);
        let non_resident = view.read_u8(offset + 8)?;
        let name_length = view.read_u8(offset + 9)?;
        let name_offset = view.read_u16(offset + 10)?;
        let flags = AttributeFlags::from_bits_truncate(view.read_u16(offset + 12)?);
        let instance = view.read_u16(offset + 14)?;

        let name = if name_length > 0 {
            Some(view.read_utf16(offset + name_offset as usize, name_length as usize)?)
        } else {
            None
        };

        let body = if non_resident > 0 {
            let lowest_vcn = view.read_u64(offset + 0x10)?;
            let highest_vcn = view.read_u64(offset + 0x18)?;
            let runlist_offset = view.read_u16(offset + 0x20)?;
            let compression_unit = view.read_u8(offset + 0x22)?;
            let allocated_size = view.read_u64(offset + 0x28)?;
            let data_size = view.read_u64(offset + 0x30)?;
            let initialized_size = view.read_u64(offset + 0x38)?;
            let compressed_size = view.read_u64(offset + 0x40)?;
            let runlist_view = view.slice(offset + runlist_offset as usize, None)?;
            AttributeBody::NonResident {
                lowest_vcn,
                highest_vcn,
                runlist_offset,
                compression_unit,
                allocated_size,
                data_size,
                initialized_size,
                compressed_size,
                runlist_view,
            }
        } else {
            let value_length = view.read_u32(offset + 0x10)?;
            let value_offset = view.read_u16(offset + 0x14)?;
            let value_flags = view.read_u8(offset + 0x16)?;
            let value = view.read_bytes(offset + value_offset as usize, value_length as usize)?;
            AttributeBody::Resident {
                value_offset,
                value_flags,
                value,
            }
        };

        Ok(Self {
            attr_type: AttributeType::from_raw(raw_type),
            total_size,
            name,
            flags,
            instance,
            body,
        })
    }

    #[must_use]
    pub fn is_resident(&self) -> bool {
        matches!(self.body, AttributeBody::Resident { .. })
    }

    /// Returns the inline value bytes for a resident attribute.
    pub fn resident_value(&self) -> Result<&'a [u8]> {
        match self.body {
            AttributeBody::Resident { value, .. } => Ok(value),
            AttributeBody::NonResident { .. } => Err(MftError::Unsupported(
                "resident_value() called on a non-resident attribute",
            )),
        }
    }

    /// Decodes the run list of a non-resident attribute into `(offset,
    /// length)` cluster run pairs.
    pub fn runs(&self) -> Result<Vec<Run>> {
        match &self.body {
            AttributeBody::NonResident { runlist_view, .. } => Ok(decode_runs(runlist_view, 0)),
            AttributeBody::Resident { .. } => Err(MftError::Unsupported(
                "runs() called on a resident attribute",
            )),
        }
    }

    #[must_use]
    pub fn data_size(&self) -> Option<u64> {
        match self.body {
            AttributeBody::NonResident { data_size, .. } => Some(data_size),
            AttributeBody::Resident { value, .. } => Some(value.len() as u64),
        }
    }
}

fn pad_to_8(size: u32) -> u32 {
    let remainder = size % 8;
    if remainder == 0 {
        size
    } else {
        size + (8 - remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_resident_attribute(attr_type: u32, value: &[u8]) -> Vec<u8> {
        let header_len = 0x18;
        let total = header_len + value.len();
        let padded = pad_to_8(total as u32) as usize;
        let mut buf = vec![0u8; padded];
        buf[0..4].copy_from_slice(&attr_type.to_le_bytes());
        buf[4..8].copy_from_slice(&(total as u32).to_le_bytes());
        buf[8] = 0; // resident
        buf[9] = 0; // name_length
        buf[0x14..0x16].copy_from_slice(&(header_len as u16).to_le_bytes()); // value_offset
        buf[0x10..0x14].copy_from_slice(&(value.len() as u32).to_le_bytes()); // value_length
        buf[header_len..header_len + value.len()].copy_from_slice(value);
        buf
    }

    #[test]
    fn decodes_resident_attribute_header_and_value() {
        let buf = build_resident_attribute(0x30, b"hello-value");
        let view = View::new(&buf);
        let attr = Attribute::decode(view, 0).unwrap();
        assert_eq!(attr.attr_type, AttributeType::FileName);
        assert!(attr.is_resident());
        assert_eq!(attr.resident_value().unwrap(), b"hello-value");
    }

    #[test]
    fn total_size_is_padded_to_8() {
        let buf = build_resident_attribute(0x10, b"x");
        let view = View::new(&buf);
        let attr = Attribute::decode(view, 0).unwrap();
        assert_eq!(attr.total_size % 8, 0);
    }

    #[test]
    fn pad_to_8_handles_already_aligned_sizes() {
        assert_eq!(pad_to_8(16), 16);
        assert_eq!(pad_to_8(17), 24);
        assert_eq!(pad_to_8(0), 0);
    }
}
