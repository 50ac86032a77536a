//! $FILE_NAME (attribute type 0x30) resident value.

use crate::error::Result;
use crate::reference::MftReference;
use crate::view::View;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which namespace a $FILE_NAME entry was recorded under. A file can have
/// more than one $FILE_NAME attribute, one per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileNameType {
    Posix,
    Win32,
    Dos,
    Win32AndDos,
}

impl FileNameType {
    #[must_use]
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Win32,
            2 => Self::Dos,
            3 => Self::Win32AndDos,
            _ => Self::Posix,
        }
    }
}

/// Decoded $FILE_NAME payload.
#[derive(Debug, Clone, Serialize)]
pub struct FileNameAttribute {
    pub parent_reference: MftReference,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub changed: DateTime<Utc>,
    pub accessed: DateTime<Utc>,
    pub physical_size: u64,
    pub logical_size: u64,
    pub flags: u32,
    pub reparse_value: u32,
    pub filename_type: FileNameType,
    pub filename: String,
}

impl FileNameAttribute {
    /// On-disk size of a $FILE_NAME value of `filename_length` UTF-16 code units.
    #[must_use]
    pub fn on_disk_size(filename_length: u8) -> usize {
        0x42 + 2 * filename_length as usize
    }

    pub fn decode(view: View<'_>) -> Result<Self> {
        let parent_reference = MftReference::from_raw(view.read_u64(0x00)?);
        let created = view.read_filetime(0x08)?;
        let modified = view.read_filetime(0x10)?;
        let changed = view.read_filetime(0x18)?;
        let accessed = view.read_filetime(0x20)?;
        let physical_size = view.read_u64(0x28)?;
        let logical_size = view.read_u64(0x30)?;
        let flags = view.read_u32(0x38)?;
        let reparse_value = view.read_u32(0x3C)?;
        let filename_length = view.read_u8(0x40)?;
        let filename_type = FileNameType::from_raw(view.read_u8(0x41)?);
        let filename = view.read_utf16(0x42, filename_length as usize)?;

        Ok(Self {
            parent_reference,
            created,
            modified,
            changed,
            accessed,
            physical_size,
            logical_size,
            flags,
            reparse_value,
            filename_type,
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filetime::datetime_to_filetime;
    use chrono::TimeZone;

    fn build(parent_ref: u64, name: &str, filename_type: u8) -> Vec<u8> {
        let name_units: Vec<u16> = name.encode_utf16().collect();
        let mut buf = vec![0u8; FileNameAttribute::on_disk_size(name_units.len() as u8)];
        buf[0x00..0x08].copy_from_slice(&parent_ref.to_le_bytes());
        let ts = datetime_to_filetime(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        for off in [0x08, 0x10, 0x18, 0x20] {
            buf[off..off + 8].copy_from_slice(&ts.to_le_bytes());
        }
        buf[0x40] = name_units.len() as u8;
        buf[0x41] = filename_type;
        for (i, unit) in name_units.iter().enumerate() {
            buf[0x42 + 2 * i..0x44 + 2 * i].copy_from_slice(&unit.to_le_bytes());
        }
        buf
    }

    #[test]
    fn decodes_filename_and_parent_reference() {
        let parent_ref = (9u64 << 48) | 7u64;
        let buf = build(parent_ref, "hello.txt", 1);
        let fna = FileNameAttribute::decode(View::new(&buf)).unwrap();
        assert_eq!(fna.filename, "hello.txt");
        assert_eq!(fna.parent_reference.record_number(), 7);
        assert_eq!(fna.parent_reference.sequence_number(), 9);
        assert_eq!(fna.filename_type, FileNameType::Win32);
    }

    #[test]
    fn on_disk_size_matches_formula() {
        assert_eq!(FileNameAttribute::on_disk_size(0), 0x42);
        assert_eq!(FileNameAttribute::on_disk_size(5), 0x42 + 10);
    }
}
