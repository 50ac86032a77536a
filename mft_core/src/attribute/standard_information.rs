//! $STANDARD_INFORMATION (attribute type 0x10) resident value.

use crate::error::{MftError, Result};
use crate::view::View;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Decoded $STANDARD_INFORMATION payload.
///
/// `owner_id`, `security_id`, `quota_charged`, and `usn` are NTFS 3.x
/// (Win2K+) fields; records produced by older NTFS versions are simply too
/// short to hold them. Accessing one of those fields on such a record
/// returns [`MftError::FieldMissing`] rather than a zero value, so callers
/// can distinguish "not tracked" from "tracked and zero".
#[derive(Debug, Clone, Serialize)]
pub struct StandardInformation<'a> {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub changed: DateTime<Utc>,
    pub accessed: DateTime<Utc>,
    pub file_attributes: u32,
    #[serde(skip)]
    view: View<'a>,
}

impl<'a> StandardInformation<'a> {
    pub fn decode(view: View<'a>) -> Result<Self> {
        Ok(Self {
            created: view.read_filetime(0x00)?,
            modified: view.read_filetime(0x08)?,
            changed: view.read_filetime(0x10)?,
            accessed: view.read_filetime(0x18)?,
            file_attributes: view.read_u32(0x20)?,
            view,
        })
    }

    pub fn owner_id(&self) -> Result<u32> {
        self.view.read_u32(0x30).map_err(|_| MftError::FieldMissing("owner_id"))
    }

    pub fn security_id(&self) -> Result<u32> {
        self.view.read_u32(0x34).map_err(|_| MftError::FieldMissing("security_id"))
    }

    pub fn quota_charged(&self) -> Result<u64> {
        self.view.read_u64(0x38).map_err(|_| MftError::FieldMissing("quota_charged"))
    }

    pub fn usn(&self) -> Result<u64> {
        self.view.read_u64(0x40).map_err(|_| MftError::FieldMissing("usn"))
    }
}
