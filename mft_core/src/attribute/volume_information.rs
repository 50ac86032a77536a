//! $VOLUME_INFORMATION (attribute type 0x70) resident value. Present once,
//! on the $Volume system file (MFT record 3).

use crate::error::Result;
use crate::view::View;
use serde::Serialize;

bitflags::bitflags! {
    /// Volume flags, stored at offset 0x0A.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct VolumeFlags: u16 {
        const DIRTY                    = 0x0001;
        const RESIZE_LOG_FILE          = 0x0002;
        const UPGRADE_ON_MOUNT         = 0x0004;
        const MOUNTED_ON_NT4           = 0x0008;
        const DELETE_USN_UNDERWAY      = 0x0010;
        const REPAIR_OBJECT_ID        = 0x0020;
        const CHKDSK_UNDERWAY          = 0x4000;
        const MODIFIED_BY_CHKDSK       = 0x8000;
    }
}

/// Decoded $VOLUME_INFORMATION payload.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeInformation {
    pub major_version: u8,
    pub minor_version: u8,
    pub flags: VolumeFlags,
}

impl VolumeInformation {
    pub fn decode(view: View<'_>) -> Result<Self> {
        Ok(Self {
            major_version: view.read_u8(0x08)?,
            minor_version: view.read_u8(0x09)?,
            flags: VolumeFlags::from_bits_truncate(view.read_u16(0x0A)?),
        })
    }
}
