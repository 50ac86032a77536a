//! Update Sequence Array (fixup) application for multi-sector MFT and INDX
//! records.
//!
//! NTFS protects multi-sector structures against torn writes by stashing the
//! true last two bytes of every 512-byte sector in a side array (the USA),
//! and overwriting those in-sector bytes with a sentinel "fixup value" at
//! write time. Reading the structure means reversing that substitution.

use crate::view::View;
use tracing::warn;

const SECTOR_SIZE: usize = 512;

/// Applies the USA fixup described at `usa_offset`/`usa_count` to `view`,
/// returning a privately-owned, patched copy of the first
/// `(usa_count - 1) * 512` bytes of `view`.
///
/// The original buffer backing `view` is never mutated: this function only
/// ever writes into the freshly-allocated working buffer it returns. A
/// sector whose tail does not match the expected fixup value is left
/// untouched and the mismatch is logged, but this is not fatal — the rest of
/// the structure is still patched and returned.
pub fn apply_fixup(view: &View<'_>, usa_offset: usize, usa_count: u16) -> Vec<u8> {
    let protected_len = (usa_count as usize).saturating_sub(1) * SECTOR_SIZE;
    let protected_len = protected_len.min(view.len());
    let mut working = view.bytes()[..protected_len].to_vec();

    let Ok(fixup_value) = view.read_u16(usa_offset) else {
        return working;
    };

    for i in 0..usa_count.saturating_sub(1) as usize {
        let sector_tail = SECTOR_SIZE * (i + 1) - 2;
        if sector_tail + 2 > working.len() {
            break;
        }
        let check = u16::from_le_bytes([working[sector_tail], working[sector_tail + 1]]);
        if check != fixup_value {
            warn!(
                offset = view.origin() as usize + sector_tail,
                expected = fixup_value,
                found = check,
                "bad fixup signature, leaving sector tail untouched"
            );
            continue;
        }

        let Ok(replacement) = view.read_u16(usa_offset + 2 + 2 * i) else {
            continue;
        };
        let bytes = replacement.to_le_bytes();
        working[sector_tail] = bytes[0];
        working[sector_tail + 1] = bytes[1];
    }

    working
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_record(usa_offset: usize, usa_count: u16, fixup_value: u16, replacements: &[u16]) -> Vec<u8> {
        let mut buf = vec![0u8; 1024];
        buf[usa_offset..usa_offset + 2].copy_from_slice(&fixup_value.to_le_bytes());
        for (i, &r) in replacements.iter().enumerate() {
            let off = usa_offset + 2 + 2 * i;
            buf[off..off + 2].copy_from_slice(&r.to_le_bytes());
        }
        for i in 0..(usa_count as usize - 1) {
            let tail = SECTOR_SIZE * (i + 1) - 2;
            buf[tail..tail + 2].copy_from_slice(&fixup_value.to_le_bytes());
        }
        buf
    }

    #[test]
    fn patches_matching_sector_tails() {
        let buf = build_record(0x30, 3, 0xABCD, &[0x1111, 0x2222]);
        let view = View::new(&buf);
        let patched = apply_fixup(&view, 0x30, 3);

        assert_eq!(patched.len(), 2 * SECTOR_SIZE);
        assert_eq!(&patched[510..512], &0x1111u16.to_le_bytes());
        assert_eq!(&patched[1022..1024], &0x2222u16.to_le_bytes());
        // original buffer is untouched
        assert_eq!(&buf[510..512], &0xABCDu16.to_le_bytes());
    }

    #[test]
    fn mismatched_tail_is_left_alone() {
        let mut buf = build_record(0x30, 3, 0xABCD, &[0x1111, 0x2222]);
        // corrupt the first sector's tail so it no longer matches the fixup value
        buf[510..512].copy_from_slice(&0xFFFFu16.to_le_bytes());
        let view = View::new(&buf);
        let patched = apply_fixup(&view, 0x30, 3);

        assert_eq!(&patched[510..512], &0xFFFFu16.to_le_bytes());
        assert_eq!(&patched[1022..1024], &0x2222u16.to_le_bytes());
    }
}
