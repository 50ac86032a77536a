//! Non-resident attribute run-list decoding.
//!
//! A run list is a sequence of variable-width entries, each encoding an
//! (offset, length) pair of cluster extents relative to the previous entry's
//! absolute offset. It terminates at a header byte of `0`.

use crate::view::View;

/// One decoded run: `(absolute_offset, length)` in clusters.
pub type Run = (i64, u64);

fn unsigned_from_le(bytes: &[u8]) -> u64 {
    let mut value = 0u64;
    for (i, &b) in bytes.iter().enumerate() {
        value |= (b as u64) << (8 * i);
    }
    value
}

fn signed_from_le(bytes: &[u8]) -> i64 {
    if bytes.is_empty() {
        return 0;
    }
    let negative = bytes[bytes.len() - 1] & 0x80 != 0;
    if !negative {
        return unsigned_from_le(bytes) as i64;
    }
    let mut flipped = Vec::with_capacity(bytes.len());
    for &b in bytes {
        flipped.push(b ^ 0xFF);
    }
    -(unsigned_from_le(&flipped) as i64) - 1
}

/// Decodes every run in the run list starting at `offset` in `view`.
///
/// Terminates at a header byte of `0`, at a run with a zero length-length or
/// zero offset-length (an invalid entry), or at the first read that would
/// overrun the buffer. None of these conditions are reported as errors: an
/// empty or short run list is a normal, well-formed result.
pub fn decode_runs(view: &View<'_>, offset: usize) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut cursor = offset;
    let mut absolute_offset: i64 = 0;

    loop {
        let Ok(header) = view.read_u8(cursor) else { break };
        if header == 0 {
            break;
        }
        let offset_len = (header >> 4) as usize;
        let length_len = (header & 0x0F) as usize;
        if offset_len == 0 || length_len == 0 {
            break;
        }

        let Ok(length_bytes) = view.read_bytes(cursor + 1, length_len) else { break };
        let Ok(offset_bytes) = view.read_bytes(cursor + 1 + length_len, offset_len) else { break };

        let length = unsigned_from_le(length_bytes);
        let relative_offset = signed_from_le(offset_bytes);
        absolute_offset += relative_offset;

        runs.push((absolute_offset, length));
        cursor += 1 + length_len + offset_len;
    }

    runs
}
