//! End-to-end scenarios over a synthetic MFT image: enumeration, path
//! resolution, and tree building driven through the public API only.

use mft_core::{MftEnumerator, MftTreeBuilder, ORPHAN_INDEX, ROOT_INDEX};

use mft_core::filetime::datetime_to_filetime;
use chrono::{TimeZone, Utc};

const MFT_RECORD_SIZE: usize = 1024;
const RECORD_MAGIC: u32 = 0x454C_4946;

fn build_filename_attr(parent_ref: u64, name: &str) -> Vec<u8> {
    let name_units: Vec<u16> = name.encode_utf16().collect();
    let value_len = 0x42 + 2 * name_units.len();
    let header_len = 0x18;
    let total = header_len + value_len;
    let padded = total + (8 - total % 8) % 8;

    let mut buf = vec![0u8; padded];
    buf[0..4].copy_from_slice(&0x30u32.to_le_bytes());
    buf[4..8].copy_from_slice(&(total as u32).to_le_bytes());
    buf[0x14..0x16].copy_from_slice(&(header_len as u16).to_le_bytes());
    buf[0x10..0x14].copy_from_slice(&(value_len as u32).to_le_bytes());

    let value_off = header_len;
    buf[value_off..value_off + 8].copy_from_slice(&parent_ref.to_le_bytes());
    let ts = datetime_to_filetime(Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap());
    for off in [0x08, 0x10, 0x18, 0x20] {
        buf[value_off + off..value_off + off + 8].copy_from_slice(&ts.to_le_bytes());
    }
    buf[value_off + 0x40] = name_units.len() as u8;
    buf[value_off + 0x41] = 1; // Win32
    for (i, unit) in name_units.iter().enumerate() {
        let o = value_off + 0x42 + 2 * i;
        buf[o..o + 2].copy_from_slice(&unit.to_le_bytes());
    }
    buf
}

fn build_record(record_number: u32, sequence_number: u16, flags: u16, parent_ref: u64, name: &str) -> Vec<u8> {
    let mut buf = vec![0u8; MFT_RECORD_SIZE];
    buf[0x00..0x04].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
    buf[0x04..0x06].copy_from_slice(&0x30u16.to_le_bytes());
    buf[0x06..0x08].copy_from_slice(&0x03u16.to_le_bytes());
    buf[0x10..0x12].copy_from_slice(&sequence_number.to_le_bytes());
    buf[0x14..0x16].copy_from_slice(&0x38u16.to_le_bytes());
    buf[0x16..0x18].copy_from_slice(&flags.to_le_bytes());
    buf[0x2C..0x30].copy_from_slice(&record_number.to_le_bytes());

    let attr = build_filename_attr(parent_ref, name);
    buf[0x38..0x38 + attr.len()].copy_from_slice(&attr);
    let terminator_offset = 0x38 + attr.len();
    buf[terminator_offset..terminator_offset + 4].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    let bytes_in_use = (terminator_offset + 8) as u32;
    buf[0x18..0x1C].copy_from_slice(&bytes_in_use.to_le_bytes());
    buf[0x1C..0x20].copy_from_slice(&(MFT_RECORD_SIZE as u32).to_le_bytes());
    buf
}

fn image_of(max_record: u32) -> Vec<u8> {
    vec![0u8; (max_record as usize + 1) * MFT_RECORD_SIZE]
}

fn place(image: &mut [u8], record_number: u32, bytes: &[u8]) {
    let off = record_number as usize * MFT_RECORD_SIZE;
    image[off..off + MFT_RECORD_SIZE].copy_from_slice(bytes);
}

#[test]
fn s1_root_resolves_to_backslash() {
    let image = image_of(5);
    let enumerator = MftEnumerator::new(&image);
    let root = enumerator.get_record(ROOT_INDEX).unwrap();
    assert_eq!(enumerator.get_path(&root), "\\");
}

#[test]
fn s2_enumeration_skips_reserved_range_and_yields_the_rest() {
    let mut image = image_of(19);
    for n in 0..20u32 {
        if (12..=15).contains(&n) {
            continue;
        }
        place(&mut image, n, &build_record(n, 0, 0x0003, ROOT_INDEX as u64, &format!("f{n}")));
    }
    place(&mut image, ROOT_INDEX as u32, &build_record(ROOT_INDEX as u32, 0, 0x0003, ROOT_INDEX as u64, "."));

    let enumerator = MftEnumerator::new(&image);
    let seen: Vec<u64> = enumerator
        .enumerate_records(None)
        .map(|r| r.mft_record_number)
        .collect();

    for n in 0..20u64 {
        if (12..=15).contains(&n) {
            assert!(!seen.contains(&n), "reserved record {n} should be skipped");
        } else {
            assert!(seen.contains(&n), "record {n} should be enumerated");
        }
    }
}

#[test]
fn s3_stale_parent_sequence_resolves_under_orphan() {
    let mut image = image_of(20);
    // record 7's live sequence is 2; the child references sequence 9.
    place(&mut image, 7, &build_record(7, 2, 0x0003, ROOT_INDEX as u64, "somedir"));
    let stale_parent_ref = (9u64 << 48) | 7;
    place(&mut image, 20, &build_record(20, 0, 0x0001, stale_parent_ref, "orphaned.txt"));

    let enumerator = MftEnumerator::new(&image);
    let record = enumerator.get_record(20).unwrap();
    assert_eq!(enumerator.get_path(&record), "$ORPHAN\\orphaned.txt");
}

#[test]
fn s4_mutual_parent_cycle_terminates_with_cycle_marker() {
    let mut image = image_of(101);
    let ref_to_101 = 101u64;
    let ref_to_100 = 100u64;
    place(&mut image, 100, &build_record(100, 0, 0x0003, ref_to_101, "a"));
    place(&mut image, 101, &build_record(101, 0, 0x0003, ref_to_100, "b"));

    let enumerator = MftEnumerator::new(&image);
    let a = enumerator.get_record(100).unwrap();
    let b = enumerator.get_record(101).unwrap();
    assert!(enumerator.get_path(&a).contains("<CYCLE>"));
    assert!(enumerator.get_path(&b).contains("<CYCLE>"));
}

#[test]
fn full_pipeline_enumerate_resolve_and_build_tree_agree() {
    let mut image = image_of(30);
    place(&mut image, ROOT_INDEX as u32, &build_record(ROOT_INDEX as u32, 0, 0x0003, ROOT_INDEX as u64, "."));
    place(&mut image, 10, &build_record(10, 0, 0x0003, ROOT_INDEX as u64, "subdir"));
    place(&mut image, 30, &build_record(30, 0, 0x0001, 10, "deep.txt"));

    let enumerator = MftEnumerator::new(&image);
    let deep = enumerator.get_record(30).unwrap();
    assert_eq!(enumerator.get_path(&deep), "subdir\\deep.txt");

    let found = enumerator.get_record_by_path("SUBDIR\\DEEP.TXT").unwrap();
    assert_eq!(found.mft_record_number, 30);

    let builder = MftTreeBuilder::new(&image);
    let tree = builder.build(None);
    let node = tree.get(30).unwrap();
    assert_eq!(node.parent_record_number, 10);
    assert!(tree.get(10).unwrap().children.contains(&30));
    assert!(tree.get(ORPHAN_INDEX).is_some());
}

#[test]
fn tree_serializes_to_json_for_external_consumers() {
    let mut image = image_of(10);
    place(&mut image, ROOT_INDEX as u32, &build_record(ROOT_INDEX as u32, 0, 0x0003, ROOT_INDEX as u64, "."));
    place(&mut image, 10, &build_record(10, 0, 0x0001, ROOT_INDEX as u64, "report.docx"));

    let tree = MftTreeBuilder::new(&image).build(None);
    let tree_json = serde_json::to_value(&tree).unwrap();
    assert!(tree_json.is_object());

    let node_json = serde_json::to_string(tree.get(10).unwrap()).unwrap();
    assert!(node_json.contains("\"filename\":\"report.docx\""));
}
