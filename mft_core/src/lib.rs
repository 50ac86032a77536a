//! Read-only forensic parser for NTFS Master File Table (MFT) images.
//!
//! Given an already-materialized byte image of an MFT stream (record 0 at
//! byte offset 0, one 1024-byte slot per record), this crate decodes
//! individual records and their attributes, walks directory indexes
//! ($INDEX_ROOT / $INDEX_ALLOCATION, including slack recovery of deleted
//! entries), resolves the full path of any record, and builds a
//! parent/child tree over the whole image.
//!
//! This crate performs no I/O of its own — see the sibling `mft_io` crate
//! for adapters that turn a file on disk into the `&[u8]` this crate
//! consumes.

pub mod attribute;
pub mod cache;
pub mod enumerator;
pub mod error;
pub mod filetime;
pub mod fixup;
pub mod index;
pub mod path;
pub mod progress;
pub mod record;
pub mod reference;
pub mod tree;
pub mod view;

pub use cache::CacheConfig;
pub use enumerator::MftEnumerator;
pub use error::{MftError, Result};
pub use progress::{ProgressCallback, ProgressEvent};
pub use record::MftRecord;
pub use reference::MftReference;
pub use tree::{MftTree, MftTreeBuilder, MftTreeNode};
pub use view::View;

/// The root directory's MFT record number.
pub const ROOT_INDEX: u64 = 5;
/// The synthetic `$ORPHAN` node's record number, used by the tree builder
/// and path resolver to re-parent records whose real parent cannot be
/// trusted.
pub const ORPHAN_INDEX: u64 = 12;
/// The first reserved record number (12..=15 are skipped by enumeration).
pub const RESERVED_RANGE: std::ops::RangeInclusive<u64> = 12..=15;
