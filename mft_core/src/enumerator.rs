//! Record-number-indexed enumeration over an MFT byte image: decode-on-miss
//! with a bounded cache, sequential iteration that skips the NTFS-reserved
//! slots and swallows bad records, and a narrowly-scoped parallel decode
//! helper for callers who don't need the shared cache populated.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cache::{Cache, CacheConfig};
use crate::error::{MftError, Result};
use crate::progress::{report, ProgressCallback};
use crate::record::{MftRecord, MFT_RECORD_SIZE};
use crate::view::View;
use crate::RESERVED_RANGE;

/// Composite key pinning the path cache to a specific on-disk state of a
/// record, so a path computed before an image mutates (or is re-parsed with
/// perturbations applied for testing) is never handed back for a record that
/// has since changed underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RecordStateKey {
    magic: u32,
    lsn: u64,
    link_count: u16,
    record_number: u64,
    flags: u16,
}

impl RecordStateKey {
    pub(crate) fn from_record(record: &MftRecord) -> Self {
        Self {
            magic: record.magic,
            lsn: record.lsn,
            link_count: record.link_count,
            record_number: record.mft_record_number,
            flags: record.flags.bits(),
        }
    }
}

/// Decodes and caches records from an immutable MFT byte image.
///
/// Owns the record-decode cache and the path-resolution cache (see
/// [`crate::path`]); decoded [`MftRecord`]s are reference-counted so the
/// cache and every caller can share one decode without re-reading the
/// buffer.
pub struct MftEnumerator<'a> {
    pub(crate) view: View<'a>,
    pub(crate) record_cache: RefCell<Cache<u64, Rc<MftRecord>>>,
    pub(crate) path_cache: RefCell<Cache<RecordStateKey, String>>,
}

impl<'a> MftEnumerator<'a> {
    /// Builds an enumerator over `bytes` with the default cache sizes
    /// (§4.6: 102,400 records and paths).
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_config(bytes, CacheConfig::default())
    }

    #[must_use]
    pub fn with_config(bytes: &'a [u8], config: CacheConfig) -> Self {
        Self {
            view: View::new(bytes),
            record_cache: RefCell::new(Cache::new(config.record_cache_size)),
            path_cache: RefCell::new(Cache::new(config.path_cache_size)),
        }
    }

    /// The number of complete 1024-byte record slots in the backing buffer.
    #[must_use]
    pub fn len(&self) -> u64 {
        (self.view.len() / MFT_RECORD_SIZE) as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw, not-yet-decoded bytes of record slot `n`.
    pub fn get_record_buf(&self, n: u64) -> Result<&'a [u8]> {
        let offset = u128::from(n) * MFT_RECORD_SIZE as u128;
        let offset = usize::try_from(offset).map_err(|_| MftError::InvalidRecordNumber {
            record_number: n,
            record_count: self.len(),
        })?;
        self.view.read_bytes(offset, MFT_RECORD_SIZE)
    }

    /// Decodes (or returns the cached decode of) record slot `n`. A magic
    /// mismatch reports [`MftError::InvalidRecord`]; the caller decides
    /// whether that ends iteration (it doesn't, for [`Self::enumerate_records`])
    /// or fails the whole operation.
    pub fn get_record(&self, n: u64) -> Result<Rc<MftRecord>> {
        if let Some(record) = self.record_cache.borrow().get(&n) {
            return Ok(record.clone());
        }
        let buf = self.get_record_buf(n)?;
        let record = Rc::new(MftRecord::decode(buf, n)?);
        self.record_cache.borrow_mut().insert(n, record.clone());
        Ok(record)
    }

    /// Iterates record numbers `0, 1, 2, ...`, skipping the reserved range
    /// 12..=15, swallowing [`MftError::InvalidRecord`] (bad slots are simply
    /// absent from the sequence), and stopping once the backing buffer is
    /// exhausted. Accepts an optional advisory progress callback invoked
    /// after each slot is processed, successfully or not.
    pub fn enumerate_records<'p>(&self, progress: Option<&'p mut ProgressCallback<'p>>) -> EnumerateRecords<'_, 'a, 'p> {
        EnumerateRecords {
            enumerator: self,
            cursor: 0,
            total: self.len(),
            progress,
        }
    }

    /// `(record, path)` pairs for every record [`Self::enumerate_records`] yields.
    pub fn enumerate_paths(&self) -> impl Iterator<Item = (Rc<MftRecord>, String)> + '_ {
        self.enumerate_records(None).map(|record| {
            let path = self.get_path(&record);
            (record, path)
        })
    }

    /// Finds the record whose resolved path case-insensitively equals
    /// `path`, by linear scan over [`Self::enumerate_paths`].
    pub fn get_record_by_path(&self, path: &str) -> Result<Rc<MftRecord>> {
        self.enumerate_paths()
            .find(|(_, p)| p.eq_ignore_ascii_case(path))
            .map(|(record, _)| record)
            .ok_or_else(|| MftError::PathNotFound(path.to_string()))
    }

    /// Decodes every record in `start..end` independently and in parallel,
    /// without touching the shared record cache — safe because decoding a
    /// single record is a pure function of an immutable byte slice. Callers
    /// that need cache-populated parallel enumeration must shard into
    /// per-thread enumerators instead (see SPEC_FULL.md §5).
    #[cfg(feature = "parallel")]
    pub fn par_decode_range(&self, start: u64, end: u64) -> Vec<MftRecord> {
        use rayon::prelude::*;

        let view = self.view;
        (start..end)
            .into_par_iter()
            .filter_map(move |n| {
                let offset = u128::from(n) * MFT_RECORD_SIZE as u128;
                let offset = usize::try_from(offset).ok()?;
                let buf = view.read_bytes(offset, MFT_RECORD_SIZE).ok()?;
                MftRecord::decode(buf, n).ok()
            })
            .collect()
    }
}

/// Lazy, restartable-by-reconstruction iterator over the records of an
/// [`MftEnumerator`]. See [`MftEnumerator::enumerate_records`].
pub struct EnumerateRecords<'e, 'a, 'p> {
    enumerator: &'e MftEnumerator<'a>,
    cursor: u64,
    total: u64,
    progress: Option<&'p mut ProgressCallback<'p>>,
}

impl<'e, 'a, 'p> Iterator for EnumerateRecords<'e, 'a, 'p> {
    type Item = Rc<MftRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let n = self.cursor;
            self.cursor += 1;
            if RESERVED_RANGE.contains(&n) {
                continue;
            }
            let progress = self.progress.as_mut().map(|cb| &mut **cb);
            match self.enumerator.get_record(n) {
                Ok(record) => {
                    report(progress, n, Some(self.total));
                    return Some(record);
                }
                Err(MftError::InvalidRecord(_)) => {
                    report(progress, n, Some(self.total));
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}
