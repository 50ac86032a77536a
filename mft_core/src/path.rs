//! Path resolution: walking a record's $FILE_NAME parent-chain up to the
//! root directory, with cycle detection and orphan handling, backed by a
//! cache keyed on the on-disk state of each record visited.

use std::collections::HashSet;

use crate::enumerator::{MftEnumerator, RecordStateKey};
use crate::record::MftRecord;
use crate::ROOT_INDEX;

const CYCLE_MARKER: &str = "<CYCLE>";
const UNKNOWN_COMPONENT: &str = "??";
const ORPHAN_PREFIX: &str = "$ORPHAN";

impl<'a> MftEnumerator<'a> {
    /// Resolves `record`'s full path: components joined by `\`, no leading
    /// separator, or `\` for the root directory itself (record 5).
    pub fn get_path(&self, record: &MftRecord) -> String {
        let mut visiting = HashSet::new();
        let inner = self.resolve(record, &mut visiting);
        if inner.is_empty() {
            "\\".to_string()
        } else {
            inner
        }
    }

    /// The recursive core of [`Self::get_path`]. Returns the empty string
    /// for the root sentinel (mapped to `\` by the public wrapper), `??` if
    /// `record` has no $FILE_NAME, `<CYCLE>` if `record` is already being
    /// resolved higher up the current call stack, or `$ORPHAN\<name>` if the
    /// parent reference cannot be trusted.
    fn resolve(&self, record: &MftRecord, visiting: &mut HashSet<u64>) -> String {
        let key = RecordStateKey::from_record(record);
        if let Some(cached) = self.path_cache.borrow().get(&key) {
            let cached = cached.clone();
            self.path_cache.borrow_mut().touch(&key);
            return cached;
        }

        if record.mft_record_number == ROOT_INDEX {
            return String::new();
        }

        if visiting.contains(&record.mft_record_number) {
            return CYCLE_MARKER.to_string();
        }
        visiting.insert(record.mft_record_number);

        let Some(fna) = record.filename_information() else {
            return UNKNOWN_COMPONENT.to_string();
        };
        let parent_number = fna.parent_reference.record_number();
        let parent_sequence = fna.parent_reference.sequence_number();

        match self.get_record(parent_number) {
            Ok(parent) if parent.sequence_number == parent_sequence => {
                let parent_path = self.resolve(&parent, visiting);
                let resolved = if parent_path.is_empty() {
                    fna.filename.clone()
                } else {
                    format!("{parent_path}\\{}", fna.filename)
                };
                self.path_cache.borrow_mut().insert(key, resolved.clone());
                resolved
            }
            // Orphan results aren't cached: an $ORPHAN reparenting is a
            // property of a dangling reference, not a resolved path, so
            // there's nothing stable here worth remembering.
            _ => format!("{ORPHAN_PREFIX}\\{}", fna.filename),
        }
    }
}
