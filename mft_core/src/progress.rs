//! Advisory progress reporting for long-running enumeration and tree-build
//! operations. Mirrors the teacher's carving progress callback: observation
//! only, never able to influence or halt the operation it reports on.

/// One step of progress: the record number just processed and, where known,
/// the total record count in the image.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent {
    pub current_record: u64,
    pub total_records: Option<u64>,
}

/// A callback invoked after each record an enumeration or tree build
/// processes. Boxed so callers can close over arbitrary state (a progress
/// bar, a counter, a channel sender) without the enumerator needing to know
/// about any of it.
pub type ProgressCallback<'a> = dyn FnMut(ProgressEvent) + 'a;

pub(crate) fn report(callback: Option<&mut ProgressCallback<'_>>, current_record: u64, total_records: Option<u64>) {
    if let Some(cb) = callback {
        cb(ProgressEvent { current_record, total_records });
    }
}
