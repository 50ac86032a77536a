//! Memory-mapped MFT byte source.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{MftIoError, Result};

/// A read-only, memory-mapped view of an MFT image file.
///
/// # Safety
///
/// Uses `memmap2::Mmap`, which is sound only as long as the backing file is
/// not modified for the lifetime of the mapping. That invariant holds here:
/// this crate never opens the file for writing, and `mft_core` never writes
/// through the slice it's handed.
pub struct MmapMftSource {
    mmap: Mmap,
}

impl MmapMftSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let metadata = file.metadata()?;
        if metadata.len() == 0 {
            return Err(MftIoError::EmptyFile(path.as_ref().display().to_string()));
        }

        // SAFETY: read-only mapping of a file this process does not write to.
        let mmap = unsafe { Mmap::map(&file) }?;
        if mmap.is_empty() {
            return Err(MftIoError::EmptyFile(path.as_ref().display().to_string()));
        }

        #[cfg(target_os = "linux")]
        {
            let _ = mmap.advise(memmap2::Advice::Sequential);
            let _ = mmap.advise(memmap2::Advice::WillNeed);
            let _ = rustix::fs::fadvise(&file, 0, None, rustix::fs::Advice::Sequential);
        }

        Ok(Self { mmap })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}
