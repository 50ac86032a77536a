//! Byte-source adapters for feeding an MFT image into `mft_core`.
//!
//! `mft_core` operates purely on `&[u8]`; this crate is the thin I/O layer
//! that gets those bytes off disk, preferring a memory-mapped view and
//! falling back to a plain whole-file read when mapping isn't available.

mod disk;
mod error;
mod mmap;

pub use disk::DiskMftSource;
pub use error::{MftIoError, Result};
pub use mmap::MmapMftSource;

use std::path::Path;

/// A byte source backed either by an mmap or by an owned in-memory buffer.
///
/// [`MftSource::open`] tries [`MmapMftSource`] first and falls back to
/// [`DiskMftSource`] if mapping the file fails, mirroring how volume
/// shadow copies and some forensic image formats refuse `mmap` while
/// still supporting a plain sequential read.
pub enum MftSource {
    Mmap(MmapMftSource),
    Disk(DiskMftSource),
}

impl MftSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        match MmapMftSource::open(path.as_ref()) {
            Ok(source) => Ok(Self::Mmap(source)),
            Err(_) => DiskMftSource::open(path).map(Self::Disk),
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Mmap(source) => source.as_bytes(),
            Self::Disk(source) => source.as_bytes(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Mmap(source) => source.len(),
            Self::Disk(source) => source.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Mmap(source) => source.is_empty(),
            Self::Disk(source) => source.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn opens_a_nonempty_file_via_mmap() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 4096]).unwrap();
        file.flush().unwrap();

        let source = MftSource::open(file.path()).unwrap();
        assert_eq!(source.len(), 4096);
        assert!(matches!(source, MftSource::Mmap(_)));
    }

    #[test]
    fn falls_back_to_disk_for_an_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let source = MftSource::open(file.path()).unwrap();
        assert!(source.is_empty());
        assert!(matches!(source, MftSource::Disk(_)));
    }
}
