//! Whole-file MFT byte source, for sources where `mmap` is unavailable.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Reads an entire MFT image file into an owned buffer.
///
/// Used as the fallback when [`crate::MmapMftSource::open`] fails — for
/// example, a device file that refuses `mmap` or reports a zero-length
/// mapping.
pub struct DiskMftSource {
    bytes: Vec<u8>,
}

impl DiskMftSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Self { bytes })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_the_whole_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"some mft bytes").unwrap();
        file.flush().unwrap();

        let source = DiskMftSource::open(file.path()).unwrap();
        assert_eq!(source.as_bytes(), b"some mft bytes");
    }
}
