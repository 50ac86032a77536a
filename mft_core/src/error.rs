//! Error types for MFT decoding.

use thiserror::Error;

/// Errors that can occur while decoding an MFT byte image.
#[derive(Debug, Error)]
pub enum MftError {
    /// A read would cross the end of the backing buffer.
    #[error("read of {width} bytes at offset {offset} overruns buffer of length {buffer_len}")]
    Overrun {
        offset: u64,
        width: usize,
        buffer_len: usize,
    },

    /// A structural decode failed at a specific offset (bad magic, impossible
    /// length, non-advancing offset). Slack scanners resume one byte later.
    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: u64, message: String },

    /// An MFT record slot's magic did not match `FILE`.
    #[error("invalid MFT record at record number {0}")]
    InvalidRecord(u64),

    /// The requested attribute type is absent from the record.
    #[error("attribute type {0:#06x} not found")]
    AttributeNotFound(u32),

    /// An optional STANDARD_INFORMATION field is absent (pre-Win2K record).
    #[error("field missing: {0}")]
    FieldMissing(&'static str),

    /// A requested record number is outside the allocated range.
    #[error("invalid record number {record_number}: buffer holds {record_count} records")]
    InvalidRecordNumber { record_number: u64, record_count: u64 },

    /// A FILETIME's tick count does not correspond to a representable calendar date.
    #[error("timestamp {0} is not representable as a calendar date-time")]
    InvalidTimestamp(u64),

    /// A requested path has no matching record.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// Operation not yet implemented.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, MftError>;
