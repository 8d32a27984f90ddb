//! Error types for soundbank parsing and building

use std::path::PathBuf;
use thiserror::Error;

/// Result type for soundbank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Soundbank error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive carries no `BKHD` section
    #[error("archive has no BKHD header section")]
    MissingHeader,

    /// `BKHD` payload shorter than the fixed header layout
    #[error("BKHD payload too short: {actual} bytes, need at least 0x14")]
    HeaderTooShort {
        /// Bytes actually present in the payload
        actual: usize,
    },

    /// `DIDX` payload length is not a whole number of records
    #[error("DIDX payload length {0} is not a multiple of 12")]
    InvalidIndexLength(u32),

    /// `DIDX` record offsets decrease between consecutive records
    #[error("DIDX offsets out of order: {prev:#x} followed by {next:#x}")]
    UnorderedIndex {
        /// Offset of the earlier record
        prev: u32,
        /// Smaller offset that follows it
        next: u32,
    },

    /// Truncated data
    #[error("truncated section: expected {expected} bytes, got {actual}")]
    TruncatedData {
        /// Bytes the section layout requires
        expected: u64,
        /// Bytes actually available
        actual: u64,
    },

    /// Index entry does not fit inside the `DATA` payload
    #[error(
        "resource {id}: offset {offset:#x} + size {size:#x} exceeds the {available}-byte payload"
    )]
    OffsetOutOfRange {
        /// Sub-resource ID of the offending record
        id: u32,
        /// Recorded payload-relative offset
        offset: u32,
        /// Recorded size
        size: u32,
        /// Total payload bytes available
        available: u64,
    },

    /// Operation targets a sub-resource ID that is not in the archive
    #[error("resource not found: {0}")]
    ResourceNotFound(u32),

    /// Payload has not been split into sub-resources
    #[error("DATA payload has not been split into sub-resources")]
    PayloadNotSplit,

    /// Archives cannot be merged
    #[error("incompatible merge: {0}")]
    IncompatibleMerge(String),

    /// Section or chunk content exceeds u32 addressing
    #[error("payload too large for u32 addressing: {0} bytes")]
    PayloadTooLarge(u64),

    /// Archive name cannot be derived from the path
    #[error("cannot derive an archive name from path: {0}")]
    InvalidPath(PathBuf),

    /// `BinRW` parsing/writing error
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}
