//! Error types for PCK container construction

use thiserror::Error;

use super::constants::{MAX_ENTRIES, NAME_SIZE};

/// Result type for PCK build operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Fatal failures while building a PCK container.
///
/// Parsing never produces these: a file that does not parse as a PCK
/// container is reported as "not recognized" (`None`), because probing
/// foreign files is the normal path for a format-detection layer. Building,
/// by contrast, has no foreign-input excuse, so every failure here aborts
/// the whole build and the caller must discard any partial output.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Entry count exceeds the container's sanity bound.
    #[error("too many entries: {0} (limit {MAX_ENTRIES})")]
    TooManyEntries(usize),

    /// Entry name is empty, wider than the 0x38-byte name field, or
    /// contains a NUL byte.
    #[error("invalid entry name {0:?}: must be 1..={NAME_SIZE} bytes with no NUL")]
    InvalidName(String),

    /// Entry payload does not fit the 32-bit size field.
    #[error("entry {name:?} is too large: {size} bytes")]
    EntryTooLarge {
        /// Name of the offending entry.
        name: String,
        /// Payload size in bytes.
        size: u64,
    },

    /// Cumulative layout exceeds the 32-bit offset space.
    #[error("container exceeds the 32-bit offset space")]
    ArchiveTooLarge,

    /// Reading an entry's source file or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
