//! Circus `PCK` resource containers
//!
//! A PCK container is a flat directory of named payloads:
//!
//! ```text
//! offset 0:              entry count (u32 LE)
//! offset 4:              count * 8-byte header pairs (offset u32, size u32)
//! offset 4 + count*8:    count * 0x40-byte table records
//!                        [0x38-byte NUL-padded name][offset u32][size u32]
//! first 2048 boundary:   payloads, each padded to the next 2048 boundary
//! after last padding:    4-byte zero sentinel
//! ```
//!
//! Each entry's offset and size are stored twice (header pair and table
//! record); [`PckIndex::parse`] treats any disagreement as proof the file is
//! not a PCK container. The format carries no magic bytes, so the parser
//! leans on these consistency checks to reject foreign files.
//!
//! [`PckBuilder`] is the exact inverse: containers it produces round-trip
//! through [`PckIndex::parse`] with names, offsets, sizes and payload bytes
//! intact.

mod builder;
mod error;
mod index;

pub use builder::PckBuilder;
pub use error::{ArchiveError, ArchiveResult};
pub use index::{Entry, PckIndex};

/// PCK container layout constants.
pub mod constants {
    /// Size of the count field at the start of the container.
    pub const HEADER_SIZE: usize = 4;

    /// Width of the name field inside a table record.
    pub const NAME_SIZE: usize = 0x38;

    /// Size of one table record (name + offset + size).
    pub const TABLE_RECORD_SIZE: usize = 0x40;

    /// Index bytes consumed per entry (8-byte header pair + table record).
    pub const RECORD_SIZE: usize = 0x48;

    /// Payload alignment; every payload is padded to the next boundary.
    pub const SECTOR_SIZE: u32 = 0x800;

    /// Sanity bound on the entry count.
    ///
    /// Purely a corrupt/foreign-input rejection threshold, not a domain
    /// limit. The parser rejects silently; the builder fails loudly.
    pub const MAX_ENTRIES: u32 = 0x40000;
}

/// First 2048-byte boundary strictly after `pos`.
///
/// The on-disk contract always advances even when `pos` is already aligned,
/// so a payload of exactly one sector still gets a full sector of padding.
pub(crate) fn next_sector(pos: u32) -> u64 {
    let sector = u64::from(constants::SECTOR_SIZE);
    (u64::from(pos) / sector + 1) * sector
}
