//! PCK index parsing

use tracing::{debug, trace};

use crate::cursor::ByteCursor;

use super::constants::{HEADER_SIZE, MAX_ENTRIES, NAME_SIZE, RECORD_SIZE};

/// A named payload inside a PCK container.
///
/// Immutable after parse; the byte range it describes is the authoritative
/// placement used by all consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry name, decoded from the NUL-padded 0x38-byte field.
    pub name: String,
    /// Payload offset from the start of the container.
    pub offset: u32,
    /// Payload size in bytes.
    pub size: u32,
}

impl Entry {
    /// Whether the entry's byte range lies inside a container of `len` bytes.
    pub fn check_placement(&self, len: usize) -> bool {
        u64::from(self.offset) + u64::from(self.size) <= len as u64
    }
}

/// Parsed directory of a PCK container.
///
/// Entries keep file order, which matches the physical payload layout;
/// downstream tooling relies on that for bound finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PckIndex {
    entries: Vec<Entry>,
}

impl PckIndex {
    /// Try to parse `data` as a PCK container index.
    ///
    /// Returns `None` when the input is not a PCK container. This is the
    /// normal outcome when a detection layer probes many codecs against the
    /// same file, so it is deliberately not an error: only a fully
    /// validated index is ever returned, never a partial one, and foreign
    /// input never panics.
    pub fn parse(data: &[u8]) -> Option<PckIndex> {
        let mut cur = ByteCursor::new(data);

        let count = cur.read_u32le().ok()?;
        if count == 0 || count >= MAX_ENTRIES {
            trace!(count, "rejecting PCK candidate: entry count out of bounds");
            return None;
        }
        let count = count as usize;

        let index_size = HEADER_SIZE + count * RECORD_SIZE;
        if index_size > data.len() {
            trace!(count, "rejecting PCK candidate: index larger than file");
            return None;
        }

        // A valid container's payload region begins after its own index.
        let first_offset = cur.read_u32le().ok()? as usize;
        if first_offset < index_size || first_offset >= data.len() {
            trace!(first_offset, index_size, "rejecting PCK candidate: bad first offset");
            return None;
        }

        // Header pairs: (offset, size) per entry, duplicated in the table
        // records below. Disagreement between the two copies marks the file
        // as foreign or corrupt.
        cur.seek(HEADER_SIZE).ok()?;
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = cur.read_u32le().ok()?;
            let size = cur.read_u32le().ok()?;
            pairs.push((offset, size));
        }

        let mut entries = Vec::with_capacity(count);
        for &(offset, size) in &pairs {
            let name = cur.read_name(NAME_SIZE).ok()?;
            if name.is_empty() {
                return None;
            }
            if cur.read_u32le().ok()? != offset || cur.read_u32le().ok()? != size {
                trace!(name, "rejecting PCK candidate: index copies disagree");
                return None;
            }

            let entry = Entry { name, offset, size };
            if !entry.check_placement(data.len()) {
                return None;
            }
            entries.push(entry);
        }

        debug!(count, "parsed PCK index");
        Some(PckIndex { entries })
    }

    /// Entries in physical file order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Payload bytes of the named entry within `data`.
    ///
    /// `data` must be the same container the index was parsed from.
    pub fn read_entry<'d>(&self, data: &'d [u8], name: &str) -> Option<&'d [u8]> {
        let entry = self.get(name)?;
        let start = entry.offset as usize;
        data.get(start..start + entry.size as usize)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pck::constants::SECTOR_SIZE;

    /// Hand-built two-entry container, independent of the builder.
    fn sample_container() -> Vec<u8> {
        let sector = SECTOR_SIZE as usize;
        let mut data = vec![0u8; 3 * sector + 4];

        data[0..4].copy_from_slice(&2u32.to_le_bytes());

        // Header pairs
        data[4..8].copy_from_slice(&(sector as u32).to_le_bytes());
        data[8..12].copy_from_slice(&10u32.to_le_bytes());
        data[12..16].copy_from_slice(&(2 * sector as u32).to_le_bytes());
        data[16..20].copy_from_slice(&5u32.to_le_bytes());

        // Table records at 4 + 2*8
        let rec0 = 20;
        data[rec0..rec0 + 5].copy_from_slice(b"a.bin");
        data[rec0 + 0x38..rec0 + 0x3C].copy_from_slice(&(sector as u32).to_le_bytes());
        data[rec0 + 0x3C..rec0 + 0x40].copy_from_slice(&10u32.to_le_bytes());

        let rec1 = rec0 + 0x40;
        data[rec1..rec1 + 5].copy_from_slice(b"b.bin");
        data[rec1 + 0x38..rec1 + 0x3C].copy_from_slice(&(2 * sector as u32).to_le_bytes());
        data[rec1 + 0x3C..rec1 + 0x40].copy_from_slice(&5u32.to_le_bytes());

        // Payloads
        data[sector..sector + 10].copy_from_slice(b"aaaaaaaaaa");
        data[2 * sector..2 * sector + 5].copy_from_slice(b"bbbbb");

        data
    }

    #[test]
    fn parses_valid_container() {
        let data = sample_container();
        let index = PckIndex::parse(&data).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.entries()[0],
            Entry {
                name: "a.bin".into(),
                offset: SECTOR_SIZE,
                size: 10,
            }
        );
        assert_eq!(index.entries()[1].name, "b.bin");
        assert_eq!(index.read_entry(&data, "a.bin").unwrap(), b"aaaaaaaaaa");
        assert_eq!(index.read_entry(&data, "b.bin").unwrap(), b"bbbbb");
        assert!(index.read_entry(&data, "c.bin").is_none());
    }

    #[test]
    fn placement_invariant_holds_post_parse() {
        let data = sample_container();
        let index = PckIndex::parse(&data).unwrap();
        for entry in index.entries() {
            assert!(entry.check_placement(data.len()));
        }
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(PckIndex::parse(&[]).is_none());
        assert!(PckIndex::parse(&[2, 0]).is_none());
    }

    #[test]
    fn rejects_insane_count() {
        let mut data = sample_container();
        data[0..4].copy_from_slice(&0u32.to_le_bytes());
        assert!(PckIndex::parse(&data).is_none());

        data[0..4].copy_from_slice(&MAX_ENTRIES.to_le_bytes());
        assert!(PckIndex::parse(&data).is_none());

        data[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(PckIndex::parse(&data).is_none());
    }

    #[test]
    fn rejects_first_offset_inside_index() {
        let mut data = sample_container();
        // Point the first payload into the index region
        data[4..8].copy_from_slice(&0x40u32.to_le_bytes());
        data[20 + 0x38..20 + 0x3C].copy_from_slice(&0x40u32.to_le_bytes());
        assert!(PckIndex::parse(&data).is_none());
    }

    #[test]
    fn rejects_first_offset_past_end() {
        let mut data = sample_container();
        let past = data.len() as u32;
        data[4..8].copy_from_slice(&past.to_le_bytes());
        data[20 + 0x38..20 + 0x3C].copy_from_slice(&past.to_le_bytes());
        assert!(PckIndex::parse(&data).is_none());
    }

    #[test]
    fn rejects_disagreeing_copies() {
        let mut data = sample_container();
        // Corrupt the second entry's table-record size only
        let rec1 = 20 + 0x40;
        data[rec1 + 0x3C..rec1 + 0x40].copy_from_slice(&6u32.to_le_bytes());
        assert!(PckIndex::parse(&data).is_none());
    }

    #[test]
    fn rejects_empty_name() {
        let mut data = sample_container();
        for b in &mut data[20..20 + 5] {
            *b = 0;
        }
        assert!(PckIndex::parse(&data).is_none());
    }

    #[test]
    fn rejects_entry_past_end() {
        let mut data = sample_container();
        let rec1 = 20 + 0x40;
        let huge = SECTOR_SIZE * 4;
        data[16..20].copy_from_slice(&huge.to_le_bytes());
        data[rec1 + 0x3C..rec1 + 0x40].copy_from_slice(&huge.to_le_bytes());
        assert!(PckIndex::parse(&data).is_none());
    }

    #[test]
    fn rejects_arbitrary_binary() {
        // A RIFF image file must not be mistaken for a container
        let mut data = Vec::from(&b"RIFF\x10\x00\x00\x00IPF fmt "[..]);
        data.resize(4096, 0xCD);
        assert!(PckIndex::parse(&data).is_none());
    }
}
