//! PCK container construction

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::constants::{HEADER_SIZE, MAX_ENTRIES, NAME_SIZE, RECORD_SIZE, TABLE_RECORD_SIZE};
use super::error::{ArchiveError, ArchiveResult};
use super::next_sector;

/// Where an entry's payload bytes come from.
#[derive(Debug, Clone)]
enum EntrySource {
    Data(Vec<u8>),
    File(PathBuf),
}

impl EntrySource {
    fn bytes(&self) -> ArchiveResult<Cow<'_, [u8]>> {
        match self {
            Self::Data(data) => Ok(Cow::Borrowed(data)),
            Self::File(path) => Ok(Cow::Owned(fs::read(path)?)),
        }
    }
}

#[derive(Debug, Clone)]
struct BuildEntry {
    name: String,
    source: EntrySource,
}

/// Growable output buffer with an explicit write cursor.
///
/// Writes past the current end zero-extend the buffer first, which is how
/// sector padding between payloads materializes: the next positioned write
/// (or the trailing sentinel) pulls the buffer out to cover the gap.
#[derive(Debug)]
struct VecWriter {
    buf: Vec<u8>,
    pos: usize,
}

impl VecWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            pos: 0,
        }
    }

    fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn write(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    fn write_u32le(&mut self, value: u32) {
        self.write(&value.to_le_bytes());
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Builds PCK containers that round-trip through [`PckIndex::parse`].
///
/// Entries are laid out in insertion order; each payload starts on a
/// 2048-byte boundary and is padded to the next one. Any failure aborts the
/// whole build with an [`ArchiveError`]; no partial container is returned.
///
/// [`PckIndex::parse`]: super::PckIndex::parse
///
/// # Examples
///
/// ```
/// use vnex_formats::pck::{PckBuilder, PckIndex};
///
/// let mut builder = PckBuilder::new();
/// builder.add_data("title.ipf", vec![0xAA; 10]);
/// let container = builder.build()?;
///
/// let index = PckIndex::parse(&container).unwrap();
/// assert_eq!(index.entries()[0].name, "title.ipf");
/// # Ok::<(), vnex_formats::pck::ArchiveError>(())
/// ```
#[derive(Debug, Default)]
pub struct PckBuilder {
    entries: Vec<BuildEntry>,
}

impl PckBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry backed by in-memory bytes.
    pub fn add_data(&mut self, name: impl Into<String>, data: Vec<u8>) -> &mut Self {
        self.entries.push(BuildEntry {
            name: name.into(),
            source: EntrySource::Data(data),
        });
        self
    }

    /// Append an entry whose payload is read from `path` at build time.
    ///
    /// A missing or unreadable source file fails the whole build.
    pub fn add_file(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
        self.entries.push(BuildEntry {
            name: name.into(),
            source: EntrySource::File(path.into()),
        });
        self
    }

    /// Number of entries queued so far.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Serialize the container.
    pub fn build(&self) -> ArchiveResult<Vec<u8>> {
        let count = self.entries.len();
        if count >= MAX_ENTRIES as usize {
            return Err(ArchiveError::TooManyEntries(count));
        }
        for entry in &self.entries {
            // A NUL terminates the on-disk name field, so an embedded NUL
            // would come back truncated (or empty) on re-parse.
            if entry.name.is_empty()
                || entry.name.len() > NAME_SIZE
                || entry.name.as_bytes().contains(&0)
            {
                return Err(ArchiveError::InvalidName(entry.name.clone()));
            }
        }

        debug!(count, "building PCK container");

        let index_size = HEADER_SIZE + count * RECORD_SIZE;
        let mut w = VecWriter::with_capacity(index_size);
        w.write_u32le(count as u32);
        if count == 0 {
            // Header only: no payload region, no sentinel.
            return Ok(w.into_inner());
        }

        let table_base = HEADER_SIZE + count * 8;
        let mut offset = next_sector(index_size as u32);

        for (i, entry) in self.entries.iter().enumerate() {
            let data = entry.source.bytes()?;
            let size = u32::try_from(data.len()).map_err(|_| ArchiveError::EntryTooLarge {
                name: entry.name.clone(),
                size: data.len() as u64,
            })?;
            let payload_offset =
                u32::try_from(offset).map_err(|_| ArchiveError::ArchiveTooLarge)?;

            // Offset and size go to both index locations.
            w.seek(HEADER_SIZE + i * 8);
            w.write_u32le(payload_offset);
            w.write_u32le(size);

            let record = table_base + i * TABLE_RECORD_SIZE;
            w.seek(record);
            w.write(entry.name.as_bytes());
            w.seek(record + NAME_SIZE);
            w.write_u32le(payload_offset);
            w.write_u32le(size);

            w.seek(payload_offset as usize);
            w.write(&data);

            offset += next_sector(size);
        }

        // Zero sentinel immediately after the last padded payload.
        let sentinel = u32::try_from(offset).map_err(|_| ArchiveError::ArchiveTooLarge)?;
        w.seek(sentinel as usize);
        w.write_u32le(0);

        Ok(w.into_inner())
    }

    /// Serialize the container and write it to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> ArchiveResult<()> {
        let bytes = self.build()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}
