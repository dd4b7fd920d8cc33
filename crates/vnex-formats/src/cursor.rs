//! Bounds-checked cursor over an immutable byte source
//!
//! Every format in this crate reads through [`ByteCursor`]: sequential and
//! randomly positioned reads that return `UnexpectedEof` instead of
//! panicking, so that format probes can walk arbitrary foreign files.

use std::io::{self, Cursor};

use byteorder::{LittleEndian, ReadBytesExt};

/// Positioned reader over a borrowed byte slice.
///
/// Slices handed out by [`read_bytes`](Self::read_bytes) borrow from the
/// underlying source, not from the cursor, so they stay valid across later
/// seeks and reads.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Total length of the underlying source.
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Whether the underlying source is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Bytes left between the current position and the end of the source.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    /// Move the read position to an absolute offset.
    pub fn seek(&mut self, pos: usize) -> io::Result<()> {
        if pos > self.len() {
            return Err(eof("seek past end of data"));
        }
        self.inner.set_position(pos as u64);
        Ok(())
    }

    /// Advance the read position by `n` bytes without reading them.
    pub fn skip(&mut self, n: usize) -> io::Result<()> {
        let pos = self
            .position()
            .checked_add(n)
            .ok_or_else(|| eof("skip past end of data"))?;
        self.seek(pos)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.inner.read_u8()
    }

    /// Read a little-endian `u16`.
    pub fn read_u16le(&mut self) -> io::Result<u16> {
        self.inner.read_u16::<LittleEndian>()
    }

    /// Read a little-endian `u32`.
    pub fn read_u32le(&mut self) -> io::Result<u32> {
        self.inner.read_u32::<LittleEndian>()
    }

    /// Read a little-endian `i32`.
    pub fn read_i32le(&mut self) -> io::Result<i32> {
        self.inner.read_i32::<LittleEndian>()
    }

    /// Read `len` bytes as a slice borrowing from the underlying source.
    pub fn read_bytes(&mut self, len: usize) -> io::Result<&'a [u8]> {
        let data: &'a [u8] = self.inner.get_ref();
        let start = self.position();
        let end = start
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| eof("read past end of data"))?;
        self.inner.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Read a fixed-width, NUL-padded name field.
    ///
    /// Consumes exactly `width` bytes and decodes the prefix up to the first
    /// NUL. Containers in this crate put names through a single-byte legacy
    /// codepage, so decoding is lossy rather than failing on non-UTF-8.
    pub fn read_name(&mut self, width: usize) -> io::Result<String> {
        let field = self.read_bytes(width)?;
        let name = field
            .iter()
            .position(|&b| b == 0)
            .map_or(field, |n| &field[..n]);
        Ok(String::from_utf8_lossy(name).into_owned())
    }
}

fn eof(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_reads() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut cur = ByteCursor::new(&data);

        assert_eq!(cur.read_u8().unwrap(), 0x01);
        assert_eq!(cur.read_u16le().unwrap(), 0x0302);
        assert_eq!(cur.read_u32le().unwrap(), 0x07060504);
        assert_eq!(cur.remaining(), 0);
        assert!(cur.read_u8().is_err());
    }

    #[test]
    fn random_access() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let mut cur = ByteCursor::new(&data);

        cur.seek(4).unwrap();
        assert_eq!(cur.read_u32le().unwrap(), 0x07060504);

        cur.seek(0).unwrap();
        assert_eq!(cur.read_bytes(3).unwrap(), &[0, 1, 2]);

        assert!(cur.seek(9).is_err());
        cur.seek(8).unwrap();
        assert!(cur.read_u8().is_err());
    }

    #[test]
    fn read_bytes_outlives_cursor_moves() {
        let data = [10u8, 11, 12, 13];
        let mut cur = ByteCursor::new(&data);
        let head = cur.read_bytes(2).unwrap();
        cur.seek(0).unwrap();
        let _ = cur.read_u32le().unwrap();
        assert_eq!(head, &[10, 11]);
    }

    #[test]
    fn read_bytes_bounds() {
        let data = [1u8, 2, 3];
        let mut cur = ByteCursor::new(&data);
        assert!(cur.read_bytes(4).is_err());
        // Failed read leaves the position unchanged
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.read_bytes(3).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn name_field_stops_at_nul() {
        let mut field = Vec::from(&b"HELLO.PCK"[..]);
        field.resize(16, 0);
        field.extend_from_slice(b"tail");

        let mut cur = ByteCursor::new(&field);
        assert_eq!(cur.read_name(16).unwrap(), "HELLO.PCK");
        // The full width was consumed regardless of the NUL position
        assert_eq!(cur.position(), 16);
    }

    #[test]
    fn name_field_without_nul_uses_full_width() {
        let field = *b"ABCD";
        let mut cur = ByteCursor::new(&field);
        assert_eq!(cur.read_name(4).unwrap(), "ABCD");
    }
}
