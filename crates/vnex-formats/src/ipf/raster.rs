//! Control-byte raster decompression
//!
//! The IPF pixel stream is a flat loop over single control bytes:
//!
//! | control      | action                                                  |
//! |--------------|---------------------------------------------------------|
//! | `0x0F`       | stop immediately                                        |
//! | `0x0E`       | emit the byte `0x0E` itself                             |
//! | `0x00..=0x0D`| fill run: `(ctl << 8 \| next) + 1` copies of a byte     |
//! | `0x10..=0x1F`| back-reference copy from already-produced output        |
//! | `0x20..=0xFF`| emit `ctl - 0x10`                                       |
//!
//! Back-references may overlap their own destination; copying forward one
//! byte at a time is what lets `back = 1` replicate the previous byte into
//! a run, so the copy must never be bulk.

use tracing::trace;

use crate::cursor::ByteCursor;

use super::error::{ImageError, ImageResult};

/// Control byte that terminates the stream.
const CTL_STOP: u8 = 0x0F;
/// Control byte that escapes a literal `0x0E`.
const CTL_LITERAL_0E: u8 = 0x0E;

/// Decode a compressed pixel stream into `output`.
///
/// Stops when `output` is full or a terminator control byte is read,
/// whichever comes first; an early terminator leaves the tail of `output`
/// untouched and is not an error. Runs that would overrun `output` are
/// clamped to the remaining capacity. Input that ends mid-instruction is a
/// [`TruncatedStream`](ImageError::TruncatedStream) error.
pub(crate) fn unpack(input: &[u8], output: &mut [u8]) -> ImageResult<()> {
    let mut cur = ByteCursor::new(input);
    let expected = output.len();
    let mut dst = 0;

    while dst < output.len() {
        let ctl = read_or_truncated(&mut cur, dst, expected)?;
        match ctl {
            CTL_STOP => {
                trace!(written = dst, expected, "pixel stream terminator");
                break;
            }
            CTL_LITERAL_0E => {
                output[dst] = ctl;
                dst += 1;
            }
            0x00..=0x0D => {
                let count_hi = read_or_truncated(&mut cur, dst, expected)?;
                let fill = read_or_truncated(&mut cur, dst, expected)?;
                let count = (usize::from(ctl) << 8 | usize::from(count_hi)) + 1;
                let run = count.min(output.len() - dst);
                output[dst..dst + run].fill(fill);
                dst += run;
            }
            0x10..=0x1F => {
                let offset_lo = read_or_truncated(&mut cur, dst, expected)?;
                let count = read_or_truncated(&mut cur, dst, expected)?;
                let back = (usize::from(ctl - 0x10) << 8 | usize::from(offset_lo)) + 1;
                if back > dst {
                    return Err(ImageError::BadBackReference { back, at: dst });
                }
                let run = (usize::from(count) + 1).min(output.len() - dst);
                // Overlapping self-copy: forward, one byte at a time
                for i in 0..run {
                    output[dst + i] = output[dst + i - back];
                }
                dst += run;
            }
            _ => {
                output[dst] = ctl - 0x10;
                dst += 1;
            }
        }
    }

    Ok(())
}

fn read_or_truncated(cur: &mut ByteCursor<'_>, written: usize, expected: usize) -> ImageResult<u8> {
    cur.read_u8()
        .map_err(|_| ImageError::TruncatedStream { written, expected })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn literal_values_are_shifted() {
        let mut out = [0u8; 3];
        unpack(&[0x51, 0x52, 0x53], &mut out).unwrap();
        assert_eq!(&out, b"ABC");
    }

    #[test]
    fn literal_escape_for_0e() {
        let mut out = [0u8; 2];
        unpack(&[0x0E, 0x1E + 0x10], &mut out).unwrap();
        assert_eq!(out, [0x0E, 0x1E]);
    }

    #[test]
    fn fill_run() {
        // ctl=0x00, count_hi=0x03 -> 4 copies of 0x7F
        let mut out = [0u8; 4];
        unpack(&[0x00, 0x03, 0x7F], &mut out).unwrap();
        assert_eq!(out, [0x7F; 4]);
    }

    #[test]
    fn fill_run_clamps_to_buffer() {
        // ctl=0x05 asks for 0x501 bytes; only 6 fit, then the stream's
        // terminator ends the decode
        let mut out = [0u8; 6];
        unpack(&[0x05, 0x00, 0x41, 0x0F], &mut out).unwrap();
        assert_eq!(&out, b"AAAAAA");
    }

    #[test]
    fn overlapping_back_reference_replicates_pattern() {
        // One literal 'A', then back=1 copy of 5 bytes: the copy reads its
        // own freshly written output, so the result is six 'A's rather than
        // one stale byte.
        let mut out = [0u8; 6];
        unpack(&[0x51, 0x10, 0x00, 0x04], &mut out).unwrap();
        assert_eq!(&out, b"AAAAAA");
    }

    #[test]
    fn two_byte_period_back_reference() {
        let mut out = [0u8; 8];
        unpack(&[0x51, 0x52, 0x10, 0x01, 0x05], &mut out).unwrap();
        assert_eq!(&out, b"ABABABAB");
    }

    #[test]
    fn terminator_stops_early() {
        let mut out = [9u8; 5];
        unpack(&[0x51, 0x0F, 0x52], &mut out).unwrap();
        assert_eq!(out, [b'A', 9, 9, 9, 9]);
    }

    #[test]
    fn exhausted_input_is_an_error() {
        let mut out = [0u8; 4];
        let err = unpack(&[0x51], &mut out).unwrap_err();
        assert!(matches!(
            err,
            ImageError::TruncatedStream {
                written: 1,
                expected: 4,
            }
        ));

        // Fill run missing its fill byte
        let mut out = [0u8; 4];
        assert!(unpack(&[0x00, 0x03], &mut out).is_err());
    }

    #[test]
    fn back_reference_before_start_is_an_error() {
        let mut out = [0u8; 4];
        let err = unpack(&[0x51, 0x10, 0x01, 0x00], &mut out).unwrap_err();
        assert!(matches!(err, ImageError::BadBackReference { back: 2, at: 1 }));
    }

    #[test]
    fn full_buffer_ends_decode_without_terminator() {
        let mut out = [0u8; 2];
        unpack(&[0x51, 0x52], &mut out).unwrap();
        assert_eq!(&out, b"AB");
    }
}
