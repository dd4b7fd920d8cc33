//! TechnoBrain `IPF` raster images
//!
//! An IPF file is a RIFF container: an `IPF fmt ` header chunk with
//! palette/bitmap presence flags, an optional `pal ` chunk (bit-packed
//! palette, see [`palette`]), and a `bmp ` chunk whose pixel data is either
//! raw or run/copy compressed (see [`raster`]).
//!
//! Recognition and decoding are split the way a detection layer wants them:
//! [`IpfInfo::probe`] walks the chunk structure cheaply and returns `None`
//! for foreign files ('RIFF' alone is not enough — WAV files share it), and
//! [`IpfInfo::decode`] does the actual payload work, failing recoverably on
//! corrupt streams.

mod error;
mod palette;
mod raster;

pub use error::{ImageError, ImageResult};

use tracing::debug;

use crate::cursor::ByteCursor;
use crate::image::{DecodedImage, PixelFormat};

/// Minimum size of the `IPF fmt ` chunk body.
const MIN_FMT_SIZE: i32 = 0x24;
/// Minimum size of the `pal ` chunk body (sub-header + 32-byte mask).
const MIN_PAL_SIZE: i32 = 0x24;
/// Pixel data starts this far into the `bmp ` chunk body.
const BMP_DATA_OFFSET: usize = 0x18;

/// Parsed layout of a recognized IPF file.
///
/// Produced by [`probe`](Self::probe); holds the byte positions the decode
/// step needs, all validated against the file that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpfInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Whether the pixel stream is run/copy compressed.
    pub compressed: bool,
    /// Palette chunk body position and declared size, when present.
    pal_span: Option<(usize, usize)>,
    /// Absolute position of the pixel data.
    bmp_offset: usize,
}

impl IpfInfo {
    /// Try to recognize `data` as an IPF file.
    ///
    /// Returns `None` for anything that does not match the chunk layout;
    /// foreign input is the expected case, not an error.
    pub fn probe(data: &[u8]) -> Option<IpfInfo> {
        let mut cur = ByteCursor::new(data);
        if cur.read_bytes(4).ok()? != b"RIFF" {
            return None;
        }
        cur.seek(8).ok()?;
        if cur.read_bytes(8).ok()? != b"IPF fmt " {
            return None;
        }
        let fmt_size = cur.read_i32le().ok()?;
        if fmt_size < MIN_FMT_SIZE {
            return None;
        }

        // Presence flags live inside the fmt header
        cur.seek(0x18).ok()?;
        let has_palette = cur.read_i32le().ok()? != 0;
        cur.seek(0x28).ok()?;
        if cur.read_i32le().ok()? == 0 {
            // No bitmap, nothing to decode
            return None;
        }
        cur.seek(0x14 + fmt_size as usize).ok()?;

        let pal_span = if has_palette {
            if cur.read_bytes(4).ok()? != b"pal " {
                return None;
            }
            let pal_size = cur.read_i32le().ok()?;
            if pal_size < MIN_PAL_SIZE {
                return None;
            }
            let span = (cur.position(), pal_size as usize);
            cur.skip(pal_size as usize).ok()?;
            Some(span)
        } else {
            None
        };

        if cur.read_bytes(4).ok()? != b"bmp " {
            return None;
        }
        let bmp_size = cur.read_i32le().ok()?;
        if bmp_size <= 0x20 {
            return None;
        }
        let bmp_offset = cur.position() + BMP_DATA_OFFSET;
        let width = cur.read_u16le().ok()?;
        let height = cur.read_u16le().ok()?;
        cur.skip(0xE).ok()?;
        let compressed = cur.read_u8().ok()? & 1 != 0;

        Some(IpfInfo {
            width: u32::from(width),
            height: u32::from(height),
            compressed,
            pal_span,
            bmp_offset,
        })
    }

    /// Whether the image carries its own palette.
    pub fn has_palette(&self) -> bool {
        self.pal_span.is_some()
    }

    /// Decode the pixel data of a probed file.
    ///
    /// `data` must be the same bytes [`probe`](Self::probe) recognized.
    pub fn decode(&self, data: &[u8]) -> ImageResult<DecodedImage> {
        let palette = match self.pal_span {
            Some((offset, size)) => {
                // Chunk body: 4-byte sub-header, 32-byte mask, packed pool
                let body = data
                    .get(offset + 4..offset + size)
                    .ok_or(ImageError::TruncatedPalette {
                        required: size,
                        available: data.len().saturating_sub(offset),
                    })?;
                let (mask, pool) = body.split_at(0x20);
                Some(palette::decode_palette(mask, pool)?)
            }
            None => None,
        };

        let pixel_count = self.width as usize * self.height as usize;
        let bmp = data.get(self.bmp_offset..).unwrap_or(&[]);

        // Gate the output allocation on the input before committing up to
        // width*height bytes for a hostile header. A compressed stream has
        // no length bound (a terminator is valid at any point), but it
        // still needs at least one control byte.
        if self.compressed {
            if bmp.is_empty() && pixel_count > 0 {
                return Err(ImageError::TruncatedStream {
                    written: 0,
                    expected: pixel_count,
                });
            }
        } else if bmp.len() < pixel_count {
            return Err(ImageError::TruncatedBitmap {
                required: pixel_count,
                available: bmp.len(),
            });
        }

        let mut pixels = vec![0u8; pixel_count];
        if self.compressed {
            raster::unpack(bmp, &mut pixels)?;
        } else {
            pixels.copy_from_slice(&bmp[..pixel_count]);
        }

        debug!(
            width = self.width,
            height = self.height,
            compressed = self.compressed,
            "decoded IPF image"
        );

        Ok(DecodedImage {
            width: self.width,
            height: self.height,
            pixel_format: if palette.is_some() {
                PixelFormat::Indexed8
            } else {
                PixelFormat::Gray8
            },
            palette,
            pixels,
        })
    }
}
