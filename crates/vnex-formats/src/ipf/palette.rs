//! Bit-packed palette reconstruction
//!
//! An IPF palette chunk stores a 32-byte occupancy bitmask followed by a
//! compacted pool of RGB triplets. Bit `dst` of the mask (MSB-first within
//! each byte) says whether color index `dst` is present; only present
//! colors occupy pool bytes, so the pool cursor must track the mask exactly.

use crate::image::{PaletteTable, Rgb};

use super::error::{ImageError, ImageResult};

/// Lowest color index that materializes from the pool.
const MIN_INDEX: usize = 0x0A;
/// Highest color index that materializes from the pool.
const MAX_INDEX: usize = 0xF6;

/// Reconstruct a 256-entry color table from a 32-byte `mask` and a packed
/// RGB `pool`.
///
/// Set bits below 0x0A are structurally reserved: they mark the index as
/// occupied but never consume pool bytes. Set bits above 0xF6 consume their
/// three pool bytes without storing a color; the engine keeps the pool
/// cursor synchronized with the mask that way, and dropping the consume
/// step desynchronizes every color after it. Indices never set keep the
/// default (black) color.
pub(crate) fn decode_palette(mask: &[u8], pool: &[u8]) -> ImageResult<PaletteTable> {
    let mut table = PaletteTable::default();
    let mut src = 0;

    for (i, &byte) in mask.iter().enumerate() {
        let mut bits = byte;
        for j in 0..8 {
            let dst = (i << 3) + j;
            if dst >= MIN_INDEX && bits & 0x80 != 0 {
                if src + 3 > pool.len() {
                    return Err(ImageError::TruncatedPalette {
                        required: src + 3,
                        available: pool.len(),
                    });
                }
                if dst <= MAX_INDEX {
                    table.set(dst as u8, Rgb::new(pool[src], pool[src + 1], pool[src + 2]));
                }
                src += 3;
            }
            bits <<= 1;
        }
    }

    Ok(table)
}
