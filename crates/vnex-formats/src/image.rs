//! Generic decoded-image result types
//!
//! Every image codec in this crate decodes into [`DecodedImage`], the shape
//! consumed by extraction hosts: dimensions, a pixel format tag, an optional
//! palette, and an owned pixel buffer.

/// A single palette color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A 256-entry color table.
///
/// Entries default to black; codecs populate it sparsely and indices they
/// never touch keep the default color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable([Rgb; 256]);

impl Default for PaletteTable {
    fn default() -> Self {
        Self([Rgb::default(); 256])
    }
}

impl PaletteTable {
    /// Color at `index`.
    pub fn get(&self, index: u8) -> Rgb {
        self.0[usize::from(index)]
    }

    /// Replace the color at `index`.
    pub fn set(&mut self, index: u8, color: Rgb) {
        self.0[usize::from(index)] = color;
    }

    /// All 256 entries in index order.
    pub fn colors(&self) -> &[Rgb; 256] {
        &self.0
    }
}

/// Layout of the pixel buffer in a [`DecodedImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel, indexing into the image's palette.
    Indexed8,
    /// One byte per pixel, interpreted as a gray level.
    Gray8,
}

/// A fully decoded raster image, ownership transferred to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub pixel_format: PixelFormat,
    /// Color table for [`PixelFormat::Indexed8`] images.
    pub palette: Option<PaletteTable>,
    /// Pixel data, `width * height` bytes.
    pub pixels: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_defaults_to_black() {
        let table = PaletteTable::default();
        assert_eq!(table.get(0), Rgb::new(0, 0, 0));
        assert_eq!(table.get(255), Rgb::new(0, 0, 0));
    }

    #[test]
    fn palette_set_get() {
        let mut table = PaletteTable::default();
        table.set(0x0A, Rgb::new(1, 2, 3));
        assert_eq!(table.get(0x0A), Rgb::new(1, 2, 3));
        assert_eq!(table.get(0x0B), Rgb::default());
    }
}
