//! Binary format codecs for extracting assets from legacy visual-novel
//! engines.
//!
//! Each module recognizes one vendor-specific layout, validates it, and
//! decodes it into a generic representation: a directory of named byte
//! ranges ([`pck`]) or a raster image ([`ipf`]).
//!
//! # Design principles
//!
//! - **Defensive recognition**: parsers are probed against arbitrary files
//!   by a detection layer, so "not this format" is an `Option::None`, never
//!   an error and never a panic, and only fully validated results are
//!   returned.
//! - **Symmetric operations**: the PCK container supports both parsing and
//!   building, with the round-trip guarantee `parse(build(entries)) ==
//!   entries`.
//! - **Recoverable decoding**: recognized files with corrupt payloads fail
//!   with typed errors instead of faulting, including conditions the
//!   original engines left unchecked.
//!
//! # Example
//!
//! ```
//! use vnex_formats::pck::{PckBuilder, PckIndex};
//!
//! let mut builder = PckBuilder::new();
//! builder.add_data("ev001.ipf", vec![0x42; 16]);
//! let container = builder.build()?;
//!
//! let index = PckIndex::parse(&container).expect("round-trips");
//! assert_eq!(index.read_entry(&container, "ev001.ipf").unwrap(), &[0x42; 16]);
//! # Ok::<(), vnex_formats::pck::ArchiveError>(())
//! ```

#![warn(missing_docs)]

pub mod cursor;
pub mod image;
pub mod ipf;
pub mod pck;
pub mod registry;

pub use cursor::ByteCursor;
pub use image::{DecodedImage, PaletteTable, PixelFormat, Rgb};
pub use registry::{FormatTag, Recognized, Registry};
