//! Error types for IPF image decoding

use thiserror::Error;

/// Result type for IPF decode operations.
pub type ImageResult<T> = Result<T, ImageError>;

/// Recoverable failures while decoding a recognized IPF image.
///
/// Recognition itself never produces these ([`IpfInfo::probe`] returns
/// `None` for foreign files); they cover streams that matched the container
/// layout but carry corrupt or truncated payload data. The original engine
/// left these conditions unchecked; here they fail safely instead.
///
/// [`IpfInfo::probe`]: super::IpfInfo::probe
#[derive(Debug, Error)]
pub enum ImageError {
    /// The control-byte stream ended before the output filled or a
    /// terminator appeared.
    #[error("pixel stream ended after {written} of {expected} output bytes")]
    TruncatedStream {
        /// Output bytes produced before the stream ran out.
        written: usize,
        /// Output bytes the image dimensions call for.
        expected: usize,
    },

    /// A back-reference copy reaches before the start of the output.
    #[error("back-reference of {back} bytes at output position {at} reaches before the image start")]
    BadBackReference {
        /// Back-offset encoded in the instruction.
        back: usize,
        /// Output position of the instruction.
        at: usize,
    },

    /// The palette pool is shorter than the bitmask requires.
    #[error("palette pool exhausted: {required} bytes required, {available} available")]
    TruncatedPalette {
        /// Pool bytes the mask's set bits consume.
        required: usize,
        /// Pool bytes actually present.
        available: usize,
    },

    /// An uncompressed bitmap holds fewer bytes than `width * height`.
    #[error("bitmap data ends after {available} of {required} bytes")]
    TruncatedBitmap {
        /// Bytes the image dimensions call for.
        required: usize,
        /// Bytes actually present.
        available: usize,
    },
}
