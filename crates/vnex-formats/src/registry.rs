//! Explicit format registry
//!
//! Formats are a closed set of tagged variants selected by explicit
//! signature matching; there is no ambient self-registration. A host
//! constructs one [`Registry`] at startup and probes candidate byte sources
//! against it. Probing is the normal path for unrecognized input, so a miss
//! is `None`, never an error.

use tracing::debug;

use crate::ipf::IpfInfo;
use crate::pck::PckIndex;

/// Identifier for a supported format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// Circus PCK resource container.
    Pck,
    /// TechnoBrain IPF raster image.
    Ipf,
}

impl FormatTag {
    /// Human-readable tag, stable across releases.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pck => "PCK/CIRCUS",
            Self::Ipf => "IPF",
        }
    }
}

/// Outcome of a successful probe: the parsed product of whichever format
/// recognized the input. Archives carry their validated index; images carry
/// the layout handle their [`decode`](IpfInfo::decode) step needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognized {
    /// A resource container with a validated entry directory.
    Archive(PckIndex),
    /// A raster image ready to decode.
    Image(IpfInfo),
}

/// Ordered set of format probes.
#[derive(Debug, Clone)]
pub struct Registry {
    formats: Vec<FormatTag>,
}

impl Registry {
    /// Registry holding every builtin format.
    ///
    /// Signature-carrying formats come first so that magic-less containers
    /// (PCK has only a count field) cannot shadow them.
    pub fn new() -> Self {
        Self {
            formats: vec![FormatTag::Ipf, FormatTag::Pck],
        }
    }

    /// Registered formats in probe order.
    pub fn formats(&self) -> &[FormatTag] {
        &self.formats
    }

    /// Probe `data` against every registered format in order.
    pub fn probe(&self, data: &[u8]) -> Option<(FormatTag, Recognized)> {
        self.formats.iter().find_map(|&tag| {
            let recognized = Self::try_parse(tag, data)?;
            debug!(format = tag.name(), "recognized input");
            Some((tag, recognized))
        })
    }

    fn try_parse(tag: FormatTag, data: &[u8]) -> Option<Recognized> {
        match tag {
            FormatTag::Pck => PckIndex::parse(data).map(Recognized::Archive),
            FormatTag::Ipf => IpfInfo::probe(data).map(Recognized::Image),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
