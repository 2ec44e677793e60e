//! Decoder selection for camera RAW files.
//!
//! Detection runs an ordered set of rules over the parsed directory tree;
//! the first rule that applies picks the decoder:
//!
//! 1. **DNG**: a DNGVersion tag anywhere in the tree
//! 2. **Make/Model table**: the first top-level IFD carrying Make
//! 3. **Leaf fallback**: Software = "Camera Library" anywhere in the tree
//!
//! Matching is exact and case-sensitive after trimming padding. A file no
//! rule applies to is rejected with [`ProbeError::NoDecoderMatched`].

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ProbeError;

use super::decoder::{CameraId, RawDecoder};
use super::tiff::{parse_tiff_with_limits, ParseLimits, TiffRootIfd, TiffTag};

// =============================================================================
// DecoderKind
// =============================================================================

/// Decoder variants this crate can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderKind {
    Dng,
    Cr2,
    Raf,
    Nef,
    Orf,
    Arw,
    Pef,
    Rw2,
    Srw,
    Mef,
    Dcr,
    Dcs,
    Kdc,
    Erf,
    Threefr,
    Mos,
}

impl DecoderKind {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            DecoderKind::Dng => "DNG",
            DecoderKind::Cr2 => "CR2",
            DecoderKind::Raf => "RAF",
            DecoderKind::Nef => "NEF",
            DecoderKind::Orf => "ORF",
            DecoderKind::Arw => "ARW",
            DecoderKind::Pef => "PEF",
            DecoderKind::Rw2 => "RW2",
            DecoderKind::Srw => "SRW",
            DecoderKind::Mef => "MEF",
            DecoderKind::Dcr => "DCR",
            DecoderKind::Dcs => "DCS",
            DecoderKind::Kdc => "KDC",
            DecoderKind::Erf => "ERF",
            DecoderKind::Threefr => "3FR",
            DecoderKind::Mos => "MOS",
        }
    }

    /// Usual file extension, lowercase and without the dot.
    pub const fn extension(&self) -> &'static str {
        match self {
            DecoderKind::Dng => "dng",
            DecoderKind::Cr2 => "cr2",
            DecoderKind::Raf => "raf",
            DecoderKind::Nef => "nef",
            DecoderKind::Orf => "orf",
            DecoderKind::Arw => "arw",
            DecoderKind::Pef => "pef",
            DecoderKind::Rw2 => "rw2",
            DecoderKind::Srw => "srw",
            DecoderKind::Mef => "mef",
            DecoderKind::Dcr => "dcr",
            DecoderKind::Dcs => "dcs",
            DecoderKind::Kdc => "kdc",
            DecoderKind::Erf => "erf",
            DecoderKind::Threefr => "3fr",
            DecoderKind::Mos => "mos",
        }
    }
}

// =============================================================================
// Rule Table
// =============================================================================

/// Software string written by Leaf backs that leave Make unset.
pub const LEAF_SOFTWARE: &str = "Camera Library";

/// One row of the Make/Model table.
struct MakeRule {
    makes: &'static [&'static str],
    /// Exact Model required, or any Model when `None`
    model: Option<&'static str>,
    decoder: DecoderKind,
}

impl MakeRule {
    fn matches(&self, make: &str, model: &str) -> bool {
        self.makes.iter().any(|m| *m == make) && self.model.map_or(true, |m| m == model)
    }
}

/// Evaluated top to bottom; order matters for the two Kodak rows.
const MAKE_RULES: &[MakeRule] = &[
    MakeRule {
        makes: &["Canon"],
        model: None,
        decoder: DecoderKind::Cr2,
    },
    MakeRule {
        makes: &["FUJIFILM"],
        model: None,
        decoder: DecoderKind::Raf,
    },
    MakeRule {
        makes: &["NIKON CORPORATION", "NIKON"],
        model: None,
        decoder: DecoderKind::Nef,
    },
    MakeRule {
        makes: &[
            "OLYMPUS IMAGING CORP.",
            "OLYMPUS CORPORATION",
            "OLYMPUS OPTICAL CO.,LTD",
        ],
        model: None,
        decoder: DecoderKind::Orf,
    },
    MakeRule {
        makes: &["SONY"],
        model: None,
        decoder: DecoderKind::Arw,
    },
    MakeRule {
        makes: &["PENTAX Corporation", "RICOH IMAGING COMPANY, LTD.", "PENTAX"],
        model: None,
        decoder: DecoderKind::Pef,
    },
    MakeRule {
        makes: &["Panasonic", "LEICA"],
        model: None,
        decoder: DecoderKind::Rw2,
    },
    MakeRule {
        makes: &["SAMSUNG"],
        model: None,
        decoder: DecoderKind::Srw,
    },
    MakeRule {
        makes: &["Mamiya-OP Co.,Ltd."],
        model: None,
        decoder: DecoderKind::Mef,
    },
    MakeRule {
        makes: &["Kodak"],
        model: Some("DCS560C"),
        decoder: DecoderKind::Cr2,
    },
    MakeRule {
        makes: &["Kodak"],
        model: None,
        decoder: DecoderKind::Dcr,
    },
    MakeRule {
        makes: &["KODAK"],
        model: None,
        decoder: DecoderKind::Dcs,
    },
    MakeRule {
        makes: &["EASTMAN KODAK COMPANY"],
        model: None,
        decoder: DecoderKind::Kdc,
    },
    MakeRule {
        makes: &["SEIKO EPSON CORP."],
        model: None,
        decoder: DecoderKind::Erf,
    },
    MakeRule {
        makes: &["Hasselblad"],
        model: None,
        decoder: DecoderKind::Threefr,
    },
    MakeRule {
        makes: &["Leaf", "Phase One A/S"],
        model: None,
        decoder: DecoderKind::Mos,
    },
];

/// Look a trimmed Make/Model pair up in the table.
pub fn decoder_for_make(make: &str, model: &str) -> Option<DecoderKind> {
    MAKE_RULES
        .iter()
        .find(|rule| rule.matches(make, model))
        .map(|rule| rule.decoder)
}

// =============================================================================
// Detection
// =============================================================================

/// Choose the decoder variant for a parsed tree.
///
/// # Returns
/// * `Ok(DecoderKind)` - The first rule that applied
/// * `Err(ProbeError::NoDecoderMatched)` - No rule applied
/// * `Err(ProbeError::MalformedDirectory)` - A routing tag could not be decoded
pub fn select_decoder(root: &TiffRootIfd<'_>) -> Result<DecoderKind, ProbeError> {
    if root.has_entry_recursive(TiffTag::DngVersion) {
        debug!("DNGVersion tag present");
        return Ok(DecoderKind::Dng);
    }

    // Only the first top-level IFD with a Make is consulted; an unmatched
    // Make falls through to the Software rule instead of trying later IFDs
    if let Some(ifd) = root.camera_ifd() {
        let id = CameraId::from_ifd(ifd)?;
        debug!(
            "Make {:?}, Model {:?} in IFD at {}",
            id.make,
            id.model,
            ifd.offset()
        );

        if let Some(kind) = decoder_for_make(&id.make, &id.model) {
            return Ok(kind);
        }
        debug!("Make {:?} not in the decoder table", id.make);
    }

    if let Some(entry) = root.entry_recursive(TiffTag::Software) {
        let software = entry.get_trimmed_string()?;
        if software == LEAF_SOFTWARE {
            debug!("Leaf Software marker without Make");
            return Ok(DecoderKind::Mos);
        }
    }

    Err(ProbeError::NoDecoderMatched)
}

/// Select a decoder and move the tree into it.
///
/// On any failure the tree is dropped here; it is never handed back.
pub fn make_decoder<'a>(
    root: TiffRootIfd<'a>,
    data: &'a [u8],
) -> Result<RawDecoder<'a>, ProbeError> {
    let kind = match select_decoder(&root) {
        Ok(kind) => kind,
        Err(err) => {
            warn!("No decoder selected: {}", err);
            return Err(err);
        }
    };

    match RawDecoder::new(kind, root, data) {
        Ok(decoder) => {
            info!("Selected {} decoder", kind.name());
            Ok(decoder)
        }
        Err(err) => {
            warn!("{} decoder rejected the file: {}", kind.name(), err);
            Err(ProbeError::decoder_construction(kind.name(), err))
        }
    }
}

/// Sniff, parse and dispatch `data` with default limits.
///
/// # Format Detection Logic
///
/// 1. Verify the byte order marker and magic
/// 2. Walk the IFD chain and sub-IFDs into a tree
/// 3. Run the detection rules and construct the selected decoder
pub fn probe(data: &[u8]) -> Result<RawDecoder<'_>, ProbeError> {
    probe_with_limits(data, &ParseLimits::default())
}

/// Sniff, parse and dispatch `data` under explicit parse limits.
pub fn probe_with_limits<'a>(
    data: &'a [u8],
    limits: &ParseLimits,
) -> Result<RawDecoder<'a>, ProbeError> {
    let root = parse_tiff_with_limits(data, limits)?;
    make_decoder(root, data)
}

// =============================================================================
// Tests
// =============================================================================
