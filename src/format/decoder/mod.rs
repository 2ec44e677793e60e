//! Decoder variants selected by format detection.
//!
//! Each variant takes ownership of the parsed directory tree and borrows the
//! buffer it was parsed from. Pixel decoding itself lives outside this
//! crate; a decoder here validates that the tree is one it can handle and
//! offers camera identification.

mod dng;
mod vendor;

use serde::Serialize;

use crate::error::{DecoderError, TiffError};

use super::detect::{decoder_for_make, DecoderKind};
use super::tiff::{Ifd, TiffRootIfd, TiffTag};

pub use dng::DngDecoder;
pub use vendor::{
    ArwDecoder, Cr2Decoder, DcrDecoder, DcsDecoder, ErfDecoder, KdcDecoder, MefDecoder,
    MosDecoder, NefDecoder, OrfDecoder, PefDecoder, RafDecoder, Rw2Decoder, SrwDecoder,
    ThreefrDecoder,
};

// =============================================================================
// CameraId
// =============================================================================

/// Camera identity as recorded in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraId {
    /// Trimmed Make string
    pub make: String,

    /// Trimmed Model string, empty if absent
    pub model: String,
}

impl CameraId {
    /// Read the trimmed Make and Model of one IFD. Model may be absent.
    pub fn from_ifd(ifd: &Ifd<'_>) -> Result<Self, TiffError> {
        let make = match ifd.entry(TiffTag::Make) {
            Some(entry) => entry.get_trimmed_string()?,
            None => String::new(),
        };
        let model = match ifd.entry(TiffTag::Model) {
            Some(entry) => entry.get_trimmed_string()?,
            None => String::new(),
        };
        Ok(CameraId { make, model })
    }

    /// Identify the camera from the IFD detection routes on, see
    /// [`TiffRootIfd::camera_ifd`].
    pub fn from_root(root: &TiffRootIfd<'_>) -> Result<Self, DecoderError> {
        let ifd = root
            .camera_ifd()
            .ok_or(DecoderError::MissingTag("Make"))?;
        Ok(Self::from_ifd(ifd)?)
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// Capabilities shared by every decoder variant.
pub trait Decoder<'a> {
    /// Which variant this is.
    fn kind(&self) -> DecoderKind;

    /// The directory tree this decoder owns.
    fn root(&self) -> &TiffRootIfd<'a>;

    /// The buffer the tree was parsed from.
    fn buffer(&self) -> &'a [u8];

    /// Give the tree back, consuming the decoder.
    fn into_root(self) -> TiffRootIfd<'a>
    where
        Self: Sized;

    /// Identify the camera that wrote the file.
    fn identify(&self) -> Result<CameraId, DecoderError> {
        CameraId::from_root(self.root())
    }
}

// =============================================================================
// RawDecoder
// =============================================================================

macro_rules! raw_decoders {
    ($($variant:ident => $decoder:ident),+ $(,)?) => {
        /// One decoder instance, of exactly one variant.
        #[derive(Debug)]
        pub enum RawDecoder<'a> {
            $($variant($decoder<'a>),)+
        }

        impl<'a> RawDecoder<'a> {
            /// Construct the variant named by `kind`, moving the tree into it.
            ///
            /// On failure the tree is dropped along with the error path.
            pub fn new(
                kind: DecoderKind,
                root: TiffRootIfd<'a>,
                data: &'a [u8],
            ) -> Result<Self, DecoderError> {
                match kind {
                    $(DecoderKind::$variant => $decoder::new(root, data).map(RawDecoder::$variant),)+
                }
            }

            fn as_decoder(&self) -> &dyn Decoder<'a> {
                match self {
                    $(RawDecoder::$variant(decoder) => decoder,)+
                }
            }

            pub fn into_root(self) -> TiffRootIfd<'a> {
                match self {
                    $(RawDecoder::$variant(decoder) => decoder.into_root(),)+
                }
            }
        }
    };
}

raw_decoders! {
    Dng => DngDecoder,
    Cr2 => Cr2Decoder,
    Raf => RafDecoder,
    Nef => NefDecoder,
    Orf => OrfDecoder,
    Arw => ArwDecoder,
    Pef => PefDecoder,
    Rw2 => Rw2Decoder,
    Srw => SrwDecoder,
    Mef => MefDecoder,
    Dcr => DcrDecoder,
    Dcs => DcsDecoder,
    Kdc => KdcDecoder,
    Erf => ErfDecoder,
    Threefr => ThreefrDecoder,
    Mos => MosDecoder,
}

impl<'a> RawDecoder<'a> {
    pub fn kind(&self) -> DecoderKind {
        self.as_decoder().kind()
    }

    pub fn root(&self) -> &TiffRootIfd<'a> {
        self.as_decoder().root()
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.as_decoder().buffer()
    }

    pub fn identify(&self) -> Result<CameraId, DecoderError> {
        self.as_decoder().identify()
    }
}

/// Fail unless the camera's Make and Model route to `kind`.
pub(crate) fn require_routed_make(
    root: &TiffRootIfd<'_>,
    kind: DecoderKind,
) -> Result<(), DecoderError> {
    let id = CameraId::from_root(root)?;
    match decoder_for_make(&id.make, &id.model) {
        Some(routed) if routed == kind => Ok(()),
        _ => Err(DecoderError::Unsupported(format!(
            "Make {:?} model {:?} is not a {} camera",
            id.make,
            id.model,
            kind.name()
        ))),
    }
}
