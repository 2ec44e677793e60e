//! Vendor decoders selected by Make (and, for Leaf, by Software).
//!
//! These share one shape: own the tree, borrow the buffer, check on
//! construction that the camera's Make and Model route to this variant.

use crate::error::DecoderError;
use crate::format::detect::{DecoderKind, LEAF_SOFTWARE};
use crate::format::tiff::{trim_spaces, TiffRootIfd, TiffTag};

use super::{require_routed_make, Decoder};

macro_rules! vendor_decoder {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $check:path) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a> {
            root: TiffRootIfd<'a>,
            data: &'a [u8],
        }

        impl<'a> $name<'a> {
            /// Take ownership of `root` if it passes this vendor's checks.
            pub fn new(root: TiffRootIfd<'a>, data: &'a [u8]) -> Result<Self, DecoderError> {
                $check(&root, DecoderKind::$kind)?;
                Ok(Self { root, data })
            }
        }

        impl<'a> Decoder<'a> for $name<'a> {
            fn kind(&self) -> DecoderKind {
                DecoderKind::$kind
            }

            fn root(&self) -> &TiffRootIfd<'a> {
                &self.root
            }

            fn buffer(&self) -> &'a [u8] {
                self.data
            }

            fn into_root(self) -> TiffRootIfd<'a> {
                self.root
            }
        }
    };
}

vendor_decoder!(
    /// Canon CR2, also used for the Kodak DCS560C.
    Cr2Decoder,
    Cr2,
    require_routed_make
);
vendor_decoder!(
    /// Fujifilm RAF (TIFF-structured variants).
    RafDecoder,
    Raf,
    require_routed_make
);
vendor_decoder!(
    /// Nikon NEF.
    NefDecoder,
    Nef,
    require_routed_make
);
vendor_decoder!(
    /// Olympus ORF, magic "RO", "RS" or 42 on older bodies.
    OrfDecoder,
    Orf,
    require_routed_make
);
vendor_decoder!(
    /// Sony ARW.
    ArwDecoder,
    Arw,
    require_routed_make
);
vendor_decoder!(
    /// Pentax and Ricoh PEF.
    PefDecoder,
    Pef,
    require_routed_make
);
vendor_decoder!(
    /// Panasonic and Leica RW2.
    Rw2Decoder,
    Rw2,
    require_routed_make
);
vendor_decoder!(
    /// Samsung SRW.
    SrwDecoder,
    Srw,
    require_routed_make
);
vendor_decoder!(
    /// Mamiya MEF.
    MefDecoder,
    Mef,
    require_routed_make
);
vendor_decoder!(
    /// Kodak DCR ("Kodak" Make).
    DcrDecoder,
    Dcr,
    require_routed_make
);
vendor_decoder!(
    /// Kodak DCS ("KODAK" Make).
    DcsDecoder,
    Dcs,
    require_routed_make
);
vendor_decoder!(
    /// Kodak KDC.
    KdcDecoder,
    Kdc,
    require_routed_make
);
vendor_decoder!(
    /// Epson ERF.
    ErfDecoder,
    Erf,
    require_routed_make
);
vendor_decoder!(
    /// Hasselblad 3FR.
    ThreefrDecoder,
    Threefr,
    require_routed_make
);
vendor_decoder!(
    /// Leaf and Phase One MOS.
    MosDecoder,
    Mos,
    require_make_or_leaf_software
);

/// Some Leaf backs write no Make; their Software string stands in for it.
fn require_make_or_leaf_software(
    root: &TiffRootIfd<'_>,
    kind: DecoderKind,
) -> Result<(), DecoderError> {
    let routed = require_routed_make(root, kind);
    if routed.is_ok() {
        return routed;
    }
    let Some(entry) = root.entry_recursive(TiffTag::Software) else {
        return routed;
    };
    if trim_spaces(&entry.get_string()?) == LEAF_SOFTWARE {
        Ok(())
    } else {
        routed
    }
}
