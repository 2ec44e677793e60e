//! Camera RAW format detection.
//!
//! The TIFF container is parsed into a directory tree by [`tiff`], and
//! [`detect`] chooses which [`decoder`] variant takes ownership of it.
//!
//! # Format Detection
//!
//! Use [`detect::probe`] to go from a byte buffer to a decoder in one call,
//! or the staged functions ([`tiff::parse_tiff`], [`detect::select_decoder`],
//! [`detect::make_decoder`]) to inspect the intermediate results.

pub mod decoder;
pub mod detect;
pub mod tiff;

pub use decoder::{CameraId, Decoder, RawDecoder};
pub use detect::{
    decoder_for_make, make_decoder, probe, probe_with_limits, select_decoder, DecoderKind,
    LEAF_SOFTWARE,
};
