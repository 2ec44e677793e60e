//! # rawprobe
//!
//! Identify camera RAW files by their TIFF container.
//!
//! Most RAW formats store their metadata in a TIFF structure. This library
//! verifies the container header, walks the chain of Image File Directories
//! (and their nested sub-IFDs) into an owned tree, and selects the decoder
//! variant for the file from a small set of ordered rules: DNG first, then
//! the camera Make/Model, then a Software fallback for Leaf backs.
//!
//! ## Architecture
//!
//! - [`io`] - Bounds-checked byte cursor with switchable byte order
//! - [`mod@format`] - TIFF parser, decoder dispatch and decoder variants
//! - [`error`] - Internal error types and the public [`ProbeError`]
//! - [`report`] - Per-file reports for the command-line tool
//! - [`config`] - CLI configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use rawprobe::probe;
//!
//! let data = std::fs::read("IMG_0001.CR2").unwrap();
//! match probe(&data) {
//!     Ok(decoder) => println!("{}", decoder.kind().name()),
//!     Err(err) => eprintln!("{} ({})", err, err.stage()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod report;

// Re-export commonly used types
pub use config::Config;
pub use error::{DecoderError, ErrorKind, IoError, ProbeError, TiffError};
pub use format::decoder::{
    ArwDecoder, CameraId, Cr2Decoder, DcrDecoder, DcsDecoder, Decoder, DngDecoder, ErfDecoder,
    KdcDecoder, MefDecoder, MosDecoder, NefDecoder, OrfDecoder, PefDecoder, RawDecoder,
    Rw2Decoder, SrwDecoder, ThreefrDecoder,
};
pub use format::detect::{
    decoder_for_make, make_decoder, probe, probe_with_limits, select_decoder, DecoderKind,
};
pub use format::tiff::{
    is_tiff_header, parse_tiff, parse_tiff_with_limits, ByteOrder, FieldType, Ifd, IfdEntry,
    ParseLimits, TiffHeader, TiffMagic, TiffRootIfd, TiffTag, TIFF_HEADER_SIZE,
};
pub use io::ByteCursor;
pub use report::{render_tree, ErrorReport, ProbeReport};
