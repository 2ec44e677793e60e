//! TIFF container parsing for camera RAW files.
//!
//! Most RAW formats are TIFF underneath: DNG, CR2, NEF, ARW, PEF and many
//! more share the same header and directory structure, and ORF and RW2
//! reuse it with their own magic numbers.
//!
//! # Key Concepts
//!
//! - **Byte order**: the header declares the endianness (II = little-endian,
//!   MM = big-endian). All multi-byte values must be read respecting it.
//!
//! - **IFD (Image File Directory)**: a list of tagged entries plus the offset
//!   of the next IFD. Some entries point at nested sub-IFDs (SubIFDs, Exif).
//!
//! - **Inline vs offset values**: values of up to 4 bytes are stored in the
//!   entry itself, larger ones at an offset pointed to by the entry.

mod entry;
mod ifd;
mod parser;
mod tags;
mod values;

pub use entry::{IfdEntry, IFD_ENTRY_SIZE};
pub use ifd::{
    parse_tiff, parse_tiff_with_limits, Ifd, ParseLimits, TiffRootIfd, DEFAULT_MAX_IFDS,
    DEFAULT_MAX_SUB_IFD_DEPTH,
};
pub use parser::{is_tiff_header, TiffHeader, TiffMagic, TIFF_HEADER_SIZE};
pub use tags::{FieldType, TiffTag};
pub use values::trim_spaces;

pub use crate::io::ByteOrder;
