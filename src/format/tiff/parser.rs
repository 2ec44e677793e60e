//! TIFF header parsing.
//!
//! Validates the container header and establishes the byte order used for
//! every later read.
//!
//! # Header Structure
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Magic (42, or a vendor value reusing the TIFF shell)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```

use serde::Serialize;

use crate::error::TiffError;
use crate::io::{ByteCursor, ByteOrder};

// =============================================================================
// Constants
// =============================================================================

/// Marker bytes for little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Marker bytes for big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Size of the classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

// =============================================================================
// TiffMagic
// =============================================================================

/// Accepted values of the header magic.
///
/// The vendor values are specific historical choices, not a range, so the
/// check is an allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TiffMagic {
    /// 42, the standard TIFF magic
    Standard,
    /// 0x4F52 ("RO"), Olympus ORF
    OlympusRo,
    /// 0x5352 ("RS"), Olympus ORF
    OlympusRs,
    /// 0x0055, Panasonic and Leica RW2
    Panasonic,
}

impl TiffMagic {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            42 => Some(TiffMagic::Standard),
            0x4F52 => Some(TiffMagic::OlympusRo),
            0x5352 => Some(TiffMagic::OlympusRs),
            0x0055 => Some(TiffMagic::Panasonic),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        match self {
            TiffMagic::Standard => 42,
            TiffMagic::OlympusRo => 0x4F52,
            TiffMagic::OlympusRs => 0x5352,
            TiffMagic::Panasonic => 0x0055,
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the file
    pub byte_order: ByteOrder,

    /// Which member of the TIFF family the magic announced
    pub magic: TiffMagic,

    /// Offset to the first IFD. Not validated here; the tree builder
    /// rejects it if it leaves the buffer.
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse the container header at the start of `bytes`.
    ///
    /// # Errors
    /// - `FileTooSmall` if there are fewer than 8 bytes
    /// - `InvalidByteOrder` if the first two bytes are not II or MM
    /// - `InvalidMagic` if the magic is not in the allow-list
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(TiffError::FileTooSmall {
                required: TIFF_HEADER_SIZE as u64,
                actual: bytes.len() as u64,
            });
        }

        // The marker is a byte pattern, so either order reads it the same way
        let mut cursor = ByteCursor::new(bytes, ByteOrder::LittleEndian);
        let marker = cursor.read_u16()?;
        let byte_order = match marker {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidByteOrder(marker)),
        };
        cursor.set_byte_order(byte_order);

        let raw_magic = cursor.read_u16()?;
        let magic = TiffMagic::from_u16(raw_magic).ok_or(TiffError::InvalidMagic(raw_magic))?;

        let first_ifd_offset = cursor.read_u32()?;

        Ok(TiffHeader {
            byte_order,
            magic,
            first_ifd_offset,
        })
    }
}

/// Check if bytes start with a recognized TIFF-family header.
///
/// A quick check that can be used before attempting full parsing.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    TiffHeader::parse(bytes).is_ok()
}

// =============================================================================
// Tests
// =============================================================================
