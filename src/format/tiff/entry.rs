//! IFD entry parsing.
//!
//! Each classic TIFF entry is 12 bytes:
//!
//! ```text
//! Bytes 0-1:  Tag
//! Bytes 2-3:  Field type
//! Bytes 4-7:  Count (number of values, not bytes)
//! Bytes 8-11: Value if it fits in 4 bytes, otherwise offset to the value
//! ```

use crate::error::TiffError;
use crate::io::{checked_slice, ByteCursor, ByteOrder};

use super::tags::{FieldType, TiffTag};

/// Size of an IFD entry in bytes.
pub const IFD_ENTRY_SIZE: u64 = 12;

/// One tagged entry of an IFD.
///
/// The value is not decoded at parse time; `data` is a view of the value
/// bytes in the buffer, already bounds-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfdEntry<'a> {
    /// Tag ID
    pub tag: u16,

    /// Field type (determines element size and interpretation)
    pub field_type: FieldType,

    /// Number of values
    pub count: u32,

    /// Position of the value bytes in the buffer. For inline values this is
    /// the entry's own value field.
    pub data_offset: u64,

    pub(super) data: &'a [u8],
    pub(super) byte_order: ByteOrder,
}

impl<'a> IfdEntry<'a> {
    /// Parse one entry at the cursor position and advance past it.
    ///
    /// Fails if the field type is unknown or the value bytes leave the
    /// buffer.
    pub fn parse(cursor: &mut ByteCursor<'a>) -> Result<Self, TiffError> {
        let tag = cursor.read_u16()?;
        let raw_type = cursor.read_u16()?;
        let count = cursor.read_u32()?;
        let value_field_pos = cursor.position() as u64;
        let value_or_offset = cursor.read_u32()?;

        let field_type = FieldType::from_u16(raw_type).ok_or(TiffError::UnknownFieldType {
            tag,
            field_type: raw_type,
        })?;

        let size = field_type.value_size(count);
        let data_offset = if field_type.fits_inline(count) {
            value_field_pos
        } else {
            value_or_offset as u64
        };

        let data = checked_slice(cursor.data(), data_offset, size).map_err(|_| {
            TiffError::TruncatedValue {
                tag,
                offset: data_offset,
                size,
            }
        })?;

        Ok(IfdEntry {
            tag,
            field_type,
            count,
            data_offset,
            data,
            byte_order: cursor.byte_order(),
        })
    }

    /// The named tag, if this crate knows it.
    #[inline]
    pub fn known_tag(&self) -> Option<TiffTag> {
        TiffTag::from_u16(self.tag)
    }

    /// Whether the value was stored inline in the entry.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.field_type.fits_inline(self.count)
    }

    /// Total size of the value in bytes.
    #[inline]
    pub fn value_byte_size(&self) -> u64 {
        self.field_type.value_size(self.count)
    }

    /// Byte order the value must be read with.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}
