//! TIFF tag value decoding.
//!
//! Entries keep a view of their value bytes; these accessors interpret that
//! view on demand using the entry's field type and the file's byte order.

use crate::error::TiffError;

use super::entry::IfdEntry;
use super::tags::FieldType;

impl<'a> IfdEntry<'a> {
    /// Raw value bytes, borrowed from the buffer.
    #[inline]
    pub fn get_data(&self) -> &'a [u8] {
        self.data
    }

    /// Read element `index` as a u16.
    ///
    /// Accepts BYTE, UNDEFINED and SHORT values.
    pub fn get_u16(&self, index: usize) -> Result<u16, TiffError> {
        self.check_index(index)?;
        match self.field_type {
            FieldType::Byte | FieldType::Undefined => Ok(self.data[index] as u16),
            FieldType::Short => Ok(self.byte_order.read_u16(&self.data[index * 2..])),
            other => Err(self.type_mismatch("BYTE, UNDEFINED or SHORT", other)),
        }
    }

    /// Read element `index` as a u32.
    ///
    /// Accepts BYTE, UNDEFINED, SHORT, LONG and IFD values.
    pub fn get_u32(&self, index: usize) -> Result<u32, TiffError> {
        self.check_index(index)?;
        match self.field_type {
            FieldType::Byte | FieldType::Undefined => Ok(self.data[index] as u32),
            FieldType::Short => Ok(self.byte_order.read_u16(&self.data[index * 2..]) as u32),
            FieldType::Long | FieldType::Ifd => Ok(self.byte_order.read_u32(&self.data[index * 4..])),
            other => Err(self.type_mismatch("BYTE, UNDEFINED, SHORT, LONG or IFD", other)),
        }
    }

    /// Read every element as a u32.
    pub fn get_u32_array(&self) -> Result<Vec<u32>, TiffError> {
        (0..self.count as usize).map(|i| self.get_u32(i)).collect()
    }

    /// Read an ASCII or BYTE value as a string.
    ///
    /// The value ends at the first NUL. Non-UTF-8 bytes are replaced rather
    /// than rejected; vendor strings are not always clean ASCII.
    pub fn get_string(&self) -> Result<String, TiffError> {
        match self.field_type {
            FieldType::Ascii | FieldType::Byte => {
                let end = self
                    .data
                    .iter()
                    .position(|&b| b == 0)
                    .unwrap_or(self.data.len());
                Ok(String::from_utf8_lossy(&self.data[..end]).into_owned())
            }
            other => Err(self.type_mismatch("ASCII or BYTE", other)),
        }
    }

    /// Read a string and strip surrounding padding, see [`trim_spaces`].
    pub fn get_trimmed_string(&self) -> Result<String, TiffError> {
        self.get_string().map(|s| trim_spaces(&s).to_string())
    }

    fn check_index(&self, index: usize) -> Result<(), TiffError> {
        if index < self.count as usize {
            Ok(())
        } else {
            Err(TiffError::InvalidTagValue {
                tag: self.tag,
                message: format!("index {} out of range for count {}", index, self.count),
            })
        }
    }

    fn type_mismatch(&self, expected: &str, got: FieldType) -> TiffError {
        TiffError::InvalidTagValue {
            tag: self.tag,
            message: format!("expected {}, got {:?}", expected, got),
        }
    }
}

/// Strip spaces, tabs and NUL padding from both ends.
///
/// Vendors pad Make and Model to fixed widths with any of these.
pub fn trim_spaces(value: &str) -> &str {
    value.trim_matches(|c| c == ' ' || c == '\t' || c == '\0')
}
