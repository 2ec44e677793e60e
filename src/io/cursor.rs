use serde::Serialize;

use crate::error::IoError;

// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// TIFF files can be either little-endian or big-endian, determined by the
// marker bytes at the start of the file. Callers must pass slices of the
// right length; `ByteCursor` does the bounds checking.

/// Read a little-endian u16 from the first 2 bytes of a slice.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Read a big-endian u16 from the first 2 bytes of a slice.
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Read a little-endian u32 from the first 4 bytes of a slice.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Read a big-endian u32 from the first 4 bytes of a slice.
#[inline]
pub fn read_u32_be(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF file.
///
/// Declared by the first two bytes of the header and applied to every
/// multi-byte value that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 from a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }
}

// =============================================================================
// Bounds Checking
// =============================================================================

/// Borrow `len` bytes at `offset`, failing if the range leaves `data`.
///
/// Offsets come straight from the file, so the end is computed with
/// overflow checks in u64.
pub fn checked_slice(data: &[u8], offset: u64, len: u64) -> Result<&[u8], IoError> {
    let size = data.len() as u64;
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= size)
        .ok_or(IoError::RangeOutOfBounds {
            offset,
            requested: len,
            size,
        })?;
    Ok(&data[offset as usize..end as usize])
}

// =============================================================================
// ByteCursor
// =============================================================================

/// A position and byte order over a borrowed buffer.
///
/// Every read is bounds-checked and advances the position only on success.
/// Cursors are `Copy`, so any number of independent readers may walk the
/// same buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    byte_order: ByteOrder,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self {
            data,
            pos: 0,
            byte_order,
        }
    }

    /// Create a cursor positioned at `pos`, which may equal the buffer length.
    pub fn at(data: &'a [u8], pos: u64, byte_order: ByteOrder) -> Result<Self, IoError> {
        let mut cursor = Self::new(data, byte_order);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    /// The whole underlying buffer.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline]
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    /// Move to an absolute position.
    pub fn seek(&mut self, pos: u64) -> Result<(), IoError> {
        checked_slice(self.data, pos, 0)?;
        self.pos = pos as usize;
        Ok(())
    }

    /// Advance by `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<(), IoError> {
        self.read_bytes(len).map(|_| ())
    }

    /// Borrow the next `len` bytes without advancing.
    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8], IoError> {
        checked_slice(self.data, self.pos as u64, len as u64)
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], IoError> {
        let bytes = self.peek_bytes(len)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, IoError> {
        let bytes = self.read_bytes(2)?;
        Ok(self.byte_order.read_u16(bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32, IoError> {
        let bytes = self.read_bytes(4)?;
        Ok(self.byte_order.read_u32(bytes))
    }
}
