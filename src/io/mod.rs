//! Byte-level access to in-memory file buffers.

mod cursor;

pub use cursor::{
    checked_slice, read_u16_be, read_u16_le, read_u32_be, read_u32_le, ByteCursor, ByteOrder,
};
