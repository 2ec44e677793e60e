//! Test utilities for integration tests.
//!
//! Provides a builder for classic TIFF files with chained IFDs, nested
//! sub-IFDs and arbitrary raw entries, plus helpers for corrupting the
//! result.

use rawprobe::ByteOrder;

// =============================================================================
// Entry Values
// =============================================================================

const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;

pub const TAG_MAKE: u16 = 271;
pub const TAG_MODEL: u16 = 272;
pub const TAG_SOFTWARE: u16 = 305;
pub const TAG_SUB_IFDS: u16 = 330;
pub const TAG_EXIF_IFD: u16 = 34665;
pub const TAG_DNG_VERSION: u16 = 50706;

enum Value {
    Bytes { field_type: u16, bytes: Vec<u8> },
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    /// Written as-is: the 4-byte field is never treated as an offset by the builder
    Raw { field_type: u16, count: u32, value: u32 },
}

struct EntrySpec {
    tag: u16,
    value: Value,
}

// =============================================================================
// IFD Builder
// =============================================================================

/// One IFD to be written, with its children.
#[derive(Default)]
pub struct IfdBuilder {
    entries: Vec<EntrySpec>,
    sub_ifds: Vec<IfdBuilder>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// ASCII entry, NUL terminator appended.
    pub fn ascii(mut self, tag: u16, value: &str) -> Self {
        let mut bytes = value.as_bytes().to_vec();
        bytes.push(0);
        self.entries.push(EntrySpec {
            tag,
            value: Value::Bytes {
                field_type: TYPE_ASCII,
                bytes,
            },
        });
        self
    }

    pub fn bytes(mut self, tag: u16, bytes: &[u8]) -> Self {
        self.entries.push(EntrySpec {
            tag,
            value: Value::Bytes {
                field_type: TYPE_BYTE,
                bytes: bytes.to_vec(),
            },
        });
        self
    }

    pub fn short(mut self, tag: u16, values: &[u16]) -> Self {
        self.entries.push(EntrySpec {
            tag,
            value: Value::Shorts(values.to_vec()),
        });
        self
    }

    pub fn long(mut self, tag: u16, values: &[u32]) -> Self {
        self.entries.push(EntrySpec {
            tag,
            value: Value::Longs(values.to_vec()),
        });
        self
    }

    /// Entry with a verbatim type, count and value field.
    pub fn raw(mut self, tag: u16, field_type: u16, count: u32, value: u32) -> Self {
        self.entries.push(EntrySpec {
            tag,
            value: Value::Raw {
                field_type,
                count,
                value,
            },
        });
        self
    }

    pub fn make(self, make: &str) -> Self {
        self.ascii(TAG_MAKE, make)
    }

    pub fn model(self, model: &str) -> Self {
        self.ascii(TAG_MODEL, model)
    }

    pub fn software(self, software: &str) -> Self {
        self.ascii(TAG_SOFTWARE, software)
    }

    pub fn dng_version(self, version: [u8; 4]) -> Self {
        self.bytes(TAG_DNG_VERSION, &version)
    }

    /// Child IFD, referenced from a SubIFDs entry written after the others.
    pub fn sub_ifd(mut self, child: IfdBuilder) -> Self {
        self.sub_ifds.push(child);
        self
    }
}

// =============================================================================
// TIFF Builder
// =============================================================================

/// Where things ended up in a built file.
#[derive(Debug, Default)]
pub struct TiffLayout {
    /// Offset of each top-level IFD
    pub ifd_offsets: Vec<u32>,

    /// Position of each top-level IFD's next-IFD pointer
    pub next_pointer_positions: Vec<usize>,
}

pub struct TiffBuilder {
    byte_order: ByteOrder,
    magic: u16,
    ifds: Vec<IfdBuilder>,
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
            magic: 42,
            ifds: Vec::new(),
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_magic(mut self, magic: u16) -> Self {
        self.magic = magic;
        self
    }

    pub fn add_ifd(mut self, ifd: IfdBuilder) -> Self {
        self.ifds.push(ifd);
        self
    }

    /// Build the TIFF file data.
    pub fn build(&self) -> Vec<u8> {
        self.build_with_layout().0
    }

    pub fn build_with_layout(&self) -> (Vec<u8>, TiffLayout) {
        let mut data = match self.byte_order {
            ByteOrder::LittleEndian => b"II".to_vec(),
            ByteOrder::BigEndian => b"MM".to_vec(),
        };
        self.push_u16(&mut data, self.magic);
        self.push_u32(&mut data, 0);

        let mut layout = TiffLayout::default();
        for ifd in &self.ifds {
            let (offset, next_pos) = self.write_ifd(&mut data, ifd);
            layout.ifd_offsets.push(offset);
            layout.next_pointer_positions.push(next_pos);
        }

        if let Some(&first) = layout.ifd_offsets.first() {
            self.patch_u32(&mut data, 4, first);
        }
        for (i, &pos) in layout.next_pointer_positions.iter().enumerate() {
            let next = layout.ifd_offsets.get(i + 1).copied().unwrap_or(0);
            self.patch_u32(&mut data, pos, next);
        }

        (data, layout)
    }

    /// Write one IFD and everything it references; returns its offset and
    /// the position of its next pointer.
    fn write_ifd(&self, data: &mut Vec<u8>, ifd: &IfdBuilder) -> (u32, usize) {
        align(data);
        let offset = data.len();
        let entry_count = ifd.entries.len() + usize::from(!ifd.sub_ifds.is_empty());

        self.push_u16(data, entry_count as u16);
        data.resize(data.len() + entry_count * 12 + 4, 0);
        let next_pos = offset + 2 + entry_count * 12;

        for (i, spec) in ifd.entries.iter().enumerate() {
            let (field_type, count, field) = match &spec.value {
                Value::Bytes { field_type, bytes } => {
                    (*field_type, bytes.len() as u32, self.place(data, bytes))
                }
                Value::Shorts(values) => {
                    let mut bytes = Vec::new();
                    for &v in values {
                        self.push_u16(&mut bytes, v);
                    }
                    (TYPE_SHORT, values.len() as u32, self.place(data, &bytes))
                }
                Value::Longs(values) => (
                    TYPE_LONG,
                    values.len() as u32,
                    self.place_longs(data, values),
                ),
                Value::Raw {
                    field_type,
                    count,
                    value,
                } => {
                    let mut field = Vec::new();
                    self.push_u32(&mut field, *value);
                    (*field_type, *count, field)
                }
            };
            self.write_entry(data, offset + 2 + i * 12, spec.tag, field_type, count, &field);
        }

        if !ifd.sub_ifds.is_empty() {
            let child_offsets: Vec<u32> = ifd
                .sub_ifds
                .iter()
                .map(|child| self.write_ifd(data, child).0)
                .collect();
            let field = self.place_longs(data, &child_offsets);
            self.write_entry(
                data,
                offset + 2 + ifd.entries.len() * 12,
                TAG_SUB_IFDS,
                TYPE_LONG,
                child_offsets.len() as u32,
                &field,
            );
        }

        (offset as u32, next_pos)
    }

    fn write_entry(
        &self,
        data: &mut [u8],
        pos: usize,
        tag: u16,
        field_type: u16,
        count: u32,
        field: &[u8],
    ) {
        let mut entry = Vec::with_capacity(12);
        self.push_u16(&mut entry, tag);
        self.push_u16(&mut entry, field_type);
        self.push_u32(&mut entry, count);
        entry.extend_from_slice(field);
        data[pos..pos + 12].copy_from_slice(&entry);
    }

    /// Inline values up to 4 bytes; otherwise append them and return the
    /// offset as the 4-byte value field.
    fn place(&self, data: &mut Vec<u8>, bytes: &[u8]) -> Vec<u8> {
        if bytes.len() <= 4 {
            let mut field = bytes.to_vec();
            field.resize(4, 0);
            return field;
        }
        align(data);
        let offset = data.len() as u32;
        data.extend_from_slice(bytes);
        let mut field = Vec::new();
        self.push_u32(&mut field, offset);
        field
    }

    fn place_longs(&self, data: &mut Vec<u8>, values: &[u32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for &v in values {
            self.push_u32(&mut bytes, v);
        }
        self.place(data, &bytes)
    }

    fn push_u16(&self, data: &mut Vec<u8>, value: u16) {
        match self.byte_order {
            ByteOrder::LittleEndian => data.extend(&value.to_le_bytes()),
            ByteOrder::BigEndian => data.extend(&value.to_be_bytes()),
        }
    }

    fn push_u32(&self, data: &mut Vec<u8>, value: u32) {
        match self.byte_order {
            ByteOrder::LittleEndian => data.extend(&value.to_le_bytes()),
            ByteOrder::BigEndian => data.extend(&value.to_be_bytes()),
        }
    }

    fn patch_u32(&self, data: &mut [u8], pos: usize, value: u32) {
        patch_u32(data, pos, value, self.byte_order);
    }
}

impl Default for TiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn align(data: &mut Vec<u8>) {
    if data.len() % 2 == 1 {
        data.push(0);
    }
}

// =============================================================================
// Corruption Helpers
// =============================================================================

/// Overwrite a u32 at `pos` in the given byte order.
pub fn patch_u32(data: &mut [u8], pos: usize, value: u32, order: ByteOrder) {
    let bytes = match order {
        ByteOrder::LittleEndian => value.to_le_bytes(),
        ByteOrder::BigEndian => value.to_be_bytes(),
    };
    data[pos..pos + 4].copy_from_slice(&bytes);
}

/// Single-IFD little-endian file with the given Make and Model.
pub fn camera_file(make: &str, model: &str) -> Vec<u8> {
    TiffBuilder::new()
        .add_ifd(IfdBuilder::new().make(make).model(model))
        .build()
}
