//! TIFF tag and field type definitions.
//!
//! Only the tags needed to build the directory tree and route a file to a
//! decoder are named here. Every other tag is kept as a raw `u16`.

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF 6.0 field types.
///
/// The element size decides whether a value is stored inline in the 4-byte
/// value field of an entry or at an offset elsewhere in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FieldType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    /// 32-bit IFD offset (TIFF technical note 1)
    Ifd = 13,
}

impl FieldType {
    /// Maximum bytes stored inline in a classic TIFF entry.
    pub const INLINE_THRESHOLD: u64 = 4;

    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float | FieldType::Ifd => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for values outside TIFF 6.0.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            13 => Some(FieldType::Ifd),
            _ => None,
        }
    }

    /// Total size of `count` values. Never overflows: 8 * u32::MAX fits in u64.
    #[inline]
    pub const fn value_size(self, count: u32) -> u64 {
        self.size_in_bytes() as u64 * count as u64
    }

    /// Check if `count` values of this type fit in the inline value field.
    #[inline]
    pub const fn fits_inline(self, count: u32) -> bool {
        self.value_size(count) <= Self::INLINE_THRESHOLD
    }
}

// =============================================================================
// TIFF Tags
// =============================================================================

/// Tag IDs used for tree construction and decoder routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TiffTag {
    // -------------------------------------------------------------------------
    // Basic Image Structure
    // -------------------------------------------------------------------------
    NewSubfileType = 254,
    ImageWidth = 256,
    ImageLength = 257,
    BitsPerSample = 258,
    Compression = 259,
    StripOffsets = 273,
    StripByteCounts = 279,

    // -------------------------------------------------------------------------
    // Routing
    // -------------------------------------------------------------------------
    /// Camera manufacturer
    Make = 271,

    /// Camera model
    Model = 272,

    /// Software that wrote the file; the only marker on some Leaf backs
    Software = 305,

    /// Present in every DNG, in any IFD
    DngVersion = 50706,

    /// Camera name in DNG files that lack Make/Model
    UniqueCameraModel = 50708,

    // -------------------------------------------------------------------------
    // Sub-IFD pointers
    // -------------------------------------------------------------------------
    /// Offsets of child IFDs (TIFF technical note 1)
    SubIfds = 330,

    /// Offset of the Exif IFD
    ExifIfdPointer = 34665,

    /// Offset of the GPS IFD
    GpsInfoIfdPointer = 34853,
}

impl TiffTag {
    /// Create a TiffTag from its numeric value.
    ///
    /// Returns `None` for tags this crate does not name. Unknown tags are
    /// not an error; they are kept as raw entries.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            254 => Some(TiffTag::NewSubfileType),
            256 => Some(TiffTag::ImageWidth),
            257 => Some(TiffTag::ImageLength),
            258 => Some(TiffTag::BitsPerSample),
            259 => Some(TiffTag::Compression),
            271 => Some(TiffTag::Make),
            272 => Some(TiffTag::Model),
            273 => Some(TiffTag::StripOffsets),
            279 => Some(TiffTag::StripByteCounts),
            305 => Some(TiffTag::Software),
            330 => Some(TiffTag::SubIfds),
            34665 => Some(TiffTag::ExifIfdPointer),
            34853 => Some(TiffTag::GpsInfoIfdPointer),
            50706 => Some(TiffTag::DngVersion),
            50708 => Some(TiffTag::UniqueCameraModel),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether entries with this tag hold offsets of child IFDs.
    #[inline]
    pub const fn is_sub_ifd_pointer(self) -> bool {
        matches!(
            self,
            TiffTag::SubIfds | TiffTag::ExifIfdPointer | TiffTag::GpsInfoIfdPointer
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            TiffTag::NewSubfileType => "NewSubfileType",
            TiffTag::ImageWidth => "ImageWidth",
            TiffTag::ImageLength => "ImageLength",
            TiffTag::BitsPerSample => "BitsPerSample",
            TiffTag::Compression => "Compression",
            TiffTag::StripOffsets => "StripOffsets",
            TiffTag::StripByteCounts => "StripByteCounts",
            TiffTag::Make => "Make",
            TiffTag::Model => "Model",
            TiffTag::Software => "Software",
            TiffTag::DngVersion => "DNGVersion",
            TiffTag::UniqueCameraModel => "UniqueCameraModel",
            TiffTag::SubIfds => "SubIFDs",
            TiffTag::ExifIfdPointer => "ExifIFDPointer",
            TiffTag::GpsInfoIfdPointer => "GPSInfoIFDPointer",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
