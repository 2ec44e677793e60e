use thiserror::Error;

/// Errors raised by bounds-checked reads over the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    /// Requested range exceeds the buffer
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },
}

/// Errors that can occur while sniffing the header or walking the IFD tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiffError {
    /// Read outside the buffer
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Byte order marker is neither II nor MM
    #[error("Invalid byte order marker: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// Magic value is not in the allow-list
    #[error("Not a TIFF file: unrecognized magic 0x{0:04X}")]
    InvalidMagic(u16),

    /// Buffer is too small to contain a header
    #[error("File too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: u64, actual: u64 },

    /// IFD offset points outside the buffer
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u64),

    /// Entry table or next-IFD pointer runs past the end of the buffer
    #[error("Truncated IFD at offset {offset}: {entries} entries do not fit in the buffer")]
    TruncatedIfd { offset: u64, entries: u16 },

    /// Entry declares a field type outside TIFF 6.0
    #[error("Unknown field type {field_type} for tag {tag}")]
    UnknownFieldType { tag: u16, field_type: u16 },

    /// Out-of-line value runs past the end of the buffer
    #[error("Truncated value for tag {tag}: {size} bytes at offset {offset}")]
    TruncatedValue { tag: u16, offset: u64, size: u64 },

    /// The same IFD offset was reached twice
    #[error("IFD at offset {0} is referenced more than once")]
    IfdCycle(u64),

    /// More IFDs than the configured limit
    #[error("Too many IFDs: limit is {0}")]
    TooManyIfds(usize),

    /// Sub-IFD nesting deeper than the configured limit
    #[error("Sub-IFD nesting too deep: limit is {0}")]
    SubIfdTooDeep(usize),

    /// Tag has unexpected type or count
    #[error("Invalid tag value for {tag}: {message}")]
    InvalidTagValue { tag: u16, message: String },
}

impl TiffError {
    /// Whether this error was raised while validating the container header.
    pub const fn is_container_error(&self) -> bool {
        matches!(
            self,
            TiffError::InvalidByteOrder(_) | TiffError::InvalidMagic(_) | TiffError::FileTooSmall { .. }
        )
    }
}

/// Errors raised by a decoder variant while validating the tree it was handed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderError {
    /// Required tag is missing from the tree
    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),

    /// The file is recognized but not supported by this variant
    #[error("{0}")]
    Unsupported(String),

    /// Tag value could not be decoded
    #[error(transparent)]
    Tiff(#[from] TiffError),
}

/// Coarse classification of a [`ProbeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedContainer,
    MalformedDirectory,
    NoDecoderMatched,
    DecoderConstructionFailed,
}

/// The single error type returned by the probing pipeline.
///
/// Every internal failure (header, tree walk, dispatch, decoder validation)
/// is translated into one of these four kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Header absent, unreadable, or magic not recognized
    #[error("Malformed container: {message}")]
    MalformedContainer { message: String },

    /// Offset, entry count, or entry layout outside the buffer
    #[error("Malformed directory: {message}")]
    MalformedDirectory { message: String },

    /// Tree parsed but no routing rule applied
    #[error("No decoder found for this file")]
    NoDecoderMatched,

    /// The selected decoder rejected the file
    #[error("{decoder} decoder rejected the file: {message}")]
    DecoderConstruction {
        decoder: &'static str,
        message: String,
    },
}

impl ProbeError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::MalformedContainer { .. } => ErrorKind::MalformedContainer,
            ProbeError::MalformedDirectory { .. } => ErrorKind::MalformedDirectory,
            ProbeError::NoDecoderMatched => ErrorKind::NoDecoderMatched,
            ProbeError::DecoderConstruction { .. } => ErrorKind::DecoderConstructionFailed,
        }
    }

    /// Pipeline stage that produced the error.
    pub const fn stage(&self) -> &'static str {
        match self {
            ProbeError::MalformedContainer { .. } => "container",
            ProbeError::MalformedDirectory { .. } => "directory",
            ProbeError::NoDecoderMatched => "dispatch",
            ProbeError::DecoderConstruction { .. } => "decoder",
        }
    }

    /// Wrap a variant's own failure, keeping its message.
    pub fn decoder_construction(decoder: &'static str, err: DecoderError) -> Self {
        ProbeError::DecoderConstruction {
            decoder,
            message: err.to_string(),
        }
    }
}

impl From<TiffError> for ProbeError {
    fn from(err: TiffError) -> Self {
        let message = err.to_string();
        if err.is_container_error() {
            ProbeError::MalformedContainer { message }
        } else {
            ProbeError::MalformedDirectory { message }
        }
    }
}

impl From<IoError> for ProbeError {
    fn from(err: IoError) -> Self {
        TiffError::from(err).into()
    }
}
