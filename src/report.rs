//! Per-file probe reports for the command-line tool.
//!
//! A report is serialized as one JSON object per file with `--json`, or
//! rendered as a short text block otherwise.

use serde::Serialize;

use crate::error::{ErrorKind, ProbeError};
use crate::format::decoder::RawDecoder;
use crate::format::detect::DecoderKind;
use crate::format::tiff::{ByteOrder, FieldType, Ifd, IfdEntry, TiffMagic, TiffRootIfd, TiffTag};

// =============================================================================
// Report Types
// =============================================================================

/// Outcome of probing one file.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    /// Path as given on the command line
    pub file: String,

    /// Selected decoder variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoder: Option<DecoderKind>,

    /// Usual extension for the selected variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<ByteOrder>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic: Option<TiffMagic>,

    /// Number of IFDs in the tree, sub-IFDs included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifd_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

/// Why a file could not be probed.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    /// Error category; absent when the file could not be read at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,

    /// Pipeline stage that failed ("read" for file access errors)
    pub stage: &'static str,

    /// Human-readable error message
    pub message: String,
}

impl ProbeReport {
    fn empty(file: &str) -> Self {
        Self {
            file: file.to_string(),
            decoder: None,
            extension: None,
            byte_order: None,
            magic: None,
            ifd_count: None,
            make: None,
            model: None,
            error: None,
        }
    }

    /// Report for a file a decoder accepted.
    ///
    /// Camera identity is best-effort; a file can route by Software alone.
    pub fn success(file: &str, decoder: &RawDecoder<'_>) -> Self {
        let root = decoder.root();
        let kind = decoder.kind();
        let id = decoder.identify().ok();

        Self {
            decoder: Some(kind),
            extension: Some(kind.extension()),
            byte_order: Some(root.byte_order()),
            magic: Some(root.magic()),
            ifd_count: Some(root.total_ifd_count()),
            make: id.as_ref().map(|id| id.make.clone()),
            model: id.map(|id| id.model),
            ..Self::empty(file)
        }
    }

    /// Report for a file the pipeline rejected.
    pub fn failure(file: &str, err: &ProbeError) -> Self {
        Self {
            error: Some(ErrorReport {
                kind: Some(err.kind()),
                stage: err.stage(),
                message: err.to_string(),
            }),
            ..Self::empty(file)
        }
    }

    /// Report for a file that could not be read.
    pub fn unreadable(file: &str, err: &std::io::Error) -> Self {
        Self {
            error: Some(ErrorReport {
                kind: None,
                stage: "read",
                message: err.to_string(),
            }),
            ..Self::empty(file)
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Render as indented text lines.
    pub fn render_text(&self) -> String {
        let mut lines = vec![self.file.clone()];

        if let Some(ref error) = self.error {
            lines.push(format!("  error ({}): {}", error.stage, error.message));
        } else {
            if let Some(kind) = self.decoder {
                lines.push(format!("  decoder:    {} (.{})", kind.name(), kind.extension()));
            }
            if let Some(byte_order) = self.byte_order {
                lines.push(format!("  byte order: {:?}", byte_order));
            }
            if let Some(magic) = self.magic {
                lines.push(format!("  magic:      0x{:04X}", magic.as_u16()));
            }
            if let Some(count) = self.ifd_count {
                lines.push(format!("  IFDs:       {}", count));
            }
            if let Some(ref make) = self.make {
                lines.push(format!("  make:       {}", make));
            }
            if let Some(ref model) = self.model {
                lines.push(format!("  model:      {}", model));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

// =============================================================================
// Tree Dump
// =============================================================================

/// Longest string value shown inline in a tree dump.
const MAX_PREVIEW_CHARS: usize = 40;

/// Most numeric elements shown inline in a tree dump.
const MAX_PREVIEW_VALUES: usize = 4;

/// Render the directory tree, one line per IFD and per entry.
pub fn render_tree(root: &TiffRootIfd<'_>) -> String {
    let mut out = String::new();
    for (index, ifd) in root.ifds().iter().enumerate() {
        write_ifd(&mut out, &format!("IFD{}", index), ifd, 1);
    }
    out
}

fn write_ifd(out: &mut String, label: &str, ifd: &Ifd<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{} @ {} ({} entries)\n",
        indent,
        label,
        ifd.offset(),
        ifd.entries().len()
    ));

    for entry in ifd.entries() {
        let name = match entry.known_tag() {
            Some(tag) => tag.name().to_string(),
            None => format!("0x{:04X}", entry.tag),
        };
        out.push_str(&format!(
            "{}  {} {:?}[{}]{}\n",
            indent,
            name,
            entry.field_type,
            entry.count,
            preview(entry)
        ));
    }

    for (index, child) in ifd.sub_ifds().iter().enumerate() {
        write_ifd(out, &format!("SubIFD{}", index), child, depth + 1);
    }
}

fn preview(entry: &IfdEntry<'_>) -> String {
    match entry.field_type {
        FieldType::Ascii => match entry.get_trimmed_string() {
            Ok(s) if s.chars().count() > MAX_PREVIEW_CHARS => {
                let head: String = s.chars().take(MAX_PREVIEW_CHARS).collect();
                format!(" = {:?}...", head)
            }
            Ok(s) => format!(" = {:?}", s),
            Err(_) => String::new(),
        },
        FieldType::Short | FieldType::Long | FieldType::Ifd => {
            let shown = (entry.count as usize).min(MAX_PREVIEW_VALUES);
            let values: Vec<String> = (0..shown)
                .filter_map(|i| entry.get_u32(i).ok())
                .map(|v| v.to_string())
                .collect();
            let more = if (entry.count as usize) > shown { ", ..." } else { "" };
            format!(" = [{}{}]", values.join(", "), more)
        }
        FieldType::Byte if entry.tag == TiffTag::DngVersion.as_u16() => {
            let values: Vec<String> = entry.get_data().iter().map(|b| b.to_string()).collect();
            format!(" = {}", values.join("."))
        }
        _ => String::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================
