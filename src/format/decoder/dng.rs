//! Adobe DNG.
//!
//! DNG is recognized structurally, by a DNGVersion tag anywhere in the
//! tree, before any vendor string is looked at. Only major version 1 exists.

use tracing::debug;

use crate::error::DecoderError;
use crate::format::detect::DecoderKind;
use crate::format::tiff::{TiffRootIfd, TiffTag};

use super::{CameraId, Decoder};

/// Decoder for Adobe Digital Negative files.
#[derive(Debug)]
pub struct DngDecoder<'a> {
    root: TiffRootIfd<'a>,
    data: &'a [u8],
    version: [u8; 4],
}

impl<'a> DngDecoder<'a> {
    /// Take ownership of `root` after checking its DNGVersion.
    pub fn new(root: TiffRootIfd<'a>, data: &'a [u8]) -> Result<Self, DecoderError> {
        let entry = root
            .entry_recursive(TiffTag::DngVersion)
            .ok_or(DecoderError::MissingTag("DNGVersion"))?;

        let bytes = entry.get_data();
        if bytes.len() < 4 {
            return Err(DecoderError::Unsupported(format!(
                "DNGVersion holds {} bytes, expected 4",
                bytes.len()
            )));
        }
        let version = [bytes[0], bytes[1], bytes[2], bytes[3]];

        if version[0] != 1 {
            return Err(DecoderError::Unsupported(format!(
                "Not a supported DNG image format: v{}.{}.{}.{}",
                version[0], version[1], version[2], version[3]
            )));
        }

        debug!(
            "DNG version {}.{}.{}.{}",
            version[0], version[1], version[2], version[3]
        );

        Ok(Self {
            root,
            data,
            version,
        })
    }

    /// The four DNGVersion bytes, major first.
    pub fn version(&self) -> [u8; 4] {
        self.version
    }
}

impl<'a> Decoder<'a> for DngDecoder<'a> {
    fn kind(&self) -> DecoderKind {
        DecoderKind::Dng
    }

    fn root(&self) -> &TiffRootIfd<'a> {
        &self.root
    }

    fn buffer(&self) -> &'a [u8] {
        self.data
    }

    fn into_root(self) -> TiffRootIfd<'a> {
        self.root
    }

    /// DNG converters may drop Make/Model; UniqueCameraModel names the
    /// camera in that case.
    fn identify(&self) -> Result<CameraId, DecoderError> {
        match CameraId::from_root(&self.root) {
            Err(DecoderError::MissingTag(_)) => {
                let model = self
                    .root
                    .entry_recursive(TiffTag::UniqueCameraModel)
                    .ok_or(DecoderError::MissingTag("UniqueCameraModel"))?
                    .get_trimmed_string()?;
                Ok(CameraId {
                    make: String::new(),
                    model,
                })
            }
            other => other,
        }
    }
}
