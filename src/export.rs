//! PNG and ICO downloads.

use std::fmt;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;
use crate::ico::encode_ico_image;
use crate::icon::{MAX_ICON_SIZE, MIN_ICON_SIZE, RasterImage};

/// Output container of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExportFormat {
    Png,
    Ico,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Ico => "ico",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Ico => "image/x-icon",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "ico" => Ok(Self::Ico),
            other => Err(format!("unknown export format {other:?}, expected png or ico")),
        }
    }
}

/// An encoded file ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Builds `{name}_{size}x{size}.{ext}`, using `icon` for a blank name.
///
/// ```
/// use iconmaker::{file_name, ExportFormat};
///
/// assert_eq!(file_name("logo", 256, ExportFormat::Png), "logo_256x256.png");
/// assert_eq!(file_name("  ", 32, ExportFormat::Ico), "icon_32x32.ico");
/// ```
pub fn file_name(name: &str, size: u32, format: ExportFormat) -> String {
    let name = match name.trim() {
        "" => "icon",
        trimmed => trimmed,
    };
    format!("{name}_{size}x{size}.{}", format.extension())
}

/// Resamples `raster` to `size` and encodes it.
///
/// `size` must lie in `MIN_ICON_SIZE..=MAX_ICON_SIZE`; 0 is reported as
/// [`EncodeError::EmptyImage`]. Nothing is returned unless encoding fully succeeded, so callers never
/// write a partial file.
pub fn export(
    raster: &RasterImage,
    size: u32,
    name: &str,
    format: ExportFormat,
) -> Result<Export, EncodeError> {
    if size == 0 {
        return Err(EncodeError::EmptyImage);
    }
    if !(MIN_ICON_SIZE..=MAX_ICON_SIZE).contains(&size) {
        return Err(EncodeError::SizeOutOfRange {
            size,
            min: MIN_ICON_SIZE,
            max: MAX_ICON_SIZE,
        });
    }
    let resized = raster.resized(size);
    let bytes = match format {
        ExportFormat::Png => resized.to_png()?,
        ExportFormat::Ico => encode_ico_image(&resized)?,
    };
    let export = Export {
        file_name: file_name(name, size, format),
        mime_type: format.mime_type(),
        bytes,
    };
    info!("exported {} ({} bytes)", export.file_name, export.bytes.len());
    Ok(export)
}
