//! # Metadata Module
//!
//! Extracts the EXIF fields bracket detection needs from photo files.
//!
//! ## Extracted Fields
//! - Pixel width (`PixelXDimension`, falling back to `ImageWidth`)
//! - Pixel height (`PixelYDimension`, falling back to `ImageLength`)
//! - Exposure bias (`ExposureBiasValue`), kept as an opaque token
//!
//! Decoding a file and reading a field are separate steps with separate
//! failure modes: a file that cannot be decoded never reaches the detector,
//! but a decoded file may still lack a field, which only surfaces when the
//! detector reads it.

use crate::error::MetadataError;
use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Exposure compensation recorded for a shot, compared only for equality.
///
/// Rationals are rendered as `num/denom` without reducing them, so `-2/1`
/// and `-4/2` are different tokens. Surrounding quotes and whitespace are
/// stripped so `"0/1"` and `0/1` are the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExposureBias(String);

impl ExposureBias {
    /// Normalize a textual bias token
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed);
        Self(unquoted.trim().to_string())
    }

    /// Token for a rational value as stored in EXIF
    pub fn from_rational(num: i64, denom: i64) -> Self {
        Self(format!("{}/{}", num, denom))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExposureBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExposureBias {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Read access to the metadata of one decoded image.
///
/// Every accessor can fail: a decoded file is not guaranteed to carry
/// every field.
pub trait ImageMeta: Send + Sync {
    /// Width in pixels
    fn width(&self) -> Result<u32, MetadataError>;

    /// Height in pixels
    fn height(&self) -> Result<u32, MetadataError>;

    /// Exposure compensation token
    fn exposure_bias(&self) -> Result<ExposureBias, MetadataError>;

    /// `(width, height)`
    fn dimensions(&self) -> Result<(u32, u32), MetadataError> {
        Ok((self.width()?, self.height()?))
    }
}

/// Produces metadata for a file path.
///
/// Implement this trait to feed the detector without real image files
/// (e.g., for testing).
pub trait MetadataExtractor: Send + Sync {
    fn decode(&self, path: &Path) -> Result<Box<dyn ImageMeta>, MetadataError>;
}

/// Fields decoded from a file's EXIF block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExifMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub exposure_bias: Option<ExposureBias>,
}

impl ImageMeta for ExifMetadata {
    fn width(&self) -> Result<u32, MetadataError> {
        self.width.ok_or(MetadataError::MissingField {
            field: "PixelXDimension/ImageWidth",
        })
    }

    fn height(&self) -> Result<u32, MetadataError> {
        self.height.ok_or(MetadataError::MissingField {
            field: "PixelYDimension/ImageLength",
        })
    }

    fn exposure_bias(&self) -> Result<ExposureBias, MetadataError> {
        self.exposure_bias.clone().ok_or(MetadataError::MissingField {
            field: "ExposureBiasValue",
        })
    }
}

/// Extractor backed by kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifExtractor;

impl ExifExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataExtractor for ExifExtractor {
    fn decode(&self, path: &Path) -> Result<Box<dyn ImageMeta>, MetadataError> {
        Ok(Box::new(extract_metadata(path)?))
    }
}

/// Decode the EXIF block of a photo file.
///
/// Fails if the file cannot be opened or has no readable EXIF container.
/// Individual missing fields are left as `None`.
pub fn extract_metadata(path: &Path) -> Result<ExifMetadata, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bufreader = BufReader::new(&file);
    let exif_reader = Reader::new()
        .read_from_container(&mut bufreader)
        .map_err(|e| MetadataError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut metadata = ExifMetadata::default();

    // Prefer actual pixel dimensions
    if let Some(field) = exif_reader.get_field(Tag::PixelXDimension, In::PRIMARY) {
        metadata.width = get_u32_value(&field.value);
    }
    if let Some(field) = exif_reader.get_field(Tag::PixelYDimension, In::PRIMARY) {
        metadata.height = get_u32_value(&field.value);
    }

    if metadata.width.is_none() {
        if let Some(field) = exif_reader.get_field(Tag::ImageWidth, In::PRIMARY) {
            metadata.width = get_u32_value(&field.value);
        }
    }
    if metadata.height.is_none() {
        if let Some(field) = exif_reader.get_field(Tag::ImageLength, In::PRIMARY) {
            metadata.height = get_u32_value(&field.value);
        }
    }

    if let Some(field) = exif_reader.get_field(Tag::ExposureBiasValue, In::PRIMARY) {
        metadata.exposure_bias = get_bias_value(&field.value);
    }

    Ok(metadata)
}

fn get_u32_value(value: &Value) -> Option<u32> {
    match value {
        Value::Long(vec) => vec.first().copied(),
        Value::Short(vec) => vec.first().map(|v| *v as u32),
        _ => None,
    }
}

/// ExposureBiasValue is an SRATIONAL; some writers store other types.
fn get_bias_value(value: &Value) -> Option<ExposureBias> {
    match value {
        Value::SRational(vec) => vec
            .first()
            .map(|r| ExposureBias::from_rational(r.num as i64, r.denom as i64)),
        Value::Rational(vec) => vec
            .first()
            .map(|r| ExposureBias::from_rational(r.num as i64, r.denom as i64)),
        Value::Ascii(vec) => vec
            .first()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .map(|s| s.trim_end_matches('\0'))
            .filter(|s| !s.trim().is_empty())
            .map(ExposureBias::new),
        _ => None,
    }
}
