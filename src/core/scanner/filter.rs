//! Extension to content-type table used to tell images from everything else.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Mappings every table starts with
const DEFAULT_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpe", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("xml", "text/xml"),
    ("xmp", "application/rdf+xml"),
    ("mov", "video/quicktime"),
    ("mp4", "video/mp4"),
];

/// Camera raw formats, which system type tables usually lack.
/// See https://bugs.freedesktop.org/show_bug.cgi?id=8170
const RAW_TYPES: &[(&str, &str)] = &[
    ("crw", "image/x-canon-crw"),
    ("cr2", "image/x-canon-cr2"),
    ("cr3", "image/x-canon-cr3"),
    ("nef", "image/x-nikon-nef"),
    ("nrw", "image/x-nikon-nrw"),
    ("arw", "image/x-sony-arw"),
    ("srf", "image/x-sony-srf"),
    ("sr2", "image/x-sony-sr2"),
    ("orf", "image/x-olympus-orf"),
    ("rw2", "image/x-panasonic-rw2"),
    ("raf", "image/x-fuji-raf"),
    ("pef", "image/x-pentax-pef"),
    ("dng", "image/x-adobe-dng"),
    ("srw", "image/x-samsung-srw"),
    ("x3f", "image/x-sigma-x3f"),
];

/// Maps file extensions to content types.
///
/// Lookups ignore case and a leading dot. A file is an image when its
/// content type starts with `image/`; unknown extensions are not images.
#[derive(Debug, Clone)]
pub struct ImageTypes {
    types: HashMap<String, String>,
}

impl ImageTypes {
    /// Table with the standard image types plus camera raw formats
    pub fn new() -> Self {
        let mut table = Self::empty();
        for (ext, content_type) in DEFAULT_TYPES.iter().chain(RAW_TYPES) {
            table.register(ext, content_type);
        }
        table
    }

    /// Table with no mappings at all
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Add or replace the mapping for `ext`
    pub fn register(&mut self, ext: &str, content_type: &str) -> &mut Self {
        self.types
            .insert(normalize_extension(ext), content_type.to_ascii_lowercase());
        self
    }

    /// Builder-style `register`
    pub fn with(mut self, ext: &str, content_type: &str) -> Self {
        self.register(ext, content_type);
        self
    }

    /// Register a mapping written as `EXT=TYPE/SUBTYPE`
    pub fn register_spec(&mut self, spec: &str) -> Result<&mut Self, ConfigError> {
        let invalid = || ConfigError::InvalidTypeMapping {
            raw: spec.to_string(),
        };
        let (ext, content_type) = spec.split_once('=').ok_or_else(invalid)?;
        let (ext, content_type) = (ext.trim(), content_type.trim());
        if normalize_extension(ext).is_empty() || !content_type.contains('/') {
            return Err(invalid());
        }
        Ok(self.register(ext, content_type))
    }

    /// Content type registered for the extension of `path`
    pub fn content_type(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?;
        self.types
            .get(&normalize_extension(ext))
            .map(String::as_str)
    }

    /// Whether `path` has an image extension
    pub fn is_image(&self, path: &Path) -> bool {
        self.content_type(path)
            .map(|t| t.starts_with("image/"))
            .unwrap_or(false)
    }

    /// Number of registered extensions
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for ImageTypes {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
