//! # Error Module
//!
//! Error types for the HDR bracket finder.
//!
//! ## Failure Classes
//! - **Traversal** (`ScanError`) - the file walk cannot continue; the scan aborts
//! - **Extraction** (`MetadataError::Open` / `MetadataError::Decode`) - one file
//!   could not be decoded; the scan skips it and carries on
//! - **Metadata read** (`MetadataError::Read`) - an image already in the
//!   window has unreadable metadata; the scan aborts
//! - **Output** (`LinkError`) - hard-linking a match failed
//! - **Configuration** (`ConfigError`) - invalid bracket sizes or type mappings

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum HdrFinderError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that occur while walking the directory tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while extracting or reading image metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to open image file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode metadata from {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Metadata field {field} is missing")]
    MissingField { field: &'static str },

    #[error("Failed to read metadata of {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: Box<MetadataError>,
    },
}

impl MetadataError {
    /// True for failures that happen while decoding a file, as opposed to
    /// reading a field from metadata that was already decoded.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, MetadataError::Open { .. } | MetadataError::Decode { .. })
    }
}

/// Errors that occur while linking matched images into the output directory
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to link {from} to {to}: {source}")]
    Link {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors in user-supplied configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid bracket size: min {min}, max {max} (need 1 <= min <= max)")]
    InvalidBracketSize { min: usize, max: usize },

    #[error("Invalid type mapping '{raw}' (expected EXT=TYPE/SUBTYPE, e.g. cr2=image/x-canon-cr2)")]
    InvalidTypeMapping { raw: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, HdrFinderError>;
