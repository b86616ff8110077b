//! # Scanner Module
//!
//! Produces the ordered stream of files the detector looks at.
//!
//! Directories are part of the stream; the finder skips them itself so a
//! file finder never has to know which files matter. Whether a file is an
//! image is decided by [`ImageTypes`], an explicit table passed to the
//! finder rather than process-wide state.
//!
//! ## Example
//! ```rust,ignore
//! use hdr_finder::core::scanner::{FileFinder, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new("/Users/me/Pictures", ScanConfig::default());
//! for entry in scanner.entries() {
//!     println!("{}", entry?.path.display());
//! }
//! ```

mod filter;
mod walker;

pub use filter::ImageTypes;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One entry produced by a file finder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Full path of the entry
    pub path: PathBuf,
    /// File name, used for display and link names
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl FileEntry {
    /// Entry for a regular file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
            is_dir: false,
        }
    }

    /// Entry for a directory
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            is_dir: true,
            ..Self::file(path)
        }
    }
}

/// Last path component, or the whole path when there is none
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Source of candidate files.
///
/// Entries arrive in traversal order. An `Err` means the walk cannot
/// continue; consumers stop at the first one.
///
/// Implement this trait to drive the detector from anything other than a
/// directory tree (e.g., for testing).
pub trait FileFinder: Send + Sync {
    fn entries(&self) -> Box<dyn Iterator<Item = Result<FileEntry, ScanError>> + '_>;
}

impl FileFinder for Vec<FileEntry> {
    fn entries(&self) -> Box<dyn Iterator<Item = Result<FileEntry, ScanError>> + '_> {
        Box::new(self.iter().cloned().map(Ok))
    }
}
