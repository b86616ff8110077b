//! Directory walking implementation using walkdir.

use super::{FileEntry, FileFinder};
use crate::error::ScanError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Walks every file and directory under a root, root included, in
/// lexical order within each directory.
#[derive(Debug, Clone)]
pub struct WalkDirScanner {
    root: PathBuf,
    config: ScanConfig,
}

impl WalkDirScanner {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileFinder for WalkDirScanner {
    fn entries(&self) -> Box<dyn Iterator<Item = Result<FileEntry, ScanError>> + '_> {
        if !self.root.exists() {
            return Box::new(std::iter::once(Err(ScanError::DirectoryNotFound {
                path: self.root.clone(),
            })));
        }

        let mut walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        Box::new(walker.into_iter().map(|entry_result| match entry_result {
            Ok(entry) => Ok(FileEntry {
                path: entry.path().to_path_buf(),
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().is_dir(),
            }),
            Err(e) => Err(scan_error(e)),
        }))
    }
}

fn scan_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

    if e.io_error().map(|e| e.kind()) == Some(std::io::ErrorKind::PermissionDenied) {
        ScanError::PermissionDenied { path }
    } else {
        ScanError::ReadDirectory {
            path,
            source: std::io::Error::from(e),
        }
    }
}
