//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while searching for brackets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory walk events
    Scan(ScanEvent),
    /// Bracket detection events
    Detect(DetectEvent),
    /// Search-level events
    Finder(FinderEvent),
}

/// Events from the directory walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Walking has started at this root
    Started { root: PathBuf },
    /// Walking finished
    Completed { entries_visited: usize },
}

/// Events from the bracket detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DetectEvent {
    /// An image was decoded and added to the window
    ImageAdmitted { path: PathBuf, window_len: usize },
    /// A file looked like an image but its metadata could not be decoded
    ExtractionFailed { path: PathBuf, message: String },
    /// The window formed a bracket; paths are oldest to newest
    BracketFound { images: Vec<PathBuf> },
}

/// Search-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FinderEvent {
    /// The search has started
    Started,
    /// The search completed successfully
    Completed { summary: FindSummary },
    /// The search stopped on a fatal error
    Error { message: String },
}

/// Counters describing one completed search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindSummary {
    /// Entries produced by the file finder, directories included
    pub entries_visited: usize,
    /// Directories passed over
    pub directories_skipped: usize,
    /// Files whose extension is not an image type
    pub non_images_skipped: usize,
    /// Image files whose metadata could not be decoded
    pub extraction_failures: usize,
    /// Images added to the window
    pub images_admitted: usize,
    /// Brackets delivered to the caller
    pub brackets_found: usize,
    /// Images still in the window when the walk ended
    pub pending_images: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
