//! # Core Module
//!
//! The presentation-agnostic bracket search engine.
//!
//! ## Modules
//! - `scanner` - Produces candidate files and decides which are images
//! - `metadata` - Extracts dimensions and exposure bias from EXIF
//! - `bracket` - The sliding window and the bracket test
//! - `finder` - Drives a search from file stream to brackets
//! - `linker` - Hard-links matched images into an output directory

pub mod bracket;
pub mod finder;
pub mod linker;
pub mod metadata;
pub mod scanner;

// Re-export commonly used types
pub use bracket::{Bracket, BracketConfig, BracketDetector, BracketImage, ImageRecord};
pub use finder::{find, FindResult, FindSummary, Finder};
pub use linker::{BracketLinker, LinkOutcome};
pub use metadata::{ExifExtractor, ExposureBias, ImageMeta, MetadataExtractor};
pub use scanner::{FileEntry, FileFinder, ImageTypes, ScanConfig, WalkDirScanner};
