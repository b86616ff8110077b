//! # Bracket Module
//!
//! Finds exposure brackets: runs of consecutively shot images that share
//! pixel dimensions and each carry a different exposure bias, so they can be
//! merged into one HDR image.
//!
//! ## How It Works
//! 1. Decoded images enter a [`Window`] holding at most `max` of them;
//!    once full, each new image evicts the oldest
//! 2. After every addition the window is checked: at least `min` images,
//!    identical dimensions, pairwise-distinct bias tokens
//! 3. A window that passes is handed out as a [`Bracket`] and the detector
//!    starts again from an empty window
//!
//! ## Example
//! ```rust,ignore
//! let mut detector = BracketDetector::new(BracketConfig::new(3, 5)?);
//! for record in records {
//!     if let Some(bracket) = detector.admit(record)? {
//!         println!("Found {}", bracket);
//!     }
//! }
//! ```

mod detector;
mod window;

pub use detector::BracketDetector;
pub use window::Window;

use super::metadata::ImageMeta;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// How many images a bracket must and may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketConfig {
    min: usize,
    max: usize,
}

impl BracketConfig {
    pub const DEFAULT_MIN: usize = 3;
    pub const DEFAULT_MAX: usize = 3;

    /// Validated configuration; requires `1 <= min <= max`
    pub fn new(min: usize, max: usize) -> Result<Self, ConfigError> {
        if min < 1 || min > max {
            return Err(ConfigError::InvalidBracketSize { min, max });
        }
        Ok(Self { min, max })
    }

    /// Minimum number of images in a bracket
    pub fn min(&self) -> usize {
        self.min
    }

    /// Maximum number of images in a bracket, and the window capacity
    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// A decoded image waiting in the detector's window
pub struct ImageRecord {
    /// Path of the image file
    pub path: PathBuf,
    /// Display name
    pub name: String,
    /// Decoded metadata
    pub meta: Box<dyn ImageMeta>,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, meta: Box<dyn ImageMeta>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            meta,
        }
    }
}

impl fmt::Debug for ImageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRecord")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One image of a detected bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketImage {
    pub path: PathBuf,
    pub name: String,
}

impl From<ImageRecord> for BracketImage {
    fn from(record: ImageRecord) -> Self {
        Self {
            path: record.path,
            name: record.name,
        }
    }
}

/// A detected exposure bracket, images ordered oldest to newest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bracket {
    /// Unique identifier for this bracket
    pub id: Uuid,
    /// Images in capture (arrival) order
    pub images: Vec<BracketImage>,
}

impl Bracket {
    pub fn new(images: Vec<BracketImage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            images,
        }
    }

    /// Number of images in the bracket
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Display names, oldest first
    pub fn names(&self) -> Vec<&str> {
        self.images.iter().map(|i| i.name.as_str()).collect()
    }

    /// Paths, oldest first
    pub fn paths(&self) -> Vec<PathBuf> {
        self.images.iter().map(|i| i.path.clone()).collect()
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(" "))
    }
}
