//! Sliding-window bracket detection.

use super::{Bracket, BracketConfig, BracketImage, ImageRecord, Window};
use crate::core::metadata::ExposureBias;
use crate::error::MetadataError;
use std::collections::HashSet;
use tracing::{debug, info};

/// Decides after each admitted image whether the most recent images form
/// a bracket.
///
/// There is no resting "matched" state: a match is returned from
/// [`admit`](Self::admit) and the window is already empty when it returns.
#[derive(Debug)]
pub struct BracketDetector {
    config: BracketConfig,
    window: Window<ImageRecord>,
}

impl BracketDetector {
    pub fn new(config: BracketConfig) -> Self {
        Self {
            config,
            window: Window::new(config.max()),
        }
    }

    pub fn config(&self) -> BracketConfig {
        self.config
    }

    /// Images currently in the window
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Images currently in the window, oldest first
    pub fn images(&self) -> impl Iterator<Item = &ImageRecord> + '_ {
        self.window.iter()
    }

    /// Add an image without evaluating, returning the image it evicted
    pub fn add(&mut self, record: ImageRecord) -> Option<ImageRecord> {
        let evicted = self.window.push(record);
        if let Some(ref old) = evicted {
            debug!(path = %old.path.display(), "evicted from window");
        }
        evicted
    }

    /// Add an image and evaluate the window.
    ///
    /// Returns the bracket when the window matches, after which the
    /// window is empty. Metadata that cannot be read is an error.
    pub fn admit(&mut self, record: ImageRecord) -> Result<Option<Bracket>, MetadataError> {
        debug!(path = %record.path.display(), "admitted to window");
        self.add(record);

        if !self.is_bracket()? {
            return Ok(None);
        }

        let bracket = self.take_bracket();
        info!(images = bracket.len(), "found bracket {}", bracket);
        Ok(Some(bracket))
    }

    /// Whether the window currently holds a valid bracket.
    ///
    /// Checks run in order and stop at the first failure: enough images,
    /// matching dimensions, unique bias values.
    pub fn is_bracket(&self) -> Result<bool, MetadataError> {
        if !self.sufficient_images() {
            return Ok(false);
        }

        if !self.dimensions_match()? {
            debug!("window rejected: dimension mismatch");
            return Ok(false);
        }

        if !self.bias_values_unique()? {
            debug!("window rejected: repeated exposure bias");
            return Ok(false);
        }

        Ok(true)
    }

    /// Empty the window
    pub fn reset(&mut self) {
        self.window.clear();
    }

    fn sufficient_images(&self) -> bool {
        self.window.len() >= self.config.min()
    }

    // Both checks read every record, so an unreadable record fails the
    // scan even when an earlier pair already decided the answer.
    fn dimensions_match(&self) -> Result<bool, MetadataError> {
        let mut expected: Option<(u32, u32)> = None;
        let mut matched = true;

        for record in self.window.iter() {
            let dimensions = record.meta.dimensions().map_err(|e| read_error(record, e))?;
            match expected {
                None => expected = Some(dimensions),
                Some(first) if first != dimensions => matched = false,
                Some(_) => {}
            }
        }

        Ok(matched)
    }

    fn bias_values_unique(&self) -> Result<bool, MetadataError> {
        let mut seen: HashSet<ExposureBias> = HashSet::with_capacity(self.window.len());
        let mut unique = true;

        for record in self.window.iter() {
            let bias = record.meta.exposure_bias().map_err(|e| read_error(record, e))?;
            if !seen.insert(bias) {
                unique = false;
            }
        }

        Ok(unique)
    }

    fn take_bracket(&mut self) -> Bracket {
        Bracket::new(
            self.window
                .drain()
                .into_iter()
                .map(BracketImage::from)
                .collect(),
        )
    }
}

fn read_error(record: &ImageRecord, source: MetadataError) -> MetadataError {
    MetadataError::Read {
        path: record.path.clone(),
        source: Box::new(source),
    }
}
