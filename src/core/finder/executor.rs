//! Search execution.

use crate::core::bracket::{Bracket, BracketConfig, BracketDetector, ImageRecord};
use crate::core::metadata::{ExifExtractor, MetadataExtractor};
use crate::core::scanner::{FileFinder, ImageTypes, ScanConfig, WalkDirScanner};
use crate::error::HdrFinderError;
use crate::events::{
    null_sender, DetectEvent, Event, EventSender, FindSummary, FinderEvent, ScanEvent,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Search `finder`'s entries for brackets, calling `on_bracket` for each.
///
/// Walk errors and unreadable metadata of an admitted image end the search
/// with an error; files that cannot be decoded are skipped.
pub fn find<F>(
    finder: &dyn FileFinder,
    extractor: &dyn MetadataExtractor,
    types: &ImageTypes,
    config: BracketConfig,
    on_bracket: F,
) -> Result<FindSummary, HdrFinderError>
where
    F: FnMut(Bracket),
{
    find_with_events(finder, extractor, types, config, &null_sender(), on_bracket)
}

/// [`find`] with progress events
pub fn find_with_events<F>(
    finder: &dyn FileFinder,
    extractor: &dyn MetadataExtractor,
    types: &ImageTypes,
    config: BracketConfig,
    events: &EventSender,
    mut on_bracket: F,
) -> Result<FindSummary, HdrFinderError>
where
    F: FnMut(Bracket),
{
    let start_time = Instant::now();
    let mut summary = FindSummary::default();
    let mut detector = BracketDetector::new(config);

    events.send(Event::Finder(FinderEvent::Started));

    for entry_result in finder.entries() {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => return Err(fail(events, e.into())),
        };
        summary.entries_visited += 1;

        if entry.is_dir {
            summary.directories_skipped += 1;
            continue;
        }

        if !types.is_image(&entry.path) {
            debug!(path = %entry.path.display(), "not an image");
            summary.non_images_skipped += 1;
            continue;
        }

        let meta = match extractor.decode(&entry.path) {
            Ok(meta) => meta,
            Err(e) => {
                debug!(path = %entry.path.display(), error = %e, "skipping undecodable image");
                summary.extraction_failures += 1;
                events.send(Event::Detect(DetectEvent::ExtractionFailed {
                    path: entry.path,
                    message: e.to_string(),
                }));
                continue;
            }
        };

        summary.images_admitted += 1;
        events.send(Event::Detect(DetectEvent::ImageAdmitted {
            path: entry.path.clone(),
            window_len: (detector.len() + 1).min(config.max()),
        }));

        match detector.admit(ImageRecord::new(entry.path, entry.name, meta)) {
            Ok(Some(bracket)) => {
                summary.brackets_found += 1;
                events.send(Event::Detect(DetectEvent::BracketFound {
                    images: bracket.paths(),
                }));
                on_bracket(bracket);
            }
            Ok(None) => {}
            Err(e) => return Err(fail(events, e.into())),
        }
    }

    summary.pending_images = detector.len();
    summary.duration_ms = start_time.elapsed().as_millis() as u64;

    events.send(Event::Finder(FinderEvent::Completed {
        summary: summary.clone(),
    }));

    Ok(summary)
}

fn fail(events: &EventSender, error: HdrFinderError) -> HdrFinderError {
    events.send(Event::Finder(FinderEvent::Error {
        message: error.to_string(),
    }));
    error
}

/// Brackets and counters from a completed search
#[derive(Debug)]
pub struct FindResult {
    /// Brackets in the order they were found
    pub brackets: Vec<Bracket>,
    pub summary: FindSummary,
}

/// Configuration for a directory search
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Directory (or file) to search
    pub root: PathBuf,
    /// Bracket size limits
    pub bracket: BracketConfig,
    /// Walker configuration
    pub scan: ScanConfig,
    /// Extensions counted as images
    pub image_types: ImageTypes,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            bracket: BracketConfig::default(),
            scan: ScanConfig::default(),
            image_types: ImageTypes::default(),
        }
    }
}

/// Builder for [`Finder`]
pub struct FinderBuilder {
    config: FinderConfig,
    extractor: Option<Box<dyn MetadataExtractor>>,
    file_finder: Option<Box<dyn FileFinder>>,
}

impl FinderBuilder {
    pub fn new() -> Self {
        Self {
            config: FinderConfig::default(),
            extractor: None,
            file_finder: None,
        }
    }

    /// Directory to walk
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Set the bracket size limits
    pub fn bracket_config(mut self, config: BracketConfig) -> Self {
        self.config.bracket = config;
        self
    }

    /// Set walker configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan = config;
        self
    }

    /// Follow symbolic links while walking
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.scan.follow_symlinks = follow;
        self
    }

    /// Replace the extension table
    pub fn image_types(mut self, types: ImageTypes) -> Self {
        self.config.image_types = types;
        self
    }

    /// Use a different metadata extractor (default: EXIF)
    pub fn extractor(mut self, extractor: Box<dyn MetadataExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Use a different file source instead of walking `root`
    pub fn file_finder(mut self, finder: Box<dyn FileFinder>) -> Self {
        self.file_finder = Some(finder);
        self
    }

    pub fn build(self) -> Finder {
        let file_finder = self.file_finder.unwrap_or_else(|| {
            Box::new(WalkDirScanner::new(
                self.config.root.clone(),
                self.config.scan.clone(),
            ))
        });

        Finder {
            config: self.config,
            extractor: self.extractor.unwrap_or_else(|| Box::new(ExifExtractor::new())),
            file_finder,
        }
    }
}

impl Default for FinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured search over one root
pub struct Finder {
    config: FinderConfig,
    extractor: Box<dyn MetadataExtractor>,
    file_finder: Box<dyn FileFinder>,
}

impl Finder {
    pub fn builder() -> FinderBuilder {
        FinderBuilder::new()
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Run the search, calling `on_bracket` for each bracket found
    pub fn run<F>(&self, on_bracket: F) -> Result<FindSummary, HdrFinderError>
    where
        F: FnMut(Bracket),
    {
        self.run_with_events(&null_sender(), on_bracket)
    }

    /// Run the search with event reporting
    pub fn run_with_events<F>(
        &self,
        events: &EventSender,
        on_bracket: F,
    ) -> Result<FindSummary, HdrFinderError>
    where
        F: FnMut(Bracket),
    {
        info!(root = %self.config.root.display(), "searching for brackets");
        events.send(Event::Scan(ScanEvent::Started {
            root: self.config.root.clone(),
        }));

        let summary = find_with_events(
            self.file_finder.as_ref(),
            self.extractor.as_ref(),
            &self.config.image_types,
            self.config.bracket,
            events,
            on_bracket,
        )?;

        events.send(Event::Scan(ScanEvent::Completed {
            entries_visited: summary.entries_visited,
        }));
        info!(
            root = %self.config.root.display(),
            brackets = summary.brackets_found,
            skipped = summary.extraction_failures,
            "search complete"
        );

        Ok(summary)
    }

    /// Run the search and gather every bracket
    pub fn collect(&self) -> Result<FindResult, HdrFinderError> {
        self.collect_with_events(&null_sender())
    }

    /// [`collect`](Self::collect) with event reporting
    pub fn collect_with_events(&self, events: &EventSender) -> Result<FindResult, HdrFinderError> {
        let mut brackets = Vec::new();
        let summary = self.run_with_events(events, |bracket| brackets.push(bracket))?;
        Ok(FindResult { brackets, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{ExposureBias, ImageMeta};
    use crate::core::scanner::FileEntry;
    use crate::error::{MetadataError, ScanError};
    use crate::events::EventChannel;
    use std::collections::HashMap;
    use std::path::Path;

    #[derive(Clone)]
    struct TestMeta {
        width: u32,
        height: u32,
        bias: &'static str,
    }

    impl ImageMeta for TestMeta {
        fn width(&self) -> Result<u32, MetadataError> {
            Ok(self.width)
        }

        fn height(&self) -> Result<u32, MetadataError> {
            Ok(self.height)
        }

        fn exposure_bias(&self) -> Result<ExposureBias, MetadataError> {
            Ok(ExposureBias::new(self.bias))
        }
    }

    /// Decodes only the paths it was given metadata for
    #[derive(Default)]
    struct TestExtractor {
        metas: HashMap<PathBuf, TestMeta>,
    }

    impl TestExtractor {
        fn with(mut self, path: &str, width: u32, height: u32, bias: &'static str) -> Self {
            self.metas
                .insert(PathBuf::from(path), TestMeta { width, height, bias });
            self
        }
    }

    impl MetadataExtractor for TestExtractor {
        fn decode(&self, path: &Path) -> Result<Box<dyn ImageMeta>, MetadataError> {
            match self.metas.get(path) {
                Some(meta) => Ok(Box::new(meta.clone())),
                None => Err(MetadataError::Decode {
                    path: path.to_path_buf(),
                    reason: "no metadata".to_string(),
                }),
            }
        }
    }

    struct FailingFinder;

    impl FileFinder for FailingFinder {
        fn entries(&self) -> Box<dyn Iterator<Item = Result<FileEntry, ScanError>> + '_> {
            Box::new(
                vec![
                    Ok(FileEntry::file("a.JPG")),
                    Err(ScanError::DirectoryNotFound {
                        path: PathBuf::from("/gone"),
                    }),
                    Ok(FileEntry::file("b.JPG")),
                ]
                .into_iter(),
            )
        }
    }

    fn triplet() -> TestExtractor {
        TestExtractor::default()
            .with("a.JPG", 200, 100, "0/1")
            .with("b.JPG", 200, 100, "-2/1")
            .with("c.JPG", 200, 100, "2/1")
    }

    #[test]
    fn find_counts_every_kind_of_entry() {
        let entries = vec![
            FileEntry::directory("."),
            FileEntry::file("a.JPG"),
            FileEntry::file("notes.txt"),
            FileEntry::file("broken.JPG"),
            FileEntry::file("b.JPG"),
            FileEntry::file("c.JPG"),
            FileEntry::file("d.JPG"),
        ];
        let extractor = triplet().with("d.JPG", 200, 100, "0/1");

        let mut found = Vec::new();
        let summary = find(
            &entries,
            &extractor,
            &ImageTypes::default(),
            BracketConfig::default(),
            |b| found.push(b),
        )
        .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(
            summary,
            FindSummary {
                entries_visited: 7,
                directories_skipped: 1,
                non_images_skipped: 1,
                extraction_failures: 1,
                images_admitted: 4,
                brackets_found: 1,
                pending_images: 1,
                duration_ms: summary.duration_ms,
            }
        );
    }

    #[test]
    fn walk_error_stops_the_search() {
        let extractor = triplet();
        let mut calls = 0;
        let err = find(
            &FailingFinder,
            &extractor,
            &ImageTypes::default(),
            BracketConfig::new(1, 1).unwrap(),
            |_| calls += 1,
        )
        .unwrap_err();

        assert!(matches!(err, HdrFinderError::Scan(ScanError::DirectoryNotFound { .. })));
        // a.JPG alone is a bracket of one; b.JPG is never reached
        assert_eq!(calls, 1);
    }

    #[test]
    fn events_report_progress_and_failures() {
        let entries = vec![
            FileEntry::file("a.JPG"),
            FileEntry::file("broken.JPG"),
            FileEntry::file("b.JPG"),
            FileEntry::file("c.JPG"),
        ];
        let finder = Finder::builder()
            .file_finder(Box::new(entries))
            .extractor(Box::new(triplet()))
            .build();
        let (sender, receiver) = EventChannel::new();

        let result = finder.collect_with_events(&sender).unwrap();
        let events = receiver.drain();

        assert_eq!(result.brackets.len(), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::Detect(DetectEvent::ExtractionFailed { path, .. }) if path == Path::new("broken.JPG")
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::Detect(DetectEvent::BracketFound { images }) if images.len() == 3
        )));
        assert!(matches!(
            events.last(),
            Some(Event::Scan(ScanEvent::Completed { entries_visited: 4 }))
        ));
    }

    #[test]
    fn builder_defaults() {
        let finder = Finder::builder().root("/photos").build();
        assert_eq!(finder.config().root, PathBuf::from("/photos"));
        assert_eq!(finder.config().bracket, BracketConfig::default());
        assert!(!finder.config().scan.follow_symlinks);
    }
}
