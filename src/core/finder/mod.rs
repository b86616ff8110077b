//! # Finder Module
//!
//! Drives a search from file stream to brackets.
//!
//! ## Stages
//! 1. **Walk** - the file finder yields entries in order; a walk error
//!    ends the search
//! 2. **Filter** - directories and non-image extensions are passed over
//! 3. **Decode** - the extractor reads metadata; files it cannot decode
//!    are skipped and never reach the window
//! 4. **Detect** - the detector evaluates the window after every admitted
//!    image and hands out each bracket it finds
//!
//! One search owns one detector. Searches share nothing, so separate roots
//! can be searched concurrently with separate `Finder`s.

mod executor;

pub use executor::{find, find_with_events, FindResult, Finder, FinderBuilder, FinderConfig};
pub use crate::events::FindSummary;
