//! # HDR Finder
//!
//! Finds runs of bracketed exposures in a photo library: consecutive shots
//! with the same pixel dimensions and distinct exposure bias values, ready to
//! be merged into a single HDR image.
//!
//! ## Architecture
//! The library is split into a search engine and presentation layers:
//! - `core` - File walking, EXIF extraction, and bracket detection
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{HdrFinderError, Result};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the library
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or this
/// crate's debug output when `verbose` is on. Logs go to stderr so they
/// never mix with results on stdout. Calling this more than once is harmless.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "hdr_finder=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
