//! # Events Module
//!
//! Progress reporting for bracket searches.
//!
//! The core library emits events through channels so a front end can show
//! progress, or list the files it could not decode, without the detector
//! knowing anything about presentation.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Detect(DetectEvent::BracketFound { images }) = event {
//!             println!("bracket of {}", images.len());
//!         }
//!     }
//! });
//!
//! finder.run_with_events(&sender, |bracket| { /* ... */ })?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
