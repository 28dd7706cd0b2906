//! Cadence Player Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for
//! Cadence Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackId`, `Track`, `Catalog`, `View`
//! - **Collaborator Traits**: `AudioSink`, `PersistenceGateway`, `TrackFilter`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! Nothing here touches a browser, a file system, or an audio device. Those
//! are supplied by `cadence-storage`, `cadence-playback` and the host.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Catalog, Track, TrackId};
//!
//! let catalog = Catalog::new(vec![
//!     Track::new("m1", "Blinding Lights", "The Weeknd"),
//!     Track::new("m2", "Levitating", "Dua Lipa"),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.position(&TrackId::new("m2")), Some(1));
//! assert_eq!(cadence_core::format_duration(125.9), "2:05");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod search;
pub mod time;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use search::{SubstringFilter, TrackFilter};
pub use time::format_duration;
pub use traits::{AudioSink, PersistenceGateway, SinkEvent};
pub use types::{Catalog, Track, TrackId, View};
