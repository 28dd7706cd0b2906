//! Cadence Player - Storage
//!
//! Implementations of [`cadence_core::PersistenceGateway`]:
//! - [`MemoryGateway`]: process-local map, used by tests and headless hosts
//! - [`JsonFileGateway`]: one JSON object on disk, rewritten atomically
//! - `LocalStorageGateway`: browser `localStorage` (feature `web`)
//!
//! The playback crate decides what is stored; this crate only moves strings.
//! Key names live in [`keys`].

mod error;
mod file;
pub mod keys;
mod memory;
#[cfg(feature = "web")]
mod web;

pub use error::{Result, StorageError};
pub use file::JsonFileGateway;
pub use memory::MemoryGateway;
#[cfg(feature = "web")]
pub use web::LocalStorageGateway;
