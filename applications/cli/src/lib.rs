//! Cadence CLI Library
//!
//! Terminal front end for Cadence Player: a headless player with simulated
//! tracks, its session stored in a JSON file.
//!
//! This library exposes the shell and configuration for testing purposes.

pub mod config;
pub mod error;
pub mod shell;

// Re-export commonly used types for convenience
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use shell::{parse_line, Line, Session};
