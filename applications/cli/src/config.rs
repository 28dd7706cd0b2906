/// CLI configuration
use crate::error::{CliError, Result};
use cadence_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Catalog JSON file; the bundled demo catalog when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// File the session and likes are stored in
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Length of every simulated track, in seconds
    #[serde(default = "default_track_length_secs")]
    pub track_length_secs: f64,

    #[serde(default)]
    pub player: PlayerConfig,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `cadence.toml` is read if
    /// present. `CADENCE_*` variables override the file, with `__` between
    /// nested keys (`CADENCE_PLAYER__SHUFFLE_SEED=7`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.track_length_secs.is_finite() && self.track_length_secs > 0.0) {
            return Err(CliError::Config(format!(
                "track_length_secs must be positive, got {}",
                self.track_length_secs
            )));
        }

        if !(0.0..=1.0).contains(&self.player.default_volume) {
            return Err(CliError::Config(format!(
                "player.default_volume must be within [0, 1], got {}",
                self.player.default_volume
            )));
        }

        if let Some(catalog) = &self.catalog_path {
            if !catalog.exists() {
                return Err(CliError::Config(format!(
                    "Catalog not found at {}",
                    catalog.display()
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_state_path() -> PathBuf {
    PathBuf::from("./cadence-state.json")
}

fn default_log_filter() -> String {
    "cadence=info".to_string()
}

fn default_track_length_secs() -> f64 {
    180.0
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            state_path: default_state_path(),
            log_filter: default_log_filter(),
            track_length_secs: default_track_length_secs(),
            player: PlayerConfig::default(),
        }
    }
}
