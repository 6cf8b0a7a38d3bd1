use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingestion::ttrpg::{GrammarPolicy, IngestError, IngestResult};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grammar: GrammarPolicy,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Where [`AppConfig::load_with_source`] found its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file.
    File(PathBuf),
    /// The file exists but could not be parsed; defaults are in use.
    Invalid { path: PathBuf, error: String },
    /// No file at this path; defaults are in use.
    Missing(PathBuf),
}

impl ConfigSource {
    /// Report the outcome through the `log` facade.
    ///
    /// Callers that set up logging from the loaded config call this once the
    /// subscriber is installed.
    pub fn log(&self) {
        match self {
            Self::File(path) => log::info!("Loaded config from {}", path.display()),
            Self::Invalid { path, error } => log::warn!(
                "Failed to parse config at {}: {error}, using defaults",
                path.display()
            ),
            Self::Missing(path) => {
                log::debug!("No config file at {}, using defaults", path.display())
            }
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/compendium/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let (config, source) = Self::load_with_source();
        source.log();
        config
    }

    /// Like [`AppConfig::load`], but hands back the outcome instead of
    /// logging it.
    pub fn load_with_source() -> (Self, ConfigSource) {
        Self::load_or_default(&Self::config_path())
    }

    fn load_or_default(path: &Path) -> (Self, ConfigSource) {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return (Self::default(), ConfigSource::Missing(path.to_path_buf()));
        };
        match toml::from_str(&contents) {
            Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
            Err(e) => (
                Self::default(),
                ConfigSource::Invalid {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                },
            ),
        }
    }

    /// Load configuration from an explicit path. Unlike [`AppConfig::load`],
    /// a missing or invalid file is an error.
    pub fn load_from(path: &Path) -> IngestResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| IngestError::io(path.display().to_string(), e))?;
        toml::from_str(&contents)
            .map_err(|e| IngestError::config(path.display().to_string(), e.to_string()))
    }

    /// Resolved log directory (override or XDG data default).
    pub fn log_dir(&self) -> PathBuf {
        self.logging.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("compendium").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("compendium").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
