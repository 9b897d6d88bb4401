//! Generator configuration.
//!
//! Settings live in a JSON file. Every field has a default, so a partial file
//! (or none at all) is valid:
//!
//! ```json
//! {
//!   "progress_interval": 500,
//!   "endpoint_template": "/api/{lottery}/contest/{id}",
//!   "logging": { "level": "debug", "log_dir": "logs" }
//! }
//! ```

use crate::error::{LotteryApiError, Result, ResultExt as _};
use crate::ingest::{DEFAULT_SNIFF_SAMPLE_BYTES, IngestOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application directory under the platform config directory.
pub const APP_DIR: &str = "lottery-api";

pub const CONFIG_FILE: &str = "config.json";

/// Default endpoint layout, relative to the site root.
pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "/v1/lotteries/{lottery}/draws/{id}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Leading bytes inspected for delimiter sniffing
    pub sniff_sample_bytes: usize,
    /// Log a progress line every N written records (0 disables)
    pub progress_interval: usize,
    /// Index endpoint pattern; `{lottery}` and `{id}` are substituted
    pub endpoint_template: String,
    /// Root of the published tree (`<api_root>/lotteries/<lottery>/draws`)
    pub api_root: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            sniff_sample_bytes: DEFAULT_SNIFF_SAMPLE_BYTES,
            progress_interval: 100,
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_owned(),
            api_root: PathBuf::from("v1"),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
    /// Directory for rolling log files; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            log_dir: None,
        }
    }
}

impl ApiConfig {
    /// `<platform config dir>/lottery-api/config.json`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// read when present and built-in defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the file to read cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Read and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, or a
    /// [`LotteryApiError::Config`] naming the file when it is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_json(&contents).map_err(|e| match e {
            LotteryApiError::Config(msg) => {
                LotteryApiError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// # Errors
    ///
    /// [`LotteryApiError::Config`] for malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LotteryApiError::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// # Errors
    ///
    /// [`LotteryApiError::Config`] when `sniff_sample_bytes` is zero or
    /// `endpoint_template` lacks `{id}`.
    pub fn validate(&self) -> Result<()> {
        if self.sniff_sample_bytes == 0 {
            return Err(LotteryApiError::Config(
                "sniff_sample_bytes must be greater than zero".to_owned(),
            ));
        }
        if !self.endpoint_template.contains("{id}") {
            return Err(LotteryApiError::Config(format!(
                "endpoint_template must contain {{id}}: {}",
                self.endpoint_template
            )));
        }
        Ok(())
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            sniff_sample_bytes: self.sniff_sample_bytes,
            delimiter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_json_uses_defaults() -> Result<()> {
        let config = ApiConfig::from_json(r#"{ "progress_interval": 5 }"#)?;
        assert_eq!(config.progress_interval, 5);
        assert_eq!(config.sniff_sample_bytes, 1024);
        assert_eq!(config.endpoint_template, DEFAULT_ENDPOINT_TEMPLATE);
        assert_eq!(config.logging.level, "info");
        Ok(())
    }

    #[test]
    fn test_rejects_template_without_id() {
        let result = ApiConfig::from_json(r#"{ "endpoint_template": "/api/{lottery}" }"#);
        assert!(matches!(result, Err(LotteryApiError::Config(_))));
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = ApiConfig {
            progress_interval: 10,
            api_root: PathBuf::from("public/v1"),
            ..Default::default()
        };
        config.save(&path)?;

        assert_eq!(ApiConfig::load(Some(path.as_path()))?, config);
        Ok(())
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        assert!(ApiConfig::load(Some(Path::new("no/such/config.json"))).is_err());
    }
}
