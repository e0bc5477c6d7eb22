use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "planboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub todos_file: PathBuf,
    pub settings_file: PathBuf,
    pub theme_file: PathBuf,
    pub log_file: Option<PathBuf>,
    pub poll_interval_ms: u64,
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Rows the task list may take before it scrolls.
    pub list_max_rows: u16,
    /// Rows moved per wheel notch.
    pub wheel_step: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            todos_file: PathBuf::from("todos.json"),
            settings_file: PathBuf::from("settings.json"),
            theme_file: PathBuf::from("theme.toml"),
            log_file: None,
            poll_interval_ms: 250,
            panel: PanelConfig::default(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            list_max_rows: 6,
            wheel_step: 1,
        }
    }
}

impl Config {
    /// Reads the config file; `Ok(None)` when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path_ref = path.as_ref();
        let contents = match fs::read_to_string(path_ref) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path_ref.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path_ref.to_path_buf(),
                source,
            })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(s)?;
        config.panel.list_max_rows = config.panel.list_max_rows.max(1);
        config.panel.wheel_step = config.panel.wheel_step.max(1);
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(16))
    }
}
