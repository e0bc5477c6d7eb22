use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

/// Snapshot of the application settings written by the desktop shell.
///
/// Only the feature switches that gate tools are read here; every other key in
/// the settings file is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    #[serde(default, deserialize_with = "explicit_true")]
    pub enable_memory: bool,
    #[serde(default, deserialize_with = "explicit_true")]
    pub enable_zai_reader: bool,
}

/// Feature switches after the optional settings snapshot has been resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureToggles {
    pub memory: bool,
    pub page_reader: bool,
}

impl FeatureToggles {
    pub fn from_settings(settings: Option<&ApiSettings>) -> Self {
        match settings {
            Some(settings) => Self {
                memory: settings.enable_memory,
                page_reader: settings.enable_zai_reader,
            },
            None => Self::default(),
        }
    }
}

impl ApiSettings {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Reads the settings file. A missing, unreadable or malformed file yields
    /// `None`, which disables every optional feature.
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path_ref = path.as_ref();
        let contents = match fs::read_to_string(path_ref) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(
                    path = %path_ref.display(),
                    "failed to read settings file: {err}; optional tools disabled"
                );
                return None;
            }
        };
        match Self::from_json_str(&contents) {
            Ok(settings) => Some(settings),
            Err(err) => {
                tracing::warn!(
                    path = %path_ref.display(),
                    "failed to parse settings file: {err}; optional tools disabled"
                );
                None
            }
        }
    }
}

// Anything other than a literal JSON `true` counts as disabled.
fn explicit_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}
