use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::command::DEFAULT_MAX_HISTORY;
use crate::error::ConfigError;
use crate::state::{AutoSaveSettings, DEFAULT_METADATA_KEY, DEFAULT_STORAGE_KEY};

/// Tunables for an editor session.
///
/// Missing fields take their defaults when deserializing, so partial or
/// older config files keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Most commands kept for undo
    pub max_history: usize,
    /// Quiet period before a debounced save, in seconds
    pub autosave_interval_secs: f64,
    pub storage_key: String,
    pub metadata_key: String,
    pub toast_duration_secs: f64,
    /// Shift applied to a drop point so it lands near the element's center
    pub drop_offset_left: f32,
    pub drop_offset_top: f32,
    /// Directory for file-backed storage on native targets
    pub storage_dir: Option<std::path::PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            autosave_interval_secs: 5.0,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            metadata_key: DEFAULT_METADATA_KEY.to_owned(),
            toast_duration_secs: 3.0,
            drop_offset_left: 60.0,
            drop_offset_top: 30.0,
            storage_dir: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::Invalid {
                field: "max_history",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !(self.autosave_interval_secs.is_finite() && self.autosave_interval_secs >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "autosave_interval_secs",
                reason: format!("{} is not a non-negative duration", self.autosave_interval_secs),
            });
        }
        if !(self.toast_duration_secs.is_finite() && self.toast_duration_secs >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "toast_duration_secs",
                reason: format!("{} is not a non-negative duration", self.toast_duration_secs),
            });
        }
        if self.storage_key.is_empty() || self.storage_key == self.metadata_key {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must be non-empty and differ from metadata_key".to_owned(),
            });
        }
        Ok(())
    }

    pub fn autosave_settings(&self) -> AutoSaveSettings {
        AutoSaveSettings {
            interval: Duration::from_secs_f64(self.autosave_interval_secs.max(0.0)),
            storage_key: self.storage_key.clone(),
            metadata_key: self.metadata_key.clone(),
        }
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs_f64(self.toast_duration_secs.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "max_history": 10 }"#).unwrap();
        assert_eq!(config.max_history, 10);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.autosave_settings().interval, Duration::from_secs(5));
    }

    #[test]
    fn rejects_zero_history() {
        let err = EditorConfig::from_json_str(r#"{ "max_history": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_history", .. }));
    }

    #[test]
    fn rejects_shared_keys() {
        let err = EditorConfig::from_json_str(r#"{ "storage_key": "a", "metadata_key": "a" }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "storage_key", .. }));
    }
}
