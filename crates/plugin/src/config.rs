//! Host configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PluginError, Result};

/// Default name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "agentmod.json";

/// Configuration of a [`ModuleHost`](crate::ModuleHost).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory the agent loads modules from.
    pub load_module_path: PathBuf,

    /// Subdirectory of `load_module_path` scanned for plugins.
    pub plugin_dir: String,

    /// Item processing timeout in seconds, `0` for none.
    pub item_timeout: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            load_module_path: default_module_path(),
            plugin_dir: "plugins".to_string(),
            item_timeout: 0,
        }
    }
}

fn default_module_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("agentmod").join("modules"))
        .unwrap_or_else(|| PathBuf::from("modules"))
}

impl HostConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a configuration from JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PluginError::ConfigError(e.to_string()))?;

        if config.plugin_dir.is_empty() {
            return Err(PluginError::ConfigError(
                "plugin_dir must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Converts the configuration to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PluginError::ConfigError(e.to_string()))
    }

    /// Sets the module path.
    pub fn with_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.load_module_path = path.into();
        self
    }

    /// Sets the plugin subdirectory.
    pub fn with_plugin_dir(mut self, dir: impl Into<String>) -> Self {
        self.plugin_dir = dir.into();
        self
    }

    /// Directory scanned for plugins.
    pub fn plugin_path(&self) -> PathBuf {
        self.load_module_path.join(&self.plugin_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.plugin_dir, "plugins");
        assert_eq!(config.item_timeout, 0);
        assert!(config.load_module_path.ends_with("modules"));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config =
            HostConfig::from_json(r#"{"load_module_path": "/opt/agent/modules"}"#).unwrap();
        assert_eq!(config.load_module_path, PathBuf::from("/opt/agent/modules"));
        assert_eq!(config.plugin_dir, "plugins");
        assert_eq!(config.plugin_path(), PathBuf::from("/opt/agent/modules/plugins"));
    }

    #[test]
    fn test_full_json() {
        let config = HostConfig::from_json(
            r#"{"load_module_path": "/m", "plugin_dir": "wasm", "item_timeout": 3}"#,
        )
        .unwrap();
        assert_eq!(config.plugin_path(), PathBuf::from("/m/wasm"));
        assert_eq!(config.item_timeout, 3);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            HostConfig::from_json(r#"{"item_timeout": "soon"}"#),
            Err(PluginError::ConfigError(_))
        ));
        assert!(matches!(
            HostConfig::from_json(r#"{"plugin_dir": ""}"#),
            Err(PluginError::ConfigError(_))
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = HostConfig::default()
            .with_module_path(dir.path())
            .with_plugin_dir("wasm");

        std::fs::write(&path, config.to_json().unwrap()).unwrap();
        assert_eq!(HostConfig::from_file(&path).unwrap(), config);
    }
}
