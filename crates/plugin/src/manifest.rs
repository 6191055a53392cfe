//! Plugin manifest for metadata.
//!
//! A manifest is an optional JSON file sitting next to a plugin, sharing its
//! file stem: `disk.wasm` is described by `disk.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PluginError, Result};

/// Plugin manifest containing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin metadata.
    pub plugin: PluginMetadata,
}

/// Plugin metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Plugin name.
    pub name: String,

    /// Plugin version.
    pub version: String,

    /// Plugin description.
    #[serde(default)]
    pub description: Option<String>,

    /// Plugin author.
    #[serde(default)]
    pub author: Option<String>,

    /// Plugin license.
    #[serde(default)]
    pub license: Option<String>,
}

impl PluginManifest {
    /// Returns the manifest path that belongs to a plugin file.
    pub fn sidecar_path(plugin_path: &Path) -> PathBuf {
        plugin_path.with_extension("json")
    }

    /// Loads the sidecar manifest of a plugin, if one exists.
    pub fn for_plugin(plugin_path: &Path) -> Result<Option<Self>> {
        let path = Self::sidecar_path(plugin_path);
        if !path.is_file() {
            return Ok(None);
        }
        Self::from_file(&path).map(Some)
    }

    /// Loads a manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a manifest from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PluginError::ManifestError(e.to_string()))
    }

    /// Converts the manifest to JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PluginError::ManifestError(e.to_string()))
    }

    /// Creates a minimal manifest with just name and version.
    pub fn minimal(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            plugin: PluginMetadata::new(name, version),
        }
    }
}

impl PluginMetadata {
    /// Creates new plugin metadata.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            author: None,
            license: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}
