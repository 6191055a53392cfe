//! Plugin error types.

use std::path::PathBuf;

use agentmod_core::{Hook, HookError};
use thiserror::Error;

/// Error type for plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Failed to load plugin file.
    #[error("Failed to load plugin from {path}: {reason}")]
    LoadError { path: PathBuf, reason: String },

    /// Plugin file not found.
    #[error("Plugin not found: {0}")]
    NotFound(PathBuf),

    /// Plugin function not found.
    #[error("Plugin function '{0}' not found")]
    FunctionNotFound(String),

    /// Plugin trapped while running a function.
    #[error("Plugin execution error: {0}")]
    ExecutionError(String),

    /// Function signature does not match any supported shape.
    #[error("Unsupported signature for '{function}': {signature}")]
    UnsupportedSignature { function: String, signature: String },

    /// A returned text range points outside the plugin memory.
    #[error("Plugin memory access out of bounds: {ptr}+{len}")]
    MemoryAccess { ptr: u32, len: u32 },

    /// Manifest parsing error.
    #[error("Failed to parse plugin manifest: {0}")]
    ManifestError(String),

    /// Host configuration error.
    #[error("Invalid host configuration: {0}")]
    ConfigError(String),

    /// WASM runtime error.
    #[error("WASM runtime error: {0}")]
    WasmError(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<wasmtime::Error> for PluginError {
    fn from(err: wasmtime::Error) -> Self {
        PluginError::WasmError(err.to_string())
    }
}

impl PluginError {
    /// Wraps this error as the failure of `hook`.
    pub fn into_hook_error(self, hook: Hook) -> HookError {
        HookError::new(hook, self.to_string())
    }
}

/// Result type for plugin operations.
pub type Result<T> = std::result::Result<T, PluginError>;
