//! WASM plugin runtime using wasmtime.

use std::path::Path;

use tracing::{debug, warn};
use wasmtime::{Engine, Module};

use crate::error::{PluginError, Result};
use crate::manifest::PluginManifest;
use crate::module::WasmModule;

/// File extensions recognised as plugins.
pub const PLUGIN_EXTENSIONS: [&str; 2] = ["wasm", "wat"];

/// Runtime for compiling and instantiating WASM plugins.
///
/// Every module shares the runtime's engine but gets a store of its own.
#[derive(Clone, Default)]
pub struct PluginRuntime {
    engine: Engine,
}

impl PluginRuntime {
    /// Creates a new plugin runtime.
    pub fn new() -> Result<Self> {
        let engine = Engine::new(&wasmtime::Config::new())?;
        Ok(Self { engine })
    }

    /// Returns true if `path` has a plugin file extension.
    pub fn is_plugin_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| PLUGIN_EXTENSIONS.contains(&ext))
    }

    /// Loads a plugin from a `.wasm` or `.wat` file.
    ///
    /// A sidecar manifest is picked up when present. A broken manifest is
    /// logged and otherwise ignored.
    pub fn load_file(&self, path: &Path) -> Result<WasmModule> {
        if !path.is_file() {
            return Err(PluginError::NotFound(path.to_path_buf()));
        }

        let module = Module::from_file(&self.engine, path).map_err(|e| PluginError::LoadError {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;

        let manifest = match PluginManifest::for_plugin(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(path = %path.display(), "ignoring plugin manifest: {}", e);
                None
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(name = %name, path = %path.display(), "compiled plugin");

        WasmModule::instantiate(
            &self.engine,
            name,
            Some(path.to_path_buf()),
            &module,
            manifest,
        )
    }

    /// Loads a plugin from in-memory binary or text source.
    pub fn load_source(&self, name: &str, source: impl AsRef<[u8]>) -> Result<WasmModule> {
        let module = Module::new(&self.engine, source).map_err(|e| PluginError::LoadError {
            path: name.into(),
            reason: format!("{:#}", e),
        })?;

        WasmModule::instantiate(&self.engine, name.to_string(), None, &module, None)
    }
}
