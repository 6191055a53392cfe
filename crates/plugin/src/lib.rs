//! agentmod plugin - WASM plugin host for agentmod.
//!
//! This crate discovers WebAssembly plugins in a directory, instantiates each
//! in an isolated store and drives them through their lifecycle hooks
//! alongside any native modules registered with the host.

mod config;
mod error;
mod host;
mod manifest;
mod module;
mod runtime;

pub use config::{CONFIG_FILE_NAME, HostConfig};
pub use error::{PluginError, Result};
pub use host::{API_VERSION, FILE_KEY, ModuleHost, STRING_KEY};
pub use manifest::{PluginManifest, PluginMetadata};
pub use module::WasmModule;
pub use runtime::{PLUGIN_EXTENSIONS, PluginRuntime};
