//! A loaded WASM plugin instance.

use std::path::{Path, PathBuf};

use agentmod_core::{Hook, HookError, Lifecycle, Value};
use tracing::debug;
use wasmtime::{Engine, Instance, Linker, Module, Store, Val};

use crate::error::{PluginError, Result};
use crate::manifest::PluginManifest;

/// Name of the memory export text results are read from.
const MEMORY_EXPORT: &str = "memory";

/// A plugin instantiated in its own store.
///
/// Hook functions take no parameters. Their results map to a [`Value`]:
///
/// | results        | value                                   |
/// |----------------|-----------------------------------------|
/// | none           | `Nil`                                   |
/// | `i32` / `i64`  | `Int`                                   |
/// | `f32` / `f64`  | `Float`                                 |
/// | `i32, i32`     | `Text`, `(ptr, len)` into `memory`      |
pub struct WasmModule {
    name: String,
    path: Option<PathBuf>,
    manifest: Option<PluginManifest>,
    store: Store<()>,
    instance: Instance,
}

impl WasmModule {
    pub(crate) fn instantiate(
        engine: &Engine,
        name: String,
        path: Option<PathBuf>,
        module: &Module,
        manifest: Option<PluginManifest>,
    ) -> Result<Self> {
        let mut store = Store::new(engine, ());
        let linker = Linker::new(engine);

        let instance =
            linker
                .instantiate(&mut store, module)
                .map_err(|e| PluginError::LoadError {
                    path: path.clone().unwrap_or_else(|| PathBuf::from(&name)),
                    reason: e.to_string(),
                })?;

        Ok(Self {
            name,
            path,
            manifest,
            store,
            instance,
        })
    }

    /// Module name: the plugin file name, or the name given for inline source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the module was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn manifest(&self) -> Option<&PluginManifest> {
        self.manifest.as_ref()
    }

    /// Returns true if the module exports a function called `function`.
    pub fn has_function(&mut self, function: &str) -> bool {
        self.instance.get_func(&mut self.store, function).is_some()
    }

    /// Calls an exported function and decodes its results.
    pub fn call_function(&mut self, function: &str) -> Result<Value> {
        let func = self
            .instance
            .get_func(&mut self.store, function)
            .ok_or_else(|| PluginError::FunctionNotFound(function.to_string()))?;

        let ty = func.ty(&self.store);
        if ty.params().len() > 0 {
            return Err(PluginError::UnsupportedSignature {
                function: function.to_string(),
                signature: format!("takes {} parameters", ty.params().len()),
            });
        }

        let signature = ty
            .results()
            .map(|t| format!("{:?}", t))
            .collect::<Vec<_>>()
            .join(", ");
        let mut results = vec![Val::I32(0); ty.results().len()];

        debug!(module = %self.name, function, "calling plugin function");

        func.call(&mut self.store, &[], &mut results)
            .map_err(|e| PluginError::ExecutionError(format!("{}: {:#}", function, e)))?;

        match results.as_slice() {
            [] => Ok(Value::Nil),
            [Val::I32(v)] => Ok(Value::Int(i64::from(*v))),
            [Val::I64(v)] => Ok(Value::Int(*v)),
            [Val::F32(bits)] => Ok(Value::Float(f64::from(f32::from_bits(*bits)))),
            [Val::F64(bits)] => Ok(Value::Float(f64::from_bits(*bits))),
            [Val::I32(ptr), Val::I32(len)] => {
                self.read_text(*ptr as u32, *len as u32).map(Value::Text)
            }
            _ => Err(PluginError::UnsupportedSignature {
                function: function.to_string(),
                signature: format!("returns ({})", signature),
            }),
        }
    }

    fn read_text(&mut self, ptr: u32, len: u32) -> Result<String> {
        let memory = self
            .instance
            .get_memory(&mut self.store, MEMORY_EXPORT)
            .ok_or_else(|| {
                PluginError::ExecutionError(format!(
                    "text result without a '{}' export",
                    MEMORY_EXPORT
                ))
            })?;

        let data = memory.data(&self.store);
        let start = ptr as usize;
        let bytes = start
            .checked_add(len as usize)
            .and_then(|end| data.get(start..end))
            .ok_or(PluginError::MemoryAccess { ptr, len })?;

        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn call_hook(&mut self, hook: Hook) -> std::result::Result<Value, HookError> {
        self.call_function(hook.export_name())
            .map_err(|e| e.into_hook_error(hook))
    }
}

impl Lifecycle for WasmModule {
    fn init(&mut self) -> std::result::Result<Value, HookError> {
        self.call_hook(Hook::Init)
    }

    fn run(&mut self) -> std::result::Result<Value, HookError> {
        self.call_hook(Hook::Run)
    }

    fn uninit(&mut self) -> std::result::Result<Value, HookError> {
        self.call_hook(Hook::Uninit)
    }
}

impl std::fmt::Debug for WasmModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasmModule")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}
