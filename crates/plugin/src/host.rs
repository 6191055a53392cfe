//! The module host: discovers plugins and drives their lifecycle hooks.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use agentmod_core::{AgentError, Hook, ItemKey, ItemResult, Lifecycle, Metric};
use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::error::Result;
use crate::runtime::PluginRuntime;

/// Version of the module interface the host implements.
pub const API_VERSION: u32 = 1;

/// Runs the `run` hook of a loaded module.
pub const FILE_KEY: &str = "plugin.file";

/// Compiles a throwaway module from source and runs its `run` hook.
pub const STRING_KEY: &str = "plugin.string";

/// Name given to modules compiled from item parameters.
const INLINE_MODULE_NAME: &str = "<inline>";

static METRICS: [Metric; 2] = [
    Metric {
        key: FILE_KEY,
        has_params: true,
        test_param: Some("sample"),
        description: "Result of the run hook of the named module",
    },
    Metric {
        key: STRING_KEY,
        has_params: true,
        test_param: Some("(module)"),
        description: "Result of the run hook of a module given as WebAssembly text",
    },
];

struct LoadedModule {
    name: String,
    module: Box<dyn Lifecycle>,
}

/// Owns the loaded modules and answers item requests.
///
/// Modules are kept in load order. `init` and `uninit` visit them in that
/// order; hook failures are logged and never abort the walk.
pub struct ModuleHost {
    config: HostConfig,
    runtime: PluginRuntime,
    modules: Vec<LoadedModule>,
    item_timeout: u64,
}

impl ModuleHost {
    /// Creates a host with no modules loaded.
    pub fn new(config: HostConfig) -> Result<Self> {
        Ok(Self {
            item_timeout: config.item_timeout,
            config,
            runtime: PluginRuntime::new()?,
            modules: Vec::new(),
        })
    }

    /// Version of the module interface.
    pub fn api_version(&self) -> u32 {
        API_VERSION
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Sets the item processing timeout in seconds, `0` for none.
    pub fn set_item_timeout(&mut self, timeout: u64) {
        self.item_timeout = timeout;
    }

    pub fn item_timeout(&self) -> u64 {
        self.item_timeout
    }

    /// Item keys the host answers.
    pub fn item_list(&self) -> &'static [Metric] {
        &METRICS
    }

    /// Names of the loaded modules, in load order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    /// Returns true if a module called `name` is loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name == name)
    }

    /// Adds a module under `name`, replacing any module with the same name.
    pub fn register(&mut self, name: impl Into<String>, module: Box<dyn Lifecycle>) {
        let name = name.into();

        if let Some(existing) = self.modules.iter_mut().find(|m| m.name == name) {
            warn!(module = %name, "replacing already loaded module");
            existing.module = module;
            return;
        }

        info!(module = %name, "registering module");
        self.modules.push(LoadedModule { name, module });
    }

    /// Loads every plugin file in the plugin directory.
    ///
    /// A missing directory loads nothing. Files that fail to load are logged
    /// and skipped; already loaded names are left alone.
    pub fn discover(&mut self) -> Result<usize> {
        let dir = self.config.plugin_path();

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "plugin directory does not exist");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let paths = plugin_files(entries.map(|entry| entry.map(|e| e.path())));

        let mut loaded = 0;
        for path in paths {
            let already_loaded = path
                .file_name()
                .is_some_and(|name| self.is_loaded(&name.to_string_lossy()));
            if already_loaded {
                continue;
            }

            match self.runtime.load_file(&path) {
                Ok(module) => {
                    let name = module.name().to_string();
                    info!(module = %name, path = %path.display(), "loaded plugin");
                    self.modules.push(LoadedModule {
                        name,
                        module: Box::new(module),
                    });
                    loaded += 1;
                }
                Err(e) => warn!(path = %path.display(), "skipping plugin: {}", e),
            }
        }

        Ok(loaded)
    }

    /// Discovers plugins, then calls `init` on every module.
    ///
    /// Returns the number of modules loaded afterwards.
    pub fn init(&mut self) -> Result<usize> {
        self.discover()?;
        self.exec_hook(Hook::Init);
        Ok(self.modules.len())
    }

    /// Calls `hook` on every module in load order.
    pub fn exec_hook(&mut self, hook: Hook) {
        for loaded in &mut self.modules {
            match loaded.module.call(hook) {
                Ok(value) => {
                    debug!(module = %loaded.name, %hook, result = %value, "hook returned")
                }
                Err(e) => warn!(module = %loaded.name, "{}", e),
            }
        }
    }

    /// Answers one item request.
    ///
    /// Keys the host does not know and missing parameters are errors. A
    /// module that cannot be found or fails produces empty text.
    pub fn process(&mut self, request: &str) -> agentmod_core::Result<ItemResult> {
        let key = ItemKey::parse(request)?;
        debug!(key = %key, "processing item");

        match key.name.as_str() {
            FILE_KEY => {
                let name = key.required_param(0)?;
                Ok(self.run_module(name))
            }
            STRING_KEY => {
                let source = key.required_param(0)?;
                Ok(self.run_source(source))
            }
            _ => Err(AgentError::UnsupportedKey(key.name)),
        }
    }

    fn run_module(&mut self, name: &str) -> ItemResult {
        let Some(loaded) = self.modules.iter_mut().find(|m| m.name == name) else {
            warn!(module = %name, "module not loaded");
            return ItemResult::empty();
        };

        match loaded.module.run() {
            Ok(value) => value.into(),
            Err(e) => {
                warn!(module = %name, "{}", e);
                ItemResult::empty()
            }
        }
    }

    fn run_source(&self, source: &str) -> ItemResult {
        let result = self
            .runtime
            .load_source(INLINE_MODULE_NAME, source)
            .map_err(|e| e.into_hook_error(Hook::Run))
            .and_then(|mut module| module.run());

        match result {
            Ok(value) => value.into(),
            Err(e) => {
                warn!(module = INLINE_MODULE_NAME, "{}", e);
                ItemResult::empty()
            }
        }
    }

    /// Calls `uninit` on every module, then unloads them all.
    pub fn uninit(&mut self) {
        self.exec_hook(Hook::Uninit);
        let count = self.modules.len();
        self.modules.clear();
        info!(count, "unloaded modules");
    }
}

/// Keeps the plugin files among directory entries, sorted by path.
///
/// Entries that cannot be read are logged and skipped.
fn plugin_files(entries: impl Iterator<Item = io::Result<PathBuf>>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("skipping unreadable plugin directory entry: {}", e);
                continue;
            }
        };
        if path.is_file() && PluginRuntime::is_plugin_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentmod_core::{HookError, SampleModule, Value, sample};
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::{TempDir, tempdir};

    const GREETER: &str = r#"
        (module
          (memory (export "memory") 1)
          (data (i32.const 0) "init world")
          (data (i32.const 16) "hello world  1")
          (data (i32.const 32) "uninit world")
          (func (export "init") (result i32 i32) i32.const 0 i32.const 10)
          (func (export "run") (result i32 i32) i32.const 16 i32.const 14)
          (func (export "uninit") (result i32 i32) i32.const 32 i32.const 12))
    "#;

    const GAUGE: &str = r#"(module (func (export "run") (result f64) f64.const 0.75))"#;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Recorder {
        fn record(&self, hook: Hook) -> std::result::Result<Value, HookError> {
            self.log.borrow_mut().push(format!("{}:{}", self.name, hook));
            Ok(Value::Nil)
        }
    }

    impl Lifecycle for Recorder {
        fn init(&mut self) -> std::result::Result<Value, HookError> {
            self.record(Hook::Init)
        }

        fn run(&mut self) -> std::result::Result<Value, HookError> {
            self.record(Hook::Run)?;
            Err(HookError::new(Hook::Run, "always fails"))
        }

        fn uninit(&mut self) -> std::result::Result<Value, HookError> {
            self.record(Hook::Uninit)
        }
    }

    fn host_in(dir: &Path) -> ModuleHost {
        ModuleHost::new(HostConfig::default().with_module_path(dir)).unwrap()
    }

    fn plugin_dir() -> TempDir {
        let dir = tempdir().unwrap();
        let plugins = dir.path().join("plugins");
        fs::create_dir(&plugins).unwrap();
        fs::write(plugins.join("greeter.wat"), GREETER).unwrap();
        fs::write(plugins.join("gauge.wat"), GAUGE).unwrap();
        fs::write(plugins.join("broken.wat"), "(module (func").unwrap();
        fs::write(plugins.join("notes.txt"), "not a plugin").unwrap();
        dir
    }

    #[test]
    fn test_api_version_and_items() {
        let dir = tempdir().unwrap();
        let host = host_in(dir.path());

        assert_eq!(host.api_version(), 1);
        let keys: Vec<_> = host.item_list().iter().map(|m| m.key).collect();
        assert_eq!(keys, vec!["plugin.file", "plugin.string"]);
    }

    #[test]
    fn test_item_timeout() {
        let dir = tempdir().unwrap();
        let mut config = HostConfig::default().with_module_path(dir.path());
        config.item_timeout = 3;

        let mut host = ModuleHost::new(config).unwrap();
        assert_eq!(host.item_timeout(), 3);

        host.set_item_timeout(10);
        assert_eq!(host.item_timeout(), 10);
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempdir().unwrap();
        let mut host = host_in(dir.path());
        assert_eq!(host.discover().unwrap(), 0);
        assert_eq!(host.init().unwrap(), 0);
    }

    #[test]
    fn test_discover_skips_broken_and_foreign_files() {
        let dir = plugin_dir();
        let mut host = host_in(dir.path());

        assert_eq!(host.discover().unwrap(), 2);
        assert_eq!(host.modules().collect::<Vec<_>>(), vec!["gauge.wat", "greeter.wat"]);

        // Discovering again does not load duplicates.
        assert_eq!(host.discover().unwrap(), 0);
        assert_eq!(host.modules().count(), 2);
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let dir = plugin_dir();
        let plugins = dir.path().join("plugins");

        let entries = vec![
            Ok(plugins.join("greeter.wat")),
            Err(io::Error::new(ErrorKind::PermissionDenied, "denied")),
            Ok(plugins.join("notes.txt")),
            Ok(plugins.join("gauge.wat")),
        ];

        assert_eq!(
            plugin_files(entries.into_iter()),
            vec![plugins.join("gauge.wat"), plugins.join("greeter.wat")]
        );
    }

    #[test]
    fn test_plugin_file_key() {
        let dir = plugin_dir();
        let mut host = host_in(dir.path());
        host.init().unwrap();

        assert_eq!(
            host.process("plugin.file[greeter.wat]").unwrap(),
            ItemResult::Text("hello world  1".to_string())
        );
        assert_eq!(
            host.process("plugin.file[gauge.wat]").unwrap(),
            ItemResult::Double(0.75)
        );
        assert_eq!(
            host.process("plugin.file[missing.wat]").unwrap(),
            ItemResult::empty()
        );
    }

    #[test]
    fn test_plugin_string_key() {
        let dir = tempdir().unwrap();
        let mut host = host_in(dir.path());

        let key = ItemKey {
            name: STRING_KEY.to_string(),
            params: vec![r#"(module (func (export "run") (result i64) i64.const 5))"#.to_string()],
        };
        assert_eq!(
            host.process(&key.to_string()).unwrap(),
            ItemResult::Double(5.0)
        );

        assert_eq!(
            host.process("plugin.string[(module (func]").unwrap(),
            ItemResult::empty()
        );
        assert_eq!(
            host.process(r#"plugin.string["(module (func"]"#).unwrap(),
            ItemResult::empty()
        );
        assert_eq!(host.process("plugin.string[(module)]").unwrap(), ItemResult::empty());
    }

    #[test]
    fn test_process_errors() {
        let dir = tempdir().unwrap();
        let mut host = host_in(dir.path());

        assert!(matches!(
            host.process("system.uptime"),
            Err(AgentError::UnsupportedKey(k)) if k == "system.uptime"
        ));
        assert!(matches!(
            host.process("plugin.file"),
            Err(AgentError::MissingParameter { index: 0, .. })
        ));
        assert!(matches!(
            host.process("plugin.file[x"),
            Err(AgentError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_native_sample_module() {
        let dir = tempdir().unwrap();
        let mut host = host_in(dir.path());
        host.register(sample::SAMPLE_MODULE_NAME, Box::new(SampleModule));
        host.init().unwrap();

        for _ in 0..3 {
            assert_eq!(
                host.process("plugin.file[sample]").unwrap(),
                ItemResult::Text("hello world  1".to_string())
            );
        }
    }

    #[test]
    fn test_hooks_visit_modules_in_order() {
        let dir = tempdir().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = host_in(dir.path());

        for name in ["a", "b"] {
            host.register(
                name,
                Box::new(Recorder {
                    name,
                    log: log.clone(),
                }),
            );
        }

        host.init().unwrap();
        assert_eq!(host.process("plugin.file[b]").unwrap(), ItemResult::empty());
        host.uninit();

        assert_eq!(
            *log.borrow(),
            vec!["a:init", "b:init", "b:run", "a:uninit", "b:uninit"]
        );
        assert_eq!(host.modules().count(), 0);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let dir = tempdir().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = host_in(dir.path());

        host.register("x", Box::new(SampleModule));
        host.register(
            "x",
            Box::new(Recorder {
                name: "x",
                log: log.clone(),
            }),
        );

        assert_eq!(host.modules().count(), 1);
        host.exec_hook(Hook::Init);
        assert_eq!(*log.borrow(), vec!["x:init"]);
    }
}
