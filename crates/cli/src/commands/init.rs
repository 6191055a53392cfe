//! Init command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use agentmod_plugin::{CONFIG_FILE_NAME, HostConfig, PluginManifest, PluginMetadata};
use miette::{Result, miette};

use crate::output;

const SAMPLE_PLUGIN: &str = "sample.wat";

const SAMPLE_TEMPLATE: &str = r#";; agentmod sample plugin
;;
;; Hooks take no parameters and return (ptr, len) of a UTF-8 string in
;; the exported memory. Returning a single i32/i64/f32/f64 yields a number.
(module
  (memory (export "memory") 1)
  (data (i32.const 0) "init world")
  (data (i32.const 16) "uninit world")
  (data (i32.const 32) "hello world  ")

  (func (export "init") (result i32 i32)
    (i32.const 0) (i32.const 10))

  ;; A fresh record: empty name, age 0 bumped once.
  (func (export "run") (result i32 i32)
    (local $age i32)
    (local.set $age (i32.add (i32.const 0) (i32.const 1)))
    (i32.store8 (i32.const 45) (i32.add (i32.const 48) (local.get $age)))
    (i32.const 32) (i32.const 14))

  (func (export "uninit") (result i32 i32)
    (i32.const 16) (i32.const 12)))
"#;

/// Writes agentmod.json and a sample plugin in the current directory.
pub fn execute(module_path: Option<PathBuf>, force: bool) -> Result<()> {
    let plugin_path = scaffold(Path::new("."), module_path, force)?;

    output::success(&format!("Created {}", CONFIG_FILE_NAME));
    output::success(&format!(
        "Created {}",
        plugin_path.join(SAMPLE_PLUGIN).display()
    ));
    output::info("Run 'agentmod get \"plugin.file[sample.wat]\"' to try it");

    Ok(())
}

/// Creates the config file, plugin directory and sample plugin under `root`.
///
/// Returns the plugin directory.
pub fn scaffold(root: &Path, module_path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        return Err(miette!(
            "{} already exists. Use --force to overwrite.",
            CONFIG_FILE_NAME
        ));
    }

    let config = HostConfig::default()
        .with_module_path(module_path.unwrap_or_else(|| PathBuf::from("modules")));
    let json = config.to_json().map_err(|e| miette!("{}", e))?;
    fs::write(&config_path, json)
        .map_err(|e| miette!("Failed to write {}: {}", config_path.display(), e))?;

    let plugin_path = root.join(config.plugin_path());
    fs::create_dir_all(&plugin_path)
        .map_err(|e| miette!("Failed to create {}: {}", plugin_path.display(), e))?;

    let sample_path = plugin_path.join(SAMPLE_PLUGIN);
    fs::write(&sample_path, SAMPLE_TEMPLATE)
        .map_err(|e| miette!("Failed to write {}: {}", sample_path.display(), e))?;

    let manifest = PluginManifest {
        plugin: PluginMetadata::new("sample", env!("CARGO_PKG_VERSION"))
            .with_description("Greets a fresh record"),
    };
    let manifest_path = PluginManifest::sidecar_path(&sample_path);
    let json = manifest.to_json().map_err(|e| miette!("{}", e))?;
    fs::write(&manifest_path, json)
        .map_err(|e| miette!("Failed to write {}: {}", manifest_path.display(), e))?;

    Ok(plugin_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentmod_core::ItemResult;
    use agentmod_plugin::ModuleHost;
    use tempfile::tempdir;

    #[test]
    fn test_scaffold_creates_working_plugin() {
        let dir = tempdir().unwrap();
        let plugin_path = scaffold(dir.path(), None, false).unwrap();

        assert_eq!(plugin_path, dir.path().join("modules").join("plugins"));
        assert!(dir.path().join(CONFIG_FILE_NAME).is_file());
        assert!(plugin_path.join("sample.json").is_file());

        let config = HostConfig::default().with_module_path(dir.path().join("modules"));
        let mut host = ModuleHost::new(config).unwrap();
        host.init().unwrap();

        assert_eq!(
            host.process("plugin.file[sample.wat]").unwrap(),
            ItemResult::Text("hello world  1".to_string())
        );
        host.uninit();
    }

    #[test]
    fn test_scaffold_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        scaffold(dir.path(), None, false).unwrap();

        assert!(scaffold(dir.path(), None, false).is_err());
        assert!(scaffold(dir.path(), Some(PathBuf::from("other")), true).is_ok());
        assert!(dir.path().join("other").join("plugins").is_dir());
    }
}
