//! Configuration discovery logic.

use std::path::{Path, PathBuf};

use agentmod_plugin::{CONFIG_FILE_NAME, HostConfig};
use miette::{Result, miette};
use tracing::debug;

/// Finds agentmod.json by searching from the current directory upwards.
pub fn find_config() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().map_err(|e| miette!("Cannot get current directory: {}", e))?;
    Ok(find_config_from(&cwd))
}

/// Finds agentmod.json starting from the given directory.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Loads the host configuration.
///
/// An explicit path must exist. Without one, the nearest agentmod.json is
/// used, falling back to defaults. A relative module path is resolved
/// against the directory holding the config file.
pub fn load_config(explicit: Option<&Path>, module_path: Option<PathBuf>) -> Result<HostConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config()?,
    };

    let mut config = match &path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let mut config = HostConfig::from_file(path)
                .map_err(|e| miette!("Failed to load {}: {}", path.display(), e))?;
            config.load_module_path = resolve(config_dir(path), &config.load_module_path);
            config
        }
        None => HostConfig::default(),
    };

    if let Some(module_path) = module_path {
        config.load_module_path = module_path;
    }

    Ok(config)
}

/// Returns the directory holding a config file.
pub fn config_dir(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
