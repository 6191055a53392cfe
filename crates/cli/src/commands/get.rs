//! Get command implementation.

use agentmod_plugin::HostConfig;
use miette::{Result, miette};

use crate::commands::host_with_sample;
use crate::output;

/// Loads all modules, processes one item key and unloads them again.
pub fn execute(config: HostConfig, key: &str) -> Result<()> {
    let mut host = host_with_sample(config)?;

    host.init()
        .map_err(|e| miette!("Module initialization failed: {}", e))?;

    let result = host.process(key);
    host.uninit();

    let result = result.map_err(|e| miette!("{}", e))?;
    output::item_result(key, result.type_tag(), &result.to_string());

    Ok(())
}
