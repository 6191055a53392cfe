//! CLI command implementations.

pub mod get;
pub mod init;
pub mod list;
pub mod sample;

use agentmod_core::SampleModule;
use agentmod_core::sample::SAMPLE_MODULE_NAME;
use agentmod_plugin::{HostConfig, ModuleHost};
use miette::{Result, miette};

/// Creates a host with the built-in sample module registered.
pub fn host_with_sample(config: HostConfig) -> Result<ModuleHost> {
    let mut host =
        ModuleHost::new(config).map_err(|e| miette!("Failed to create module host: {}", e))?;
    host.register(SAMPLE_MODULE_NAME, Box::new(SampleModule));
    Ok(host)
}
