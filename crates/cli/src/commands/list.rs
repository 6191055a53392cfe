//! List command implementation.

use std::path::Path;

use agentmod_core::sample::SAMPLE_MODULE_NAME;
use agentmod_plugin::{HostConfig, ModuleHost, PluginManifest};
use console::style;
use miette::{Result, miette};

use crate::commands::host_with_sample;
use crate::output;

/// Lists supported item keys and the modules the host would load.
pub fn execute(config: HostConfig, detailed: bool) -> Result<()> {
    let mut host = host_with_sample(config)?;
    let plugin_path = host.config().plugin_path();

    host.discover()
        .map_err(|e| miette!("Failed to scan {}: {}", plugin_path.display(), e))?;

    output::section_header("Item keys");
    for metric in host.item_list() {
        if detailed {
            println!("  {}", style(metric.key).cyan().bold());
            println!("    {}", style(metric.description).dim());
            println!("    Test: {}", style(metric.test_key()).dim());
        } else {
            output::list_item(&format!(
                "{} - {}",
                metric.key,
                style(metric.description).dim()
            ));
        }
    }

    output::section_header("Modules");
    if !plugin_path.is_dir() {
        output::warning(&format!(
            "Plugin directory {} does not exist",
            plugin_path.display()
        ));
    }

    for name in host.modules() {
        if name == SAMPLE_MODULE_NAME {
            output::list_item(&format!("{} {}", name, style("(built-in)").yellow()));
        } else {
            output::list_item(name);
        }
    }

    if detailed {
        print_details(&host, &plugin_path)?;
    }

    Ok(())
}

fn print_details(host: &ModuleHost, plugin_path: &Path) -> Result<()> {
    output::section_header("Host");
    output::key_value("API version", &host.api_version().to_string());
    output::key_value("Plugin directory", &plugin_path.display().to_string());
    output::key_value("Item timeout", &format!("{}s", host.item_timeout()));

    for name in host.modules() {
        let path = plugin_path.join(name);
        if !path.is_file() {
            continue;
        }
        let manifest = PluginManifest::for_plugin(&path)
            .map_err(|e| miette!("Invalid manifest for {}: {}", name, e))?;
        if let Some(manifest) = manifest {
            output::section_header(name);
            output::key_value("Name", &manifest.plugin.name);
            output::key_value("Version", &manifest.plugin.version);
            if let Some(desc) = &manifest.plugin.description {
                output::key_value("Description", desc);
            }
            if let Some(author) = &manifest.plugin.author {
                output::key_value("Author", author);
            }
        }
    }

    Ok(())
}
