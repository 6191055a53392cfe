//! Sample command implementation.

use agentmod_core::{Hook, Lifecycle, SampleModule};
use miette::{Result, miette};

use crate::output;

/// Calls init, run and uninit on the built-in sample module.
pub fn execute() -> Result<()> {
    let mut module = SampleModule;

    for hook in Hook::ALL {
        match module.call(hook) {
            Ok(value) => output::hook_result(hook.export_name(), &value.to_string()),
            Err(e) => {
                output::hook_failed(hook.export_name(), &e.message);
                return Err(miette!("{}", e));
            }
        }
    }

    Ok(())
}
