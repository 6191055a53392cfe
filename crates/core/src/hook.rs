//! Lifecycle hooks and the trait modules implement to receive them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HookError;
use crate::value::Value;

/// One of the three phases a host drives a module through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hook {
    /// Called once after the module is loaded.
    Init,

    /// Called for every item request addressed to the module.
    Run,

    /// Called once before the module is dropped.
    Uninit,
}

impl Hook {
    /// All hooks, in the order a host calls them.
    pub const ALL: [Hook; 3] = [Hook::Init, Hook::Run, Hook::Uninit];

    /// Name of the function a module exports for this hook.
    pub fn export_name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Run => "run",
            Self::Uninit => "uninit",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.export_name())
    }
}

impl FromStr for Hook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|hook| hook.export_name() == s)
            .ok_or_else(|| format!("unknown hook '{}'", s))
    }
}

/// A module that can be driven through init, run and uninit.
///
/// Hosts call the hooks in that order but modules must not rely on it:
/// every hook is independently callable.
pub trait Lifecycle {
    fn init(&mut self) -> Result<Value, HookError>;

    fn run(&mut self) -> Result<Value, HookError>;

    fn uninit(&mut self) -> Result<Value, HookError>;

    /// Dispatches to the method for `hook`.
    fn call(&mut self, hook: Hook) -> Result<Value, HookError> {
        match hook {
            Hook::Init => self.init(),
            Hook::Run => self.run(),
            Hook::Uninit => self.uninit(),
        }
    }
}

impl<L: Lifecycle + ?Sized> Lifecycle for Box<L> {
    fn init(&mut self) -> Result<Value, HookError> {
        (**self).init()
    }

    fn run(&mut self) -> Result<Value, HookError> {
        (**self).run()
    }

    fn uninit(&mut self) -> Result<Value, HookError> {
        (**self).uninit()
    }
}
