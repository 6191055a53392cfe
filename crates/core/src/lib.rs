//! agentmod core - Core types and traits for agentmod.

mod error;
mod hook;
mod item;
mod record;
pub mod sample;
mod value;

pub use error::{AgentError, HookError, Result};
pub use hook::{Hook, Lifecycle};
pub use item::{ItemKey, Metric};
pub use record::Record;
pub use sample::SampleModule;
pub use value::{ItemResult, Value};
