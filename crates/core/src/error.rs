//! Error types for agentmod.

use thiserror::Error;

use crate::hook::Hook;

/// Result type alias for agentmod operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Main error type for agent-facing operations.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid item key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Unsupported item key '{0}'")]
    UnsupportedKey(String),

    #[error("Item key '{key}' requires parameter {index}")]
    MissingParameter { key: String, index: usize },
}

impl AgentError {
    pub(crate) fn invalid_key(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure of a single lifecycle hook call.
#[derive(Debug, Clone, Error)]
#[error("{hook} hook failed: {message}")]
pub struct HookError {
    pub hook: Hook,
    pub message: String,
}

impl HookError {
    pub fn new(hook: Hook, message: impl Into<String>) -> Self {
        Self {
            hook,
            message: message.into(),
        }
    }
}
