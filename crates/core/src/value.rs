//! Values returned by hooks and results handed back to the agent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value returned by a lifecycle hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The hook returned nothing.
    #[default]
    Nil,

    /// Text result.
    Text(String),

    /// Floating point result.
    Float(f64),

    /// Integer result.
    Int(i64),
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Float(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
        }
    }
}

/// The result of an item request, as the agent stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemResult {
    Text(String),
    Double(f64),
}

impl ItemResult {
    /// The empty text result, used whenever a module produced nothing usable.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Single-letter type tag: `t` for text, `d` for double.
    pub fn type_tag(&self) -> char {
        match self {
            Self::Text(_) => 't',
            Self::Double(_) => 'd',
        }
    }
}

impl From<Value> for ItemResult {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => Self::Text(s),
            Value::Float(f) => Self::Double(f),
            Value::Int(i) => Self::Double(i as f64),
            Value::Nil => Self::empty(),
        }
    }
}

impl fmt::Display for ItemResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Double(v) => write!(f, "{:.6}", v),
        }
    }
}
