//! Agent item keys and the metric table a module advertises.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// A parsed item key of the form `name[param1,param2,...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemKey {
    /// Key name before the bracket.
    pub name: String,

    /// Parameters with quoting removed.
    pub params: Vec<String>,
}

impl ItemKey {
    /// Parses an item key.
    pub fn parse(input: &str) -> Result<Self> {
        let (name, rest) = match input.find('[') {
            Some(pos) => (&input[..pos], Some(&input[pos + 1..])),
            None => (input, None),
        };

        if name.is_empty() {
            return Err(AgentError::invalid_key(input, "empty key name"));
        }

        if let Some(c) = name.chars().find(|c| !is_key_char(*c)) {
            return Err(AgentError::invalid_key(
                input,
                format!("invalid character '{}' in key name", c),
            ));
        }

        let params = match rest {
            Some(rest) => parse_params(input, rest)?,
            None => Vec::new(),
        };

        Ok(Self {
            name: name.to_string(),
            params,
        })
    }

    /// Returns the parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Returns the parameter at `index` or a missing-parameter error.
    pub fn required_param(&self, index: usize) -> Result<&str> {
        self.param(index).ok_or_else(|| AgentError::MissingParameter {
            key: self.name.clone(),
            index,
        })
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;

        if self.params.is_empty() {
            return Ok(());
        }

        f.write_str("[")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if param.contains([',', ']', '"']) || param.starts_with(' ') {
                let escaped = param.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{}\"", escaped)?;
            } else {
                f.write_str(param)?;
            }
        }
        f.write_str("]")
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Parses the text after the opening bracket, up to and including the final `]`.
fn parse_params(key: &str, body: &str) -> Result<Vec<String>> {
    let mut params = Vec::new();
    let mut chars = body.chars().peekable();

    loop {
        while chars.peek() == Some(&' ') {
            chars.next();
        }

        let mut param = String::new();

        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('\\') if matches!(chars.peek(), Some(&'"') | Some(&'\\')) => {
                        param.extend(chars.next());
                    }
                    Some('"') => break,
                    Some(c) => param.push(c),
                    None => {
                        return Err(AgentError::invalid_key(key, "unterminated quoted parameter"));
                    }
                }
            }
            while chars.peek() == Some(&' ') {
                chars.next();
            }
            match chars.peek() {
                Some(',') | Some(']') => {}
                Some(c) => {
                    return Err(AgentError::invalid_key(
                        key,
                        format!("unexpected '{}' after quoted parameter", c),
                    ));
                }
                None => return Err(AgentError::invalid_key(key, "missing closing bracket")),
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' || c == ']' {
                    break;
                }
                param.push(c);
                chars.next();
            }
        }

        params.push(param);

        match chars.next() {
            Some(',') => continue,
            Some(']') => break,
            _ => return Err(AgentError::invalid_key(key, "missing closing bracket")),
        }
    }

    if chars.next().is_some() {
        return Err(AgentError::invalid_key(key, "trailing characters after ']'"));
    }

    Ok(params)
}

/// An item key a module supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    /// Key name.
    pub key: &'static str,

    /// Whether the key takes parameters.
    pub has_params: bool,

    /// Parameter used when testing the key.
    pub test_param: Option<&'static str>,

    /// Human-readable description.
    pub description: &'static str,
}

impl Metric {
    /// Returns the key with its test parameter, ready to be processed.
    pub fn test_key(&self) -> String {
        match self.test_param {
            Some(param) => format!("{}[{}]", self.key, param),
            None => self.key.to_string(),
        }
    }
}
