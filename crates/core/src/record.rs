//! The record held by the sample module.

use serde::{Deserialize, Serialize};

/// A named record with an age counter.
///
/// Both fields start out unset. Reads of an unset field return its zero
/// value: empty text for `name`, `0` for `age`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: Option<String>,
    age: Option<i64>,
}

impl Record {
    /// Creates a record with both fields unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name, or empty text if it was never set.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns the age, or `0` if it was never set.
    pub fn age(&self) -> i64 {
        self.age.unwrap_or_default()
    }

    pub fn set_age(&mut self, age: i64) {
        self.age = Some(age);
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    /// Sets the age.
    pub fn with_age(mut self, age: i64) -> Self {
        self.set_age(age);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_read_as_zero_values() {
        let record = Record::new();
        assert_eq!(record.name(), "");
        assert_eq!(record.age(), 0);
    }

    #[test]
    fn test_fields_are_independent() {
        let mut record = Record::new();
        record.set_age(30);
        assert_eq!(record.age(), 30);
        assert_eq!(record.name(), "");

        record.set_name("test_user01");
        assert_eq!(record.name(), "test_user01");
        assert_eq!(record.age(), 30);
    }

    #[test]
    fn test_no_validation() {
        let record = Record::new().with_age(-5).with_name("");
        assert_eq!(record.age(), -5);
        assert_eq!(record.name(), "");
    }

    #[test]
    fn test_serialize_keeps_unset_fields_distinct() {
        let json = serde_json::to_string(&Record::new().with_age(1)).unwrap();
        assert_eq!(json, r#"{"name":null,"age":1}"#);
    }
}
