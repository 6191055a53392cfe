//! Sample lifecycle module.
//!
//! Each hook builds its own [`Record`]; nothing carries over between calls,
//! so `init` has no effect on what `run` reports.

use crate::error::HookError;
use crate::hook::Lifecycle;
use crate::record::Record;
use crate::value::Value;

/// Name the sample module is registered under.
pub const SAMPLE_MODULE_NAME: &str = "sample";

/// Builds a record, fills it in and discards it.
pub fn init() -> String {
    let mut record = Record::new();
    record.set_name("test_user01");
    record.set_age(30);

    "init world".to_string()
}

/// Greets a fresh record after bumping its age once.
pub fn run() -> String {
    let mut record = Record::new();
    record.set_age(record.age() + 1);

    format!("hello world {} {}", record.name(), record.age())
}

pub fn uninit() -> String {
    "uninit world".to_string()
}

/// Stateless handler exposing the sample hooks through [`Lifecycle`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleModule;

impl Lifecycle for SampleModule {
    fn init(&mut self) -> Result<Value, HookError> {
        Ok(init().into())
    }

    fn run(&mut self) -> Result<Value, HookError> {
        Ok(run().into())
    }

    fn uninit(&mut self) -> Result<Value, HookError> {
        Ok(uninit().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::Hook;

    #[test]
    fn test_init() {
        assert_eq!(init(), "init world");
    }

    #[test]
    fn test_uninit() {
        assert_eq!(uninit(), "uninit world");
    }

    #[test]
    fn test_run_uses_zero_values() {
        assert_eq!(run(), "hello world  1");
        assert_eq!(run(), format!("hello world {} {}", "", 1));
    }

    #[test]
    fn test_run_is_repeatable() {
        let first = run();
        for _ in 0..5 {
            assert_eq!(run(), first);
        }
    }

    #[test]
    fn test_init_does_not_leak_into_run() {
        init();
        assert_eq!(run(), "hello world  1");
    }

    #[test]
    fn test_module_hooks() {
        let mut module = SampleModule;

        let results: Vec<Value> = Hook::ALL
            .into_iter()
            .map(|hook| module.call(hook).unwrap())
            .collect();

        assert_eq!(
            results,
            vec![
                Value::from("init world"),
                Value::from("hello world  1"),
                Value::from("uninit world"),
            ]
        );
    }
}
