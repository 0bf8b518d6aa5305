//! Small name -> integer settings registry (spec.md §6 "Options").
//!
//! Exact-match lookup only; unknown names are a [`crate::errors::Error::BadArg`],
//! matching the external interface's "returns the BAD_ARG code for unknown
//! names" contract.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::errors::{Error, Result};

fn registry() -> &'static Mutex<HashMap<&'static str, i64>> {
    static REGISTRY: OnceLock<Mutex<HashMap<&'static str, i64>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// A process-wide name -> integer option store.
pub struct Options;

impl Options {
    /// Register `name` with an initial value, so it can later be read with
    /// [`Options::get`] / written with [`Options::set`]. Re-registering an
    /// existing name resets its value.
    pub fn register(name: &'static str, initial: i64) {
        registry().lock().unwrap().insert(name, initial);
    }

    pub fn get(name: &str) -> Result<i64> {
        registry()
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .ok_or_else(|| Error::BadArg(format!("unknown option: {}", name)))
    }

    pub fn set(name: &str, value: i64) -> Result<()> {
        let mut guard = registry().lock().unwrap();
        match guard.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::BadArg(format!("unknown option: {}", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_option_is_bad_arg() {
        assert!(Options::get("does-not-exist-xyz").is_err());
        assert!(Options::set("does-not-exist-xyz", 1).is_err());
    }

    #[test]
    fn register_get_set_round_trip() {
        Options::register("options::test-knob", 5);
        assert_eq!(Options::get("options::test-knob").unwrap(), 5);
        Options::set("options::test-knob", 9).unwrap();
        assert_eq!(Options::get("options::test-knob").unwrap(), 9);
    }
}
