//! Configuration access utilities
//!
//! Configuration structs read their values through [`EnvSource`] rather than
//! calling `std::env::var` directly, so tests can hand in a plain map instead
//! of mutating the process environment.

use std::collections::HashMap;
use std::str::FromStr;

/// A source of configuration key/value pairs
pub trait EnvSource {
    /// Raw lookup of `key`
    fn raw(&self, key: &str) -> Option<String>;

    /// Get a value, treating empty or whitespace-only values as unset
    fn get(&self, key: &str) -> Option<String> {
        self.raw(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get and parse a value.
    ///
    /// Returns `Ok(None)` when the key is unset and `Err` with the offending
    /// raw value when it is set but does not parse.
    fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        match self.get(key) {
            Some(value) => value.parse().map(Some).map_err(|_| value),
            None => Ok(None),
        }
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn raw(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn raw(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| (*value).to_string())
    }
}
