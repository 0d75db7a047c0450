//! Environment variable loading utilities
//!
//! All Notebook settings share the `NOTEBOOK_` prefix; [`EnvLoader`] builds
//! the full variable name from a suffix and handles parsing and defaults.

use std::env;
use std::str::FromStr;

/// Builder for loading multiple environment variables with consistent prefix
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Full variable name for `suffix`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Load a string value; unset and blank values both read as `None`
    pub fn load_string(&self, suffix: &str) -> Option<String> {
        env::var(self.key(suffix))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Load a parsed value with default; unparseable values fall back too
    pub fn load_parsed<T>(&self, suffix: &str, default: T) -> T
    where
        T: FromStr,
    {
        self.load_optional(suffix).unwrap_or(default)
    }

    /// Load an optional parsed value
    pub fn load_optional<T>(&self, suffix: &str) -> Option<T>
    where
        T: FromStr,
    {
        let key = self.key(suffix);
        let raw = self.load_string(suffix)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparseable value '{}' for {}", raw, key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_string() {
        let loader = EnvLoader::new("NOTEBOOK_TEST");
        env::remove_var("NOTEBOOK_TEST_NAME");
        assert_eq!(loader.load_string("NAME"), None);

        env::set_var("NOTEBOOK_TEST_NAME", "  value ");
        assert_eq!(loader.load_string("NAME").as_deref(), Some("value"));

        env::set_var("NOTEBOOK_TEST_NAME", "   ");
        assert_eq!(loader.load_string("NAME"), None);

        env::remove_var("NOTEBOOK_TEST_NAME");
    }

    #[test]
    #[serial]
    fn test_load_parsed() {
        let loader = EnvLoader::new("NOTEBOOK_TEST");
        env::remove_var("NOTEBOOK_TEST_TIMEOUT");
        assert_eq!(loader.load_parsed("TIMEOUT", 10u64), 10);

        env::set_var("NOTEBOOK_TEST_TIMEOUT", "30");
        assert_eq!(loader.load_parsed("TIMEOUT", 10u64), 30);

        env::set_var("NOTEBOOK_TEST_TIMEOUT", "soon");
        assert_eq!(loader.load_parsed("TIMEOUT", 10u64), 10);
        assert_eq!(loader.load_optional::<u64>("TIMEOUT"), None);

        env::remove_var("NOTEBOOK_TEST_TIMEOUT");
    }

    #[test]
    fn test_key() {
        assert_eq!(EnvLoader::new("NOTEBOOK").key("HOME"), "NOTEBOOK_HOME");
    }
}
