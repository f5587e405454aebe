//! Environment variable parsing utilities
//!
//! Missing variables fall back to a default; present but unparsable values are
//! reported instead of being silently replaced.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is unset.
///
/// # Example
/// ```ignore
/// let max: u32 = parse_env_or("DB_MAX_CONNECTIONS", 20)?;
/// ```
pub fn parse_env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse {}='{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Parse an environment variable, returning None if it is unset.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Result<Option<T>, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("Failed to parse {}='{}'", key, raw)),
        Err(_) => Ok(None),
    }
}

/// Read a required environment variable.
pub fn require_env(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("{} environment variable not set", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn parse_env_or_uses_default_when_unset() {
        std::env::remove_var("DB_POOL_TEST_UNSET");
        let value: u32 = parse_env_or("DB_POOL_TEST_UNSET", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    #[serial_test::serial]
    fn parse_env_or_reads_value() {
        std::env::set_var("DB_POOL_TEST_PORT", " 8080 ");
        let value: u16 = parse_env_or("DB_POOL_TEST_PORT", 3000).unwrap();
        assert_eq!(value, 8080);
        std::env::remove_var("DB_POOL_TEST_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn parse_env_or_rejects_garbage() {
        std::env::set_var("DB_POOL_TEST_BAD", "lots");
        let result: Result<u32, _> = parse_env_or("DB_POOL_TEST_BAD", 1);
        let err = result.unwrap_err();
        assert!(err.contains("DB_POOL_TEST_BAD"));
        std::env::remove_var("DB_POOL_TEST_BAD");
    }

    #[test]
    #[serial_test::serial]
    fn parse_env_optional_distinguishes_unset() {
        std::env::remove_var("DB_POOL_TEST_OPT");
        assert_eq!(parse_env_optional::<u32>("DB_POOL_TEST_OPT"), Ok(None));

        std::env::set_var("DB_POOL_TEST_OPT", "123");
        assert_eq!(parse_env_optional::<u32>("DB_POOL_TEST_OPT"), Ok(Some(123)));
        std::env::remove_var("DB_POOL_TEST_OPT");
    }

    #[test]
    #[serial_test::serial]
    fn require_env_reports_missing_key() {
        std::env::remove_var("DB_POOL_TEST_REQ");
        let err = require_env("DB_POOL_TEST_REQ").unwrap_err();
        assert!(err.contains("DB_POOL_TEST_REQ"));
    }
}
