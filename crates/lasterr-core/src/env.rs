//! Environment variable utilities
//!
//! Every lasterr knob is an optional `LASTERR_*` variable read through
//! these helpers. Unset or unparsable values fall back to the default.
//!
//! ```ignore
//! use lasterr_core::env::{env_get, env_get_bool};
//!
//! let level: LogLevel = env_get("LASTERR_LOG_LEVEL", LogLevel::Warn);
//! let trace: bool = env_get_bool("LASTERR_TRACE_RECORDS", false);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Get environment variable as boolean
///
/// "1", "true", "yes", "on" (case-insensitive) are true and "0", "false",
/// "no", "off" are false. Anything else, including unset, returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// `Some(T)` if the variable is set and parses, `None` otherwise.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_default() {
        let val: usize = env_get("__LASTERR_TEST_UNSET__", 42);
        assert_eq!(val, 42);
    }

    #[test]
    fn test_env_get_opt_none() {
        let val: Option<u8> = env_get_opt("__LASTERR_TEST_UNSET__");
        assert!(val.is_none());
    }

    #[test]
    fn test_env_get_parsed() {
        std::env::set_var("__LASTERR_TEST_NUM__", " 17 ");
        let val: i32 = env_get("__LASTERR_TEST_NUM__", 0);
        assert_eq!(val, 17);
        std::env::remove_var("__LASTERR_TEST_NUM__");
    }

    #[test]
    fn test_env_get_invalid_parse() {
        std::env::set_var("__LASTERR_TEST_BAD__", "not_a_number");
        let val: usize = env_get("__LASTERR_TEST_BAD__", 99);
        assert_eq!(val, 99);
        std::env::remove_var("__LASTERR_TEST_BAD__");
    }

    #[test]
    fn test_env_get_bool_variants() {
        let key = "__LASTERR_TEST_BOOL__";
        for yes in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var(key, yes);
            assert!(env_get_bool(key, false), "{yes} should be true");
        }
        for no in ["0", "false", "No", "off"] {
            std::env::set_var(key, no);
            assert!(!env_get_bool(key, true), "{no} should be false");
        }
        std::env::set_var(key, "garbage");
        assert!(env_get_bool(key, true));
        assert!(!env_get_bool(key, false));
        std::env::remove_var(key);
    }
}
