//! Environment variable parsing utilities.
//!
//! Configuration layers read optional overrides from the environment. These
//! helpers replace the repeated pattern:
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<u64>().ok())
//!     .unwrap_or(default_value)
//! ```
//!
//! # Example
//!
//! ```
//! use guardmine_types::env_utils::{env_var, env_var_or};
//!
//! let span: i64 = env_var_or("GUARDMINE_BOUNDARY_SPAN", 10);
//! let seed: Option<u64> = env_var("GUARDMINE_SEED");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Get an environment variable as a string with a default value.
///
/// Empty values count as unset.
///
/// ```
/// use guardmine_types::env_utils::env_string_or;
///
/// let fixture = env_string_or("GUARDMINE_FILE_FIXTURE_UNSET", "./fixtures/file.txt");
/// assert_eq!(fixture, "./fixtures/file.txt");
/// ```
pub fn env_string_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
