//! Environment variable handling for the Paygate application.
//!
//! This module provides utilities for working with environment variables in a
//! standardized way. Secret values referenced from the config via the
//! "secret_from_env" marker are resolved here.

use std::env;

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "PAYGATE_SECRET";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Convert a secret path to an environment variable name
///
/// # Arguments
///
/// * `path` - The secret path (e.g., "gateway.access_code")
///
/// # Returns
///
/// The environment variable name (e.g., "PAYGATE_SECRET_GATEWAY_ACCESS_CODE")
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a legacy secret path to an environment variable name
///
/// This function is used for backward compatibility with the old naming pattern.
///
/// # Arguments
///
/// * `path` - The secret path (e.g., "gateway.access_code")
///
/// # Returns
///
/// The environment variable name (e.g., "GATEWAY_ACCESS_CODE")
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a secret path
///
/// This function tries to get the environment variable using the new naming pattern.
/// If the variable is not found, it falls back to the old naming pattern.
///
/// # Arguments
///
/// * `path` - The secret path (e.g., "gateway.secret_key")
///
/// # Returns
///
/// The environment variable value, if found
pub fn get_secret_env_var(path: &str) -> Option<String> {
    // Try the new naming pattern
    let env_var = secret_path_to_env_var(path);
    if let Ok(value) = env::var(&env_var) {
        return Some(value);
    }

    // Fall back to the old naming pattern
    let legacy_env_var = legacy_secret_path_to_env_var(path);
    env::var(&legacy_env_var).ok()
}
