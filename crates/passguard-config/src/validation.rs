// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as minimum KDF work factors.

use crate::diagnostic::ConfigError;
use crate::model::PassguardConfig;

/// Minimum accepted PBKDF2 iteration count. Below this the passphrase path
/// no longer provides a meaningful work factor.
const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PassguardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if let Some(dir) = &config.vault.data_dir
        && dir.as_os_str().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "vault.data_dir must not be empty when set".to_string(),
        });
    }

    if config.clipboard.clear_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "clipboard.clear_secs must be at least 1".to_string(),
        });
    }

    let level = config.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!("log_level `{level}` is not one of trace/debug/info/warn/error"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
