// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Passguard vault.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `PASSGUARD_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! use passguard_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("KDF iterations: {}", config.vault.kdf_iterations);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_str};
pub use model::{ClipboardConfig, PassguardConfig, VaultConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `PassguardConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<PassguardConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Other(err.to_string())]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<PassguardConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Other(err.to_string())]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = load_and_validate_str("").expect("defaults should validate");
        assert_eq!(config.vault.kdf_iterations, 390_000);
        assert_eq!(config.clipboard.clear_secs, 10);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result = load_and_validate_str("[vault]\nkdf_iteratoins = 5\n");
        assert!(result.is_err());
    }
}
