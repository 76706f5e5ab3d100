// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Passguard vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Passguard configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PassguardConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Vault storage and key-derivation settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Clipboard behavior for the CLI.
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

impl Default for PassguardConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            vault: VaultConfig::default(),
            clipboard: ClipboardConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Vault storage and key-derivation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count for the passphrase path.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Override for the per-user data directory. `None` uses
    /// `dirs::data_dir()/passguard`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            data_dir: None,
        }
    }
}

fn default_kdf_iterations() -> u32 {
    390_000
}

/// Clipboard configuration for the CLI presentation layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClipboardConfig {
    /// Seconds before a copied password is cleared from the clipboard.
    #[serde(default = "default_clear_secs")]
    pub clear_secs: u64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            clear_secs: default_clear_secs(),
        }
    }
}

fn default_clear_secs() -> u64 {
    10
}
