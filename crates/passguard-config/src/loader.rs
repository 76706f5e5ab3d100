// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./passguard.toml` > `~/.config/passguard/passguard.toml`
//! > `/etc/passguard/passguard.toml` with environment variable overrides via
//! the `PASSGUARD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PassguardConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/passguard/passguard.toml` (system-wide)
/// 3. `~/.config/passguard/passguard.toml` (user XDG config)
/// 4. `./passguard.toml` (local directory)
/// 5. `PASSGUARD_*` environment variables
pub fn load_config() -> Result<PassguardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PassguardConfig::default()))
        .merge(Toml::file("/etc/passguard/passguard.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("passguard/passguard.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("passguard.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PassguardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PassguardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PASSGUARD_VAULT_KDF_ITERATIONS` must map
/// to `vault.kdf_iterations`, not `vault.kdf.iterations`.
fn env_provider() -> Env {
    Env::prefixed("PASSGUARD_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("vault_", "vault.", 1)
            .replacen("clipboard_", "clipboard.", 1);
        mapped.into()
    })
}
