// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Passguard credential vault.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across all Passguard crates.
#[derive(Debug, Error)]
pub enum PassguardError {
    /// A required user-supplied field was blank after trimming.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// The two entries of a new passphrase did not match. Recoverable:
    /// key setup falls back to the unencrypted policy.
    #[error("passphrases do not match")]
    PassphraseMismatch,

    /// AEAD authentication failed: wrong key, or the stored blob was
    /// corrupted or tampered with. Deliberately distinct from "file absent",
    /// which is not an error at all.
    #[error("vault authentication failed: wrong key or corrupted data")]
    AuthenticationFailure,

    /// The platform credential store could not be reached. Non-fatal:
    /// callers fall back to the passphrase flow.
    #[error("credential store unavailable: {0}")]
    CredentialStoreUnavailable(String),

    /// No key is stored in the credential store.
    #[error("no key found in the credential store")]
    KeyNotFound,

    /// The KDF salt file is missing or corrupt while an encrypted store
    /// exists. Regenerating the salt would silently orphan all previously
    /// encrypted data, so this is a hard error.
    #[error("salt file missing or corrupt but an encrypted store exists; cannot re-derive the vault key")]
    SaltMissing,

    /// Cryptographic primitive failure (key creation, seal, derivation).
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Filesystem failure with the path that triggered it.
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization of the credential map failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors surfaced from the config crate.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PassguardError {
    /// Attach a path to an `std::io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
