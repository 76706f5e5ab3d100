// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential-store collaborator holding the vault key.
//!
//! The stored value is always the encryption key itself, never a user
//! passphrase: compromise of the store must not also leak a password the
//! user may reuse elsewhere.
//!
//! [`FileKeychain`] is the cross-platform implementation. It keeps the vault
//! key AES-256-GCM-wrapped under a key derived from machine-specific data
//! (hostname, username) plus an application salt. Not as strong as a real
//! OS keychain, but the vault key is never written in plaintext and the file
//! is owner-only.

use std::path::{Path, PathBuf};

use passguard_core::PassguardError;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{self, KEY_LEN};
use crate::kdf::{self, SALT_LEN};

/// Application salt mixed into the device-derived wrapping key. Changing it
/// invalidates every previously stored vault key.
const APP_SALT: &[u8; SALT_LEN] = b"passguard-keyv1\x00";

/// Work factor for the device-derived wrapping key. Lower than the
/// passphrase path: the input material is not a low-entropy human secret.
const WRAP_ITERATIONS: u32 = 100_000;

/// Abstraction over platform credential stores.
///
/// All failures are best-effort signals; callers degrade to the passphrase
/// flow rather than crash.
pub trait KeychainProvider {
    /// Retrieve the stored vault key.
    ///
    /// Returns [`PassguardError::KeyNotFound`] if no key has been stored.
    fn get_key(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, PassguardError>;

    /// Store (or overwrite) the vault key.
    fn set_key(&self, key: &[u8; KEY_LEN]) -> Result<(), PassguardError>;

    /// Check whether a vault key has been stored.
    fn has_key(&self) -> Result<bool, PassguardError>;

    /// Delete the stored vault key.
    fn delete_key(&self) -> Result<(), PassguardError>;
}

/// File-backed credential store wrapping the vault key under a
/// device-derived key.
///
/// File layout: `nonce(12) || wrapped key || tag(16)` (the [`crypto::seal`]
/// blob format).
pub struct FileKeychain {
    key_file: PathBuf,
}

impl FileKeychain {
    pub fn new(key_file: impl Into<PathBuf>) -> Self {
        Self {
            key_file: key_file.into(),
        }
    }

    /// Wrapping key from hostname + username + application salt.
    ///
    /// Deterministic per machine/user, so the same installation can always
    /// unwrap its own key file.
    fn device_key(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, PassguardError> {
        let hostname = hostname();
        let username = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown-user".into());

        let mut material = Vec::with_capacity(hostname.len() + username.len() + APP_SALT.len());
        material.extend_from_slice(hostname.as_bytes());
        material.extend_from_slice(username.as_bytes());
        material.extend_from_slice(APP_SALT);

        kdf::derive_key(&material, APP_SALT, WRAP_ITERATIONS)
    }
}

impl KeychainProvider for FileKeychain {
    fn get_key(&self) -> Result<Zeroizing<[u8; KEY_LEN]>, PassguardError> {
        let blob = match std::fs::read(&self.key_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PassguardError::KeyNotFound);
            }
            Err(e) => {
                return Err(PassguardError::CredentialStoreUnavailable(format!(
                    "cannot read {}: {e}",
                    self.key_file.display()
                )));
            }
        };

        let device_key = self.device_key()?;
        let unwrapped = crypto::open(&device_key, &blob).map_err(|_| {
            PassguardError::CredentialStoreUnavailable(
                "stored vault key is corrupt or was written on another machine".to_string(),
            )
        })?;

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        if unwrapped.len() != KEY_LEN {
            return Err(PassguardError::CredentialStoreUnavailable(
                "stored vault key has the wrong length".to_string(),
            ));
        }
        key.copy_from_slice(&unwrapped);
        debug!("retrieved vault key from file keychain");
        Ok(key)
    }

    fn set_key(&self, key: &[u8; KEY_LEN]) -> Result<(), PassguardError> {
        use std::io::Write;

        let device_key = self.device_key()?;
        let blob = crypto::seal(&device_key, key)?;

        let parent = self
            .key_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| {
            PassguardError::CredentialStoreUnavailable(format!(
                "cannot create {}: {e}",
                parent.display()
            ))
        })?;

        // The wrapped key is the only copy of the vault key: write through a
        // temp file restricted to the owner, then rename into place, so a
        // crash mid-write can never leave a truncated or world-readable file.
        let unavailable = |e: std::io::Error| {
            PassguardError::CredentialStoreUnavailable(format!(
                "cannot write {}: {e}",
                self.key_file.display()
            ))
        };
        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(unavailable)?;
        tmp.write_all(&blob).map_err(unavailable)?;
        tmp.as_file().sync_all().map_err(unavailable)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(unavailable)?;
        }
        tmp.persist(&self.key_file)
            .map_err(|e| unavailable(e.error))?;

        info!(path = %self.key_file.display(), "stored vault key in file keychain");
        Ok(())
    }

    fn has_key(&self) -> Result<bool, PassguardError> {
        Ok(self.key_file.is_file())
    }

    fn delete_key(&self) -> Result<(), PassguardError> {
        if self.key_file.is_file() {
            std::fs::remove_file(&self.key_file)
                .map_err(|e| PassguardError::io(&self.key_file, e))?;
            info!(path = %self.key_file.display(), "deleted vault key from file keychain");
        }
        Ok(())
    }
}

fn hostname() -> String {
    #[cfg(unix)]
    {
        std::fs::read_to_string("/etc/hostname")
            .map(|s| s.trim().to_string())
            .or_else(|_| std::env::var("HOSTNAME"))
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or_else(|_| "unknown-host".into())
    }

    #[cfg(not(unix))]
    {
        std::env::var("COMPUTERNAME")
            .or_else(|_| std::env::var("HOSTNAME"))
            .unwrap_or_else(|_| "unknown-host".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_vault_key() {
        let dir = tempfile::tempdir().unwrap();
        let keychain = FileKeychain::new(dir.path().join("vault.key"));

        assert!(!keychain.has_key().unwrap());

        let key = crypto::generate_random_key().unwrap();
        keychain.set_key(&key).unwrap();
        assert!(keychain.has_key().unwrap());

        let retrieved = keychain.get_key().unwrap();
        assert_eq!(*retrieved, *key);
    }

    #[test]
    fn get_missing_key_is_key_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let keychain = FileKeychain::new(dir.path().join("absent.key"));

        let result = keychain.get_key();
        assert!(matches!(result, Err(PassguardError::KeyNotFound)));
    }

    #[test]
    fn overwrite_replaces_stored_key() {
        let dir = tempfile::tempdir().unwrap();
        let keychain = FileKeychain::new(dir.path().join("vault.key"));

        let key1 = crypto::generate_random_key().unwrap();
        let key2 = crypto::generate_random_key().unwrap();
        keychain.set_key(&key1).unwrap();
        keychain.set_key(&key2).unwrap();

        assert_eq!(*keychain.get_key().unwrap(), *key2);
    }

    #[test]
    fn corrupt_key_file_degrades_to_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.key");
        std::fs::write(&path, b"garbage that is long enough to parse as a blob").unwrap();

        let keychain = FileKeychain::new(&path);
        let result = keychain.get_key();
        assert!(matches!(
            result,
            Err(PassguardError::CredentialStoreUnavailable(_))
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let keychain = FileKeychain::new(dir.path().join("vault.key"));

        let key = crypto::generate_random_key().unwrap();
        keychain.set_key(&key).unwrap();
        keychain.delete_key().unwrap();
        assert!(!keychain.has_key().unwrap());
        keychain.delete_key().unwrap();
    }

    #[test]
    fn set_key_leaves_no_temp_residue() {
        let dir = tempfile::tempdir().unwrap();
        let keychain = FileKeychain::new(dir.path().join("vault.key"));

        keychain
            .set_key(&crypto::generate_random_key().unwrap())
            .unwrap();
        keychain
            .set_key(&crypto::generate_random_key().unwrap())
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("vault.key")]);
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.key");
        let keychain = FileKeychain::new(&path);
        keychain
            .set_key(&crypto::generate_random_key().unwrap())
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
