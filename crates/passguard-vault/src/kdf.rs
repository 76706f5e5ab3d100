// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a master passphrase.
//!
//! The salt is 16 bytes, persisted once per installation, and never
//! regenerated while encrypted data exists: a fresh salt would derive a key
//! that silently fails to decrypt everything stored before it.

use std::num::NonZeroU32;

use passguard_core::PassguardError;
use ring::pbkdf2;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::paths::VaultPaths;
use crate::rng::SecretRng;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derive a 32-byte key from a passphrase via PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same `(passphrase, salt, iterations)` always yields
/// the same key, which is what lets the vault be re-opened across sessions.
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, PassguardError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| PassguardError::Crypto("KDF iteration count must be non-zero".into()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        passphrase,
        key.as_mut(),
    );

    debug!("derived vault key from passphrase via PBKDF2-HMAC-SHA256");
    Ok(key)
}

/// Load the persisted salt, or create it for a fresh installation.
///
/// A missing or wrong-length salt file while the encrypted store exists is a
/// hard error ([`PassguardError::SaltMissing`]): regenerating would produce
/// a key that cannot decrypt the existing ciphertext, with no detectable
/// error at decryption time being the *best* case.
pub fn load_or_create_salt(
    paths: &VaultPaths,
    rng: &SecretRng,
) -> Result<[u8; SALT_LEN], PassguardError> {
    let salt_path = paths.salt_file();
    let ciphertext_exists = paths.encrypted_store().is_file();

    match paths.read(&salt_path)? {
        Some(bytes) => match <[u8; SALT_LEN]>::try_from(bytes.as_slice()) {
            Ok(salt) => Ok(salt),
            Err(_) if ciphertext_exists => Err(PassguardError::SaltMissing),
            Err(_) => {
                info!("salt file corrupt on fresh installation; regenerating");
                create_salt(paths, rng, &salt_path)
            }
        },
        None if ciphertext_exists => Err(PassguardError::SaltMissing),
        None => create_salt(paths, rng, &salt_path),
    }
}

fn create_salt(
    paths: &VaultPaths,
    rng: &SecretRng,
    salt_path: &std::path::Path,
) -> Result<[u8; SALT_LEN], PassguardError> {
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)?;
    paths.write_atomic(salt_path, &salt)?;
    info!(path = %salt_path.display(), "created new KDF salt");
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count for fast tests; production minimum is enforced by
    // config validation, not here.
    const TEST_ITERS: u32 = 1000;

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [1u8; SALT_LEN];
        let key1 = derive_key(b"test passphrase", &salt, TEST_ITERS).unwrap();
        let key2 = derive_key(b"test passphrase", &salt, TEST_ITERS).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn different_passphrase_produces_different_key() {
        let salt = [2u8; SALT_LEN];
        let key1 = derive_key(b"passphrase one", &salt, TEST_ITERS).unwrap();
        let key2 = derive_key(b"passphrase two", &salt, TEST_ITERS).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salt_produces_different_key() {
        let key1 = derive_key(b"same passphrase", &[1u8; SALT_LEN], TEST_ITERS).unwrap();
        let key2 = derive_key(b"same passphrase", &[2u8; SALT_LEN], TEST_ITERS).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_iterations_produce_different_key() {
        let salt = [3u8; SALT_LEN];
        let key1 = derive_key(b"pw", &salt, TEST_ITERS).unwrap();
        let key2 = derive_key(b"pw", &salt, TEST_ITERS + 1).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn zero_iterations_is_rejected() {
        assert!(derive_key(b"pw", &[0u8; SALT_LEN], 0).is_err());
    }

    #[test]
    fn salt_is_created_once_and_stable() {
        let dir = tempfile::tempdir().unwrap();
        let paths = VaultPaths::new(dir.path());
        let rng = SecretRng::new();

        let salt1 = load_or_create_salt(&paths, &rng).unwrap();
        let salt2 = load_or_create_salt(&paths, &rng).unwrap();
        assert_eq!(salt1, salt2);
        assert!(paths.salt_file().is_file());
    }

    #[test]
    fn missing_salt_with_ciphertext_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = VaultPaths::new(dir.path());
        let rng = SecretRng::new();

        // Simulate an installation that has ciphertext but lost its salt.
        paths
            .write_atomic(&paths.encrypted_store(), b"opaque blob")
            .unwrap();

        let result = load_or_create_salt(&paths, &rng);
        assert!(matches!(result, Err(PassguardError::SaltMissing)));
    }

    #[test]
    fn corrupt_salt_with_ciphertext_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = VaultPaths::new(dir.path());
        let rng = SecretRng::new();

        paths.write_atomic(&paths.salt_file(), b"short").unwrap();
        paths
            .write_atomic(&paths.encrypted_store(), b"opaque blob")
            .unwrap();

        let result = load_or_create_salt(&paths, &rng);
        assert!(matches!(result, Err(PassguardError::SaltMissing)));
    }

    #[test]
    fn corrupt_salt_without_ciphertext_regenerates() {
        let dir = tempfile::tempdir().unwrap();
        let paths = VaultPaths::new(dir.path());
        let rng = SecretRng::new();

        paths.write_atomic(&paths.salt_file(), b"short").unwrap();

        let salt = load_or_create_salt(&paths, &rng).unwrap();
        assert_eq!(salt.len(), SALT_LEN);
        // The regenerated salt is persisted.
        let on_disk = paths.read(&paths.salt_file()).unwrap().unwrap();
        assert_eq!(on_disk, salt.to_vec());
    }
}
