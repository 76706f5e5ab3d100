// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations on the store blob.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the
//! system CSPRNG and prefixes it to the output, so a sealed blob is
//! self-contained: `nonce(12) || ciphertext || tag(16)`. Nonce reuse would
//! be catastrophic for GCM security.

use passguard_core::PassguardError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use zeroize::Zeroizing;

use crate::rng::SecretRng;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext with AES-256-GCM under a random 96-bit nonce.
///
/// Returns one opaque blob: `nonce || ciphertext+tag`.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, PassguardError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| PassguardError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SecretRng::new().fill(&mut nonce_bytes)?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: the plaintext buffer is extended with the tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| PassguardError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + in_out.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&in_out);
    Ok(blob)
}

/// Decrypt a blob produced by [`seal`].
///
/// Returns [`PassguardError::AuthenticationFailure`] if the key is wrong or
/// the blob was corrupted or tampered with, including truncation below the
/// minimum `nonce + tag` size.
pub fn open(key: &[u8; KEY_LEN], blob: &[u8]) -> Result<Vec<u8>, PassguardError> {
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(PassguardError::AuthenticationFailure);
    }

    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| PassguardError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let mut nonce_arr = [0u8; NONCE_LEN];
    nonce_arr.copy_from_slice(nonce_bytes);
    let nonce = Nonce::assume_unique_for_key(nonce_arr);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| PassguardError::AuthenticationFailure)?;

    Ok(plaintext.to_vec())
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
pub fn generate_random_key() -> Result<Zeroizing<[u8; KEY_LEN]>, PassguardError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    SecretRng::new().fill(key.as_mut())?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = generate_random_key().unwrap();
        let plaintext = b"{\"bank.com\":{\"email\":\"u@e.com\",\"password\":\"p1\"}}";

        let blob = seal(&key, plaintext).unwrap();
        let decrypted = open(&key, &blob).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn seal_produces_different_blobs_for_same_plaintext() {
        let key = generate_random_key().unwrap();
        let blob1 = seal(&key, b"same input twice").unwrap();
        let blob2 = seal(&key, b"same input twice").unwrap();

        // Random nonces should differ, and with them the ciphertext.
        assert_ne!(blob1, blob2);
    }

    #[test]
    fn open_with_wrong_key_is_authentication_failure() {
        let key1 = generate_random_key().unwrap();
        let key2 = generate_random_key().unwrap();

        let blob = seal(&key1, b"secret data").unwrap();
        let result = open(&key2, &blob);

        assert!(matches!(result, Err(PassguardError::AuthenticationFailure)));
    }

    #[test]
    fn flipping_any_byte_fails_authentication() {
        let key = generate_random_key().unwrap();
        let blob = seal(&key, b"do not tamper").unwrap();

        for i in 0..blob.len() {
            let mut tampered = blob.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(open(&key, &tampered), Err(PassguardError::AuthenticationFailure)),
                "byte {i} flip went undetected"
            );
        }
    }

    #[test]
    fn truncated_blob_is_authentication_failure() {
        let key = generate_random_key().unwrap();
        let result = open(&key, &[0u8; 10]);
        assert!(matches!(result, Err(PassguardError::AuthenticationFailure)));
    }

    #[test]
    fn blob_layout_overhead() {
        let key = generate_random_key().unwrap();
        let blob = seal(&key, b"hello").unwrap();
        // 12-byte nonce prefix + plaintext + 16-byte tag.
        assert_eq!(blob.len(), 12 + 5 + 16);
    }
}
