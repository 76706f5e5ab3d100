// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption policy state machine, evaluated once at startup.
//!
//! The policy and the derived key are decided before any store I/O and then
//! carried immutably in a [`VaultSession`]. Every failure during key setup
//! fails closed to [`EncryptionPolicy::Disabled`] with a notice, never to a
//! half-configured encrypted state.

use secrecy::ExposeSecret;
use tracing::{info, warn};
use zeroize::Zeroizing;

use passguard_core::PassguardError;

use crate::crypto::{self, KEY_LEN};
use crate::kdf;
use crate::keychain::KeychainProvider;
use crate::paths::VaultPaths;
use crate::prompt::Interaction;
use crate::rng::SecretRng;

/// How the store blob is protected for the lifetime of this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionPolicy {
    /// Plaintext JSON store.
    Disabled,
    /// AES-256-GCM under a random key held by the credential store.
    EnabledWithStoredKey,
    /// AES-256-GCM under a key derived from the master passphrase.
    EnabledWithPassphrase,
}

/// Immutable per-process session: the chosen policy, the key (when
/// encryption is on), and the artifact paths.
pub struct VaultSession {
    policy: EncryptionPolicy,
    key: Option<Zeroizing<[u8; KEY_LEN]>>,
    paths: VaultPaths,
}

impl VaultSession {
    pub fn policy(&self) -> EncryptionPolicy {
        self.policy
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    pub fn is_encrypted(&self) -> bool {
        self.policy != EncryptionPolicy::Disabled
    }

    /// The session key. `None` exactly when the policy is `Disabled`.
    pub(crate) fn key(&self) -> Option<&[u8; KEY_LEN]> {
        self.key.as_deref()
    }

    /// Plaintext session, used directly by non-interactive paths and tests.
    pub fn disabled(paths: VaultPaths) -> Self {
        Self {
            policy: EncryptionPolicy::Disabled,
            key: None,
            paths,
        }
    }

    /// Encrypted session with an already-obtained key.
    pub fn with_key(
        paths: VaultPaths,
        policy: EncryptionPolicy,
        key: Zeroizing<[u8; KEY_LEN]>,
    ) -> Result<Self, PassguardError> {
        if policy == EncryptionPolicy::Disabled {
            return Err(PassguardError::Internal(
                "disabled policy cannot carry a key".to_string(),
            ));
        }
        Ok(Self {
            policy,
            key: Some(key),
            paths,
        })
    }
}

// The key must never leak through Debug output.
impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("policy", &self.policy)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("paths", &self.paths)
            .finish()
    }
}

/// Interactive construction of a [`VaultSession`].
pub struct SessionBuilder<'a> {
    paths: VaultPaths,
    kdf_iterations: u32,
    keychain: &'a dyn KeychainProvider,
    interaction: &'a dyn Interaction,
}

impl<'a> SessionBuilder<'a> {
    pub fn new(
        paths: VaultPaths,
        kdf_iterations: u32,
        keychain: &'a dyn KeychainProvider,
        interaction: &'a dyn Interaction,
    ) -> Self {
        Self {
            paths,
            kdf_iterations,
            keychain,
            interaction,
        }
    }

    /// Run the policy decision flow and return the finished session.
    ///
    /// The flow itself is infallible: every failure path degrades to the
    /// plaintext policy with a notice. Only the final session construction
    /// can error, and only on programmer mistakes.
    pub fn init(self) -> Result<VaultSession, PassguardError> {
        let wants_encryption = self
            .interaction
            .confirm("Encrypt stored credentials?")
            .unwrap_or(false);
        if !wants_encryption {
            info!("encryption declined; vault runs in plaintext mode");
            return Ok(VaultSession::disabled(self.paths));
        }

        // Preferred: random key in the credential store. Any keychain
        // trouble degrades to the passphrase flow, not to plaintext.
        match self.try_stored_key() {
            Ok(Some(key)) => {
                info!("vault key obtained from credential store");
                return VaultSession::with_key(
                    self.paths,
                    EncryptionPolicy::EnabledWithStoredKey,
                    key,
                );
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "credential store unavailable; falling back to passphrase");
                self.interaction.notice(
                    "Credential store unavailable; falling back to a master passphrase.",
                );
            }
        }

        match self.try_passphrase_key() {
            Ok(Some(key)) => {
                info!("vault key derived from master passphrase");
                VaultSession::with_key(self.paths, EncryptionPolicy::EnabledWithPassphrase, key)
            }
            Ok(None) => {
                self.interaction
                    .notice("No key was set up; the vault stays unencrypted.");
                info!("key setup abandoned; vault runs in plaintext mode");
                Ok(VaultSession::disabled(self.paths))
            }
            Err(e) => {
                // Fail closed: no partial encrypted state.
                warn!(error = %e, "key setup failed; vault runs in plaintext mode");
                self.interaction
                    .notice("Key setup failed; the vault stays unencrypted.");
                Ok(VaultSession::disabled(self.paths))
            }
        }
    }

    /// Stored-key branch. `Ok(None)` means the user routed to the
    /// passphrase flow; `Err` means the store itself misbehaved.
    fn try_stored_key(&self) -> Result<Option<Zeroizing<[u8; KEY_LEN]>>, PassguardError> {
        let use_keychain = self
            .interaction
            .confirm("Keep the vault key in the system credential store?")
            .unwrap_or(false);
        if !use_keychain {
            return Ok(None);
        }

        if self.keychain.has_key()? {
            let reuse = self
                .interaction
                .confirm("A stored vault key exists. Reuse it?")
                .unwrap_or(false);
            if reuse {
                return self.keychain.get_key().map(Some);
            }
            // Declined reuse gets the same offer as the no-key case: a
            // fresh random key replacing the stored one.
        }

        let generate = self
            .interaction
            .confirm("Generate and store a new vault key?")
            .unwrap_or(false);
        if !generate {
            return Ok(None);
        }

        let key = crypto::generate_random_key()?;
        self.keychain.set_key(&key)?;
        Ok(Some(key))
    }

    /// Passphrase branch. `Ok(None)` on empty entry or mismatch, which the
    /// caller turns into the plaintext policy.
    fn try_passphrase_key(&self) -> Result<Option<Zeroizing<[u8; KEY_LEN]>>, PassguardError> {
        let passphrase = match self
            .interaction
            .read_passphrase_with_confirm("Master passphrase")
        {
            Ok(p) => p,
            Err(PassguardError::EmptyField { .. }) => return Ok(None),
            Err(PassguardError::PassphraseMismatch) => {
                self.interaction.notice("Passphrases did not match.");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let rng = SecretRng::new();
        let salt = kdf::load_or_create_salt(&self.paths, &rng)?;
        let key = kdf::derive_key(
            passphrase.expose_secret().as_bytes(),
            &salt,
            self.kdf_iterations,
        )?;
        Ok(Some(key))
    }
}
