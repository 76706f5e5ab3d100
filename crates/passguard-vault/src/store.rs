// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store bound to a [`VaultSession`].
//!
//! Every mutation is read-merge-write over the full map, so the on-disk
//! file is always a complete, consistent snapshot. A missing store file is
//! an empty vault; a blob that fails authentication is an error, never an
//! empty vault.

use passguard_core::{normalize_website, CredentialRecord, PassguardError, VaultMap};
use tracing::{debug, info};

use crate::crypto;
use crate::session::VaultSession;

/// High-level load/save/upsert/find over the session's store file.
pub struct VaultStore<'a> {
    session: &'a VaultSession,
}

impl<'a> VaultStore<'a> {
    pub fn new(session: &'a VaultSession) -> Self {
        Self { session }
    }

    fn store_path(&self) -> std::path::PathBuf {
        if self.session.is_encrypted() {
            self.session.paths().encrypted_store()
        } else {
            self.session.paths().plaintext_store()
        }
    }

    /// Load the full credential map. Absent file means empty vault.
    pub fn load(&self) -> Result<VaultMap, PassguardError> {
        let path = self.store_path();
        let Some(bytes) = self.session.paths().read(&path)? else {
            debug!(path = %path.display(), "store file absent; empty vault");
            return Ok(VaultMap::new());
        };

        let json = match self.session.key() {
            Some(key) => crypto::open(key, &bytes)?,
            None => bytes,
        };

        let map: VaultMap = serde_json::from_slice(&json)?;
        debug!(entries = map.len(), "loaded credential map");
        Ok(map)
    }

    /// Serialize and persist the full map atomically.
    ///
    /// Plaintext mode writes pretty JSON for hand inspection; encrypted mode
    /// seals compact JSON.
    pub fn save(&self, map: &VaultMap) -> Result<(), PassguardError> {
        let bytes = match self.session.key() {
            Some(key) => {
                let json = serde_json::to_vec(map)?;
                crypto::seal(key, &json)?
            }
            None => serde_json::to_vec_pretty(map)?,
        };

        let path = self.store_path();
        self.session.paths().write_atomic(&path, &bytes)?;
        info!(entries = map.len(), path = %path.display(), "saved credential map");
        Ok(())
    }

    /// Insert or replace the record for a website (read-merge-write).
    pub fn upsert(&self, website: &str, record: CredentialRecord) -> Result<(), PassguardError> {
        let key = normalize_website(website);
        let mut map = self.load()?;
        map.insert(key, record);
        self.save(&map)
    }

    /// Validate inputs and store one credential.
    ///
    /// Website and password must be non-blank after trimming; the email may
    /// be empty.
    pub fn save_credential(
        &self,
        website: &str,
        email: &str,
        password: &str,
    ) -> Result<(), PassguardError> {
        if website.trim().is_empty() {
            return Err(PassguardError::EmptyField { field: "website" });
        }
        if password.trim().is_empty() {
            return Err(PassguardError::EmptyField { field: "password" });
        }

        self.upsert(
            website,
            CredentialRecord {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
    }

    /// Look up the record for a website by normalized key.
    pub fn find(&self, website: &str) -> Result<Option<CredentialRecord>, PassguardError> {
        let key = normalize_website(website);
        Ok(self.load()?.remove(&key))
    }

    /// Look up a credential as an `(email, password)` pair.
    pub fn find_credential(
        &self,
        website: &str,
    ) -> Result<Option<(String, String)>, PassguardError> {
        Ok(self.find(website)?.map(|r| (r.email, r.password)))
    }
}
