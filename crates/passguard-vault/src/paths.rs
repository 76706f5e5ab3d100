// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user data directory layout and atomic file I/O.
//!
//! All artifacts live in one owner-only directory. Writes always go through
//! a temp file in the same directory followed by an atomic rename; a crash
//! mid-write on the encrypted blob must never corrupt the only copy of the
//! stored credentials.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use passguard_config::VaultConfig;
use passguard_core::PassguardError;
use tracing::debug;

/// Plaintext store filename (shared with the legacy layout).
pub const PLAINTEXT_STORE: &str = "data.json";
/// Encrypted store filename (shared with the legacy layout).
pub const ENCRYPTED_STORE: &str = "data.enc";
/// KDF salt filename (shared with the legacy layout).
pub const SALT_FILE: &str = "kdf_salt";
/// Wrapped-key file used by the file-backed credential store.
pub const KEYCHAIN_FILE: &str = "vault.key";

/// Locations of all on-disk vault artifacts.
#[derive(Debug, Clone)]
pub struct VaultPaths {
    data_dir: PathBuf,
}

impl VaultPaths {
    /// Use an explicit data directory (tests, config override).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve the data directory from config, falling back to the
    /// platform per-user data dir (`~/.local/share/passguard` on Linux).
    pub fn from_config(config: &VaultConfig) -> Result<Self, PassguardError> {
        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or_else(|| {
                    PassguardError::Config("no per-user data directory on this platform".into())
                })?
                .join("passguard"),
        };
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn plaintext_store(&self) -> PathBuf {
        self.data_dir.join(PLAINTEXT_STORE)
    }

    pub fn encrypted_store(&self) -> PathBuf {
        self.data_dir.join(ENCRYPTED_STORE)
    }

    pub fn salt_file(&self) -> PathBuf {
        self.data_dir.join(SALT_FILE)
    }

    pub fn keychain_file(&self) -> PathBuf {
        self.data_dir.join(KEYCHAIN_FILE)
    }

    /// Create the data directory with owner-only permissions if absent.
    pub fn ensure_dir(&self) -> Result<(), PassguardError> {
        if self.data_dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.data_dir).map_err(|e| PassguardError::io(&self.data_dir, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.data_dir, fs::Permissions::from_mode(0o700))
                .map_err(|e| PassguardError::io(&self.data_dir, e))?;
        }
        debug!(dir = %self.data_dir.display(), "created vault data directory");
        Ok(())
    }

    /// Read an artifact, mapping "file absent" to `None`.
    pub fn read(&self, path: &Path) -> Result<Option<Vec<u8>>, PassguardError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PassguardError::io(path, e)),
        }
    }

    /// Write an artifact atomically with owner-only permissions.
    ///
    /// Writes to a temp file in the data directory, restricts it to 0o600,
    /// then renames into place so readers never observe a partial file.
    pub fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), PassguardError> {
        self.ensure_dir()?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.data_dir)
            .map_err(|e| PassguardError::io(&self.data_dir, e))?;
        tmp.write_all(bytes)
            .map_err(|e| PassguardError::io(path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| PassguardError::io(path, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| PassguardError::io(path, e))?;
        }

        tmp.persist(path)
            .map_err(|e| PassguardError::io(path, e.error))?;
        debug!(path = %path.display(), len = bytes.len(), "wrote vault artifact");
        Ok(())
    }
}
