// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault core for the Passguard credential manager.
//!
//! Stores website/email/password records in a per-user directory, either as
//! plaintext JSON or as a single AES-256-GCM-sealed blob. The vault key is
//! either derived from a master passphrase via PBKDF2-HMAC-SHA256 over a
//! persisted salt, or generated randomly and held in a credential store.
//!
//! The encryption policy is decided exactly once per process by
//! [`SessionBuilder::init`], which produces an immutable [`VaultSession`]
//! threaded through all store operations. All interactive points go through
//! the [`Interaction`] trait, so the core never touches a TTY directly.

pub mod crypto;
pub mod generator;
pub mod kdf;
pub mod keychain;
pub mod migration;
pub mod paths;
pub mod prompt;
pub mod rng;
pub mod session;
pub mod store;

pub use generator::generate_password;
pub use keychain::{FileKeychain, KeychainProvider};
pub use migration::{migrate_legacy_data, MigrationReport};
pub use paths::VaultPaths;
pub use prompt::{Interaction, TtyInteraction};
pub use rng::SecretRng;
pub use session::{EncryptionPolicy, SessionBuilder, VaultSession};
pub use store::VaultStore;
