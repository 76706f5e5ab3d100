// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Passguard credential vault.
//!
//! This crate provides the shared error type and the credential data model
//! used throughout the Passguard workspace.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PassguardError;
pub use types::{normalize_website, CredentialRecord, VaultMap};
