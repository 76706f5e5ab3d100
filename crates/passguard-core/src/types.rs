// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential data model shared across the Passguard workspace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single stored credential. Immutable once created; updates replace the
/// whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub email: String,
    pub password: String,
}

/// The on-disk credential map: normalized website key -> record.
///
/// A `BTreeMap` keeps the serialized JSON stable; insertion order carries no
/// meaning.
pub type VaultMap = BTreeMap<String, CredentialRecord>;

/// Normalize a website key: trimmed and lower-cased.
///
/// Normalization happens before every lookup and insert, so
/// `"Example.com"` and `"example.com"` refer to the same entry.
pub fn normalize_website(website: &str) -> String {
    website.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_website("  Example.COM "), "example.com");
        assert_eq!(normalize_website("bank.com"), "bank.com");
    }

    #[test]
    fn normalized_keys_collide_in_map() {
        let mut map = VaultMap::new();
        map.insert(
            normalize_website("Example.com"),
            CredentialRecord {
                email: "a@b.com".into(),
                password: "p1".into(),
            },
        );
        map.insert(
            normalize_website("example.COM"),
            CredentialRecord {
                email: "a@b.com".into(),
                password: "p2".into(),
            },
        );

        assert_eq!(map.len(), 1);
        assert_eq!(map["example.com"].password, "p2");
    }

    #[test]
    fn record_json_shape_matches_store_format() {
        let record = CredentialRecord {
            email: "u@e.com".into(),
            password: "p1".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "email": "u@e.com", "password": "p1" })
        );
    }
}
