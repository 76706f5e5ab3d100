// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot migration of legacy vault artifacts into the per-user data dir.
//!
//! Early versions kept `data.json`, `data.enc` and `kdf_salt` in the process
//! working directory. On startup the vault offers to move them into the
//! proper data directory, backing aside anything already there. One file's
//! failure never aborts the others.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use passguard_core::PassguardError;
use tracing::{info, warn};

use crate::paths::{VaultPaths, ENCRYPTED_STORE, PLAINTEXT_STORE, SALT_FILE};
use crate::prompt::Interaction;

/// Filenames the legacy layout may contain.
const LEGACY_ARTIFACTS: &[&str] = &[PLAINTEXT_STORE, ENCRYPTED_STORE, SALT_FILE];

/// Report of what the migration did.
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Artifact names moved into the data dir.
    pub migrated: Vec<String>,
    /// Artifact names left in place (user declined, or nothing to do).
    pub skipped: Vec<String>,
    /// Destination files renamed aside before the move, as `(name, backup)`.
    pub backed_up: Vec<(String, PathBuf)>,
    /// Non-fatal per-file failures.
    pub warnings: Vec<String>,
}

impl MigrationReport {
    pub fn did_anything(&self) -> bool {
        !self.migrated.is_empty() || !self.backed_up.is_empty()
    }
}

/// Detect legacy artifacts in `legacy_dir` and offer to move them into the
/// data dir behind `paths`.
///
/// Asks the user once; declining skips every file. A destination collision
/// renames the existing file to `<name>.bak-<unix-ts>` before the move.
pub fn migrate_legacy_data(
    legacy_dir: &Path,
    paths: &VaultPaths,
    interaction: &dyn Interaction,
) -> Result<MigrationReport, PassguardError> {
    let mut report = MigrationReport::default();

    let present: Vec<&str> = LEGACY_ARTIFACTS
        .iter()
        .copied()
        .filter(|name| legacy_dir.join(name).is_file())
        // The data dir itself may be the working directory.
        .filter(|name| legacy_dir.join(name) != paths.data_dir().join(name))
        .collect();

    if present.is_empty() {
        return Ok(report);
    }

    info!(count = present.len(), dir = %legacy_dir.display(), "legacy vault artifacts found");
    let question = format!(
        "Found {} legacy vault file(s) in {}. Move them to {}?",
        present.len(),
        legacy_dir.display(),
        paths.data_dir().display()
    );
    let approved = interaction.confirm(&question).unwrap_or(false);
    if !approved {
        info!("legacy migration declined");
        report.skipped = present.iter().map(|s| s.to_string()).collect();
        return Ok(report);
    }

    paths.ensure_dir()?;

    for name in present {
        let src = legacy_dir.join(name);
        let dest = paths.data_dir().join(name);
        match migrate_one(&src, &dest) {
            Ok(backup) => {
                if let Some(backup) = backup {
                    info!(name, backup = %backup.display(), "backed aside existing file");
                    report.backed_up.push((name.to_string(), backup));
                }
                info!(name, "migrated legacy artifact");
                report.migrated.push(name.to_string());
            }
            Err(e) => {
                let warning = format!("could not migrate {name}: {e}");
                warn!("{warning}");
                report.warnings.push(warning);
            }
        }
    }

    Ok(report)
}

/// Move one file, backing aside an existing destination first. Returns the
/// backup path when one was made.
fn migrate_one(src: &Path, dest: &Path) -> Result<Option<PathBuf>, PassguardError> {
    let backup = if dest.exists() {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| PassguardError::Internal(format!("system clock before epoch: {e}")))?
            .as_secs();
        let backup = dest.with_file_name(format!(
            "{}.bak-{ts}",
            dest.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("artifact")
        ));
        rename_or_copy(dest, &backup)?;
        Some(backup)
    } else {
        None
    };

    rename_or_copy(src, dest)?;
    Ok(backup)
}

/// `fs::rename`, falling back to copy-then-delete for cross-device moves.
fn rename_or_copy(src: &Path, dest: &Path) -> Result<(), PassguardError> {
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(src, dest).map_err(|e| PassguardError::io(dest, e))?;
            std::fs::remove_file(src).map_err(|e| PassguardError::io(src, e))?;
            Ok(())
        }
    }
}
