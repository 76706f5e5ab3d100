// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User interaction behind a trait, so the session state machine and the
//! migration flow never talk to a TTY directly.

use passguard_core::PassguardError;
use secrecy::SecretString;

/// The environment variable name for providing the vault passphrase.
pub const PASSPHRASE_ENV_VAR: &str = "PASSGUARD_PASSPHRASE";

/// Yes/no questions, passphrase entry, and informational notices.
///
/// The vault layer consumes this trait; the binary supplies
/// [`TtyInteraction`], tests supply scripted doubles.
pub trait Interaction {
    /// Ask a yes/no question. `Err` means the answer could not be obtained
    /// at all (no TTY), which callers treat as "no".
    fn confirm(&self, question: &str) -> Result<bool, PassguardError>;

    /// Read a passphrase without echo.
    fn read_passphrase(&self, prompt: &str) -> Result<SecretString, PassguardError>;

    /// Read a new passphrase twice and verify both entries match.
    fn read_passphrase_with_confirm(&self, prompt: &str) -> Result<SecretString, PassguardError>;

    /// Show an informational message to the user.
    fn notice(&self, message: &str);
}

/// Interactive implementation: env var first, then TTY via `rpassword`.
#[derive(Debug, Default)]
pub struct TtyInteraction;

impl TtyInteraction {
    pub fn new() -> Self {
        Self
    }

    fn passphrase_from_env() -> Option<SecretString> {
        if let Ok(value) = std::env::var(PASSPHRASE_ENV_VAR)
            && !value.is_empty()
        {
            return Some(SecretString::from(value));
        }
        None
    }

    fn require_tty() -> Result<(), PassguardError> {
        if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
            Ok(())
        } else {
            Err(PassguardError::Internal(format!(
                "no passphrase provided. Set {PASSPHRASE_ENV_VAR} or run interactively."
            )))
        }
    }
}

impl Interaction for TtyInteraction {
    fn confirm(&self, question: &str) -> Result<bool, PassguardError> {
        Self::require_tty()?;
        eprint!("{question} [y/N]: ");
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .map_err(|e| PassguardError::Internal(format!("failed to read answer: {e}")))?;
        Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
    }

    fn read_passphrase(&self, prompt: &str) -> Result<SecretString, PassguardError> {
        // Env var first (headless/scripted use).
        if let Some(passphrase) = Self::passphrase_from_env() {
            return Ok(passphrase);
        }

        Self::require_tty()?;
        eprint!("{prompt}: ");
        let passphrase = rpassword::read_password()
            .map_err(|e| PassguardError::Internal(format!("failed to read passphrase: {e}")))?;
        if passphrase.is_empty() {
            return Err(PassguardError::EmptyField {
                field: "passphrase",
            });
        }
        Ok(SecretString::from(passphrase))
    }

    fn read_passphrase_with_confirm(&self, prompt: &str) -> Result<SecretString, PassguardError> {
        // Env var does not need confirmation.
        if let Some(passphrase) = Self::passphrase_from_env() {
            return Ok(passphrase);
        }

        Self::require_tty()?;
        eprint!("{prompt}: ");
        let pass1 = rpassword::read_password()
            .map_err(|e| PassguardError::Internal(format!("failed to read passphrase: {e}")))?;
        eprint!("Confirm {}: ", prompt.to_lowercase());
        let pass2 = rpassword::read_password()
            .map_err(|e| PassguardError::Internal(format!("failed to read passphrase: {e}")))?;

        if pass1 != pass2 {
            return Err(PassguardError::PassphraseMismatch);
        }
        if pass1.is_empty() {
            return Err(PassguardError::EmptyField {
                field: "passphrase",
            });
        }
        Ok(SecretString::from(pass1))
    }

    fn notice(&self, message: &str) {
        eprintln!("{message}");
    }
}
