// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic error rendering for configuration failures.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error suitable for miette rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(passguard::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Deserialization or merge failure (unknown key, wrong type, bad TOML).
    #[error("configuration error: {0}")]
    #[diagnostic(
        code(passguard::config::other),
        help("check passguard.toml and PASSGUARD_* environment variables")
    )]
    Other(String),
}

/// Render all collected configuration errors to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
