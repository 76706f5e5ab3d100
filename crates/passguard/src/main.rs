// SPDX-FileCopyrightText: 2026 Passguard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passguard - a local credential vault.
//!
//! This is the binary entry point: clap subcommands over the vault core,
//! plus the clipboard handling that belongs to the presentation layer.

mod clipboard;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use passguard_config::PassguardConfig;
use passguard_core::PassguardError;
use passguard_vault::{
    migrate_legacy_data, FileKeychain, Interaction, MigrationReport, SessionBuilder,
    TtyInteraction, VaultPaths, VaultStore,
};

use clipboard::Clipboard;

/// Passguard - a local credential vault.
#[derive(Parser, Debug)]
#[command(name = "passguard", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a credential for a website.
    Add {
        /// Website the credential belongs to.
        website: String,
        /// Email or username for the account.
        email: String,
        /// Password to store; omit to be prompted or use --generate.
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate a random password instead of entering one.
        #[arg(long)]
        generate: bool,
    },
    /// Look up the credential for a website.
    Find {
        /// Website to look up.
        website: String,
        /// Copy the password to the clipboard instead of printing it.
        #[arg(long)]
        copy: bool,
    },
    /// Generate a random password and print it.
    Generate,
    /// Move legacy vault files from the current directory into the data dir.
    Migrate,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let config = match passguard_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            passguard_config::render_errors(&errors);
            return std::process::ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    match run(cli, &config) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            std::process::ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &PassguardConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, config: &PassguardConfig) -> Result<(), PassguardError> {
    let paths = VaultPaths::from_config(&config.vault)?;
    let interaction = TtyInteraction::new();

    match cli.command {
        Commands::Generate => {
            let password = passguard_vault::generate_password()?;
            println!("{}", password.green());
            Ok(())
        }
        Commands::Migrate => {
            let report = check_legacy_migration(&paths, &interaction)?;
            if !report.did_anything() && report.skipped.is_empty() {
                println!("No legacy vault files found.");
            }
            Ok(())
        }
        Commands::Add {
            website,
            email,
            password,
            generate,
        } => {
            check_legacy_migration(&paths, &interaction)?;
            let session = open_session(config, paths, &interaction)?;
            let store = VaultStore::new(&session);

            let (password, generated) = match (password, generate) {
                (_, true) => (passguard_vault::generate_password()?, true),
                (Some(password), false) => (password, false),
                (None, false) => (prompt_password(&interaction, &website)?, false),
            };

            store.save_credential(&website, &email, &password)?;
            println!("{} credential stored for {website}", "ok:".green().bold());
            if generated {
                println!("generated password: {}", password.green());
            }
            Ok(())
        }
        Commands::Find { website, copy } => {
            check_legacy_migration(&paths, &interaction)?;
            let session = open_session(config, paths, &interaction)?;
            let store = VaultStore::new(&session);

            let Some((email, password)) = store.find_credential(&website)? else {
                println!("{} no credential stored for {website}", "not found:".yellow());
                return Ok(());
            };

            println!("email:    {email}");
            if copy {
                let clipboard = Clipboard::new(config.clipboard.clear_secs);
                println!(
                    "password: copied to clipboard, clearing in {}s",
                    config.clipboard.clear_secs
                );
                clipboard.copy_with_deferred_clear(&password)?;
            } else {
                println!("password: {}", password.green());
            }
            Ok(())
        }
    }
}

/// Offer to move legacy working-directory artifacts before touching the store.
fn check_legacy_migration(
    paths: &VaultPaths,
    interaction: &dyn Interaction,
) -> Result<MigrationReport, PassguardError> {
    let cwd = std::env::current_dir().map_err(|e| PassguardError::io(".", e))?;
    let report = migrate_legacy_data(&cwd, paths, interaction)?;

    if report.did_anything() {
        info!(
            migrated = report.migrated.len(),
            backed_up = report.backed_up.len(),
            "legacy vault files migrated"
        );
        for name in &report.migrated {
            println!("{} migrated {name}", "ok:".green().bold());
        }
        for (name, backup) in &report.backed_up {
            println!("   existing {name} kept as {}", backup.display());
        }
    }
    for warning in &report.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
    Ok(report)
}

fn open_session(
    config: &PassguardConfig,
    paths: VaultPaths,
    interaction: &dyn Interaction,
) -> Result<passguard_vault::VaultSession, PassguardError> {
    let keychain = FileKeychain::new(paths.keychain_file());
    SessionBuilder::new(paths, config.vault.kdf_iterations, &keychain, interaction).init()
}

/// Prompt for a password, re-asking while the entry is blank.
///
/// The secret leaves `SecretString` here: the vault stores it as a plain
/// `String` anyway.
fn prompt_password(
    interaction: &dyn Interaction,
    website: &str,
) -> Result<String, PassguardError> {
    use secrecy::ExposeSecret;

    loop {
        match interaction.read_passphrase(&format!("Password for {website}")) {
            Ok(password) => return Ok(password.expose_secret().to_string()),
            Err(PassguardError::EmptyField { .. }) => {
                interaction.notice("The password cannot be empty.");
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = passguard_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.vault.kdf_iterations, 390_000);
        assert_eq!(config.clipboard.clear_secs, 10);
    }
}
