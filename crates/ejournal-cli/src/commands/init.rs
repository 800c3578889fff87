use ejournal_core::config::{StoreConfig, DEFAULT_STORAGE_DIRECTORY, DEFAULT_WORK_FACTOR};
use ejournal_core::{FileJournal, JournalStore};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{read_config, write_config, EjournalConfig};
use crate::constants::PASSWORD_ENV;
use crate::errors::CliError;
use crate::helpers::{prompt_new_password, prompt_password};

/// Create the config if needed, then initialize the journal it points at.
///
/// Re-running `init` on an existing config keeps its salt, so it can be used
/// to rebuild a lost index.
pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = ctx.config_path();
    let (config, password) = if config_path.exists() {
        let config = read_config(config_path)?;
        if let Some(directory) = args.directory.as_deref() {
            if directory != config.journal.storage_directory {
                return Err(CliError::invalid_input(format!(
                    "Config {} already points at {}",
                    config_path.display(),
                    config.journal.storage_directory
                ))
                .with_hint("Remove the config or pass --config to create a separate journal.")
                .into());
            }
        }
        (config, prompt_password()?)
    } else {
        let journal = StoreConfig::generate(
            args.directory
                .clone()
                .unwrap_or_else(|| DEFAULT_STORAGE_DIRECTORY.to_string()),
        )
        .with_work_factor(args.work_factor.unwrap_or(DEFAULT_WORK_FACTOR));
        let password: SecretString = prompt_new_password("Password", PASSWORD_ENV)?;
        let config = EjournalConfig::new(journal);
        write_config(config_path, &config)?;
        info!(config = %config_path.display(), "Wrote new config");
        (config, password)
    };

    let journal = FileJournal::load(&config.journal, password.expose_secret())?;
    journal.init()?;
    let entries = journal.list()?.len();

    if !ctx.quiet() {
        println!(
            "Initialized journal at {} ({} entr{})",
            journal.directory().display(),
            entries,
            if entries == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}
