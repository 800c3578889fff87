use std::path::{Path, PathBuf};

use ejournal_core::FileJournal;
use secrecy::ExposeSecret;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{read_config, resolve_config_path, EjournalConfig};
use crate::errors::CliError;
use crate::helpers::prompt_password;

/// Per-invocation state shared by command handlers.
pub struct AppContext {
    config_path: PathBuf,
    quiet: bool,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        Ok(Self {
            config_path: resolve_config_path(cli.config.as_deref())?,
            quiet: cli.quiet,
        })
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load_config(&self) -> anyhow::Result<EjournalConfig> {
        if !self.config_path.exists() {
            return Err(CliError::not_found(format!(
                "No config found at {}",
                self.config_path.display()
            ))
            .with_hint("Run:\n  ejournal init")
            .into());
        }
        read_config(&self.config_path)
    }

    /// Prompt for the password and open an initialized journal.
    pub fn open_journal(&self) -> anyhow::Result<FileJournal> {
        let config = self.load_config()?;
        let password = prompt_password()?;
        debug!(config = %self.config_path.display(), "Opening journal");
        Ok(FileJournal::open(&config.journal, password.expose_secret())?)
    }
}
