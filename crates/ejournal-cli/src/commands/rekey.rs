use std::path::{Path, PathBuf};

use ejournal_core::config::StoreConfig;
use ejournal_core::workflows::transfer_entries;
use ejournal_core::{FileJournal, JournalStore};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::cli::RekeyArgs;
use crate::config::{write_config, EjournalConfig};
use crate::errors::CliError;
use crate::helpers::prompt_new_password;

/// Environment variable holding the new password for `rekey`.
const NEW_PASSWORD_ENV: &str = "EJOURNAL_NEW_PASSWORD";

/// Re-encrypt the journal under a new password and salt.
///
/// Entries are copied into a sibling staging directory first. Only after the
/// copy succeeds are the directories swapped and the config rewritten.
pub fn handle_rekey(ctx: &AppContext, args: &RekeyArgs) -> anyhow::Result<()> {
    let config = ctx.load_config()?;
    let old = ctx.open_journal()?;
    // Fails here on a wrong password, before anything is staged.
    old.list()?;

    let directory = old.directory().to_path_buf();
    let staging = sibling(&directory, "rekey")?;
    let retired = sibling(&directory, "old")?;
    for path in [&staging, &retired] {
        if path.try_exists()? {
            return Err(CliError::invalid_input(format!(
                "{} already exists; remove it before rekeying",
                path.display()
            ))
            .into());
        }
    }

    let password = prompt_new_password("New password", NEW_PASSWORD_ENV)?;
    let work_factor = args.work_factor.unwrap_or(config.journal.work_factor);
    let staged_config =
        StoreConfig::generate(staging.to_string_lossy()).with_work_factor(work_factor);
    let new = FileJournal::load(&staged_config, password.expose_secret())?;
    new.init()?;

    let copied = match transfer_entries(&old, &new) {
        Ok(copied) => copied,
        Err(err) => {
            warn!(staging = %staging.display(), "Rekey failed; removing staging directory");
            let _ = std::fs::remove_dir_all(&staging);
            return Err(err.into());
        }
    };

    std::fs::rename(&directory, &retired).map_err(|e| {
        anyhow::anyhow!(
            "Failed to move {} aside: {}. The rekeyed journal is at {}",
            directory.display(),
            e,
            staging.display()
        )
    })?;
    std::fs::rename(&staging, &directory).map_err(|e| {
        anyhow::anyhow!(
            "Failed to move {} into place: {}. The old journal is at {}",
            staging.display(),
            e,
            retired.display()
        )
    })?;

    let rekeyed = EjournalConfig::new(StoreConfig::new(
        config.journal.storage_directory.clone(),
        staged_config.salt.clone(),
        work_factor,
    ));
    write_config(ctx.config_path(), &rekeyed)?;

    if let Err(err) = std::fs::remove_dir_all(&retired) {
        warn!(path = %retired.display(), error = %err, "Failed to remove the old journal");
    }
    info!(entries = copied, "Rekeyed journal");

    if !ctx.quiet() {
        println!("Rekeyed {} entries in {}", copied, directory.display());
    }
    Ok(())
}

/// `{directory}.{suffix}` next to `directory`.
fn sibling(directory: &Path, suffix: &str) -> anyhow::Result<PathBuf> {
    let name = directory
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid journal directory {}", directory.display()))?;
    let mut sibling = name.to_os_string();
    sibling.push(".");
    sibling.push(suffix);
    Ok(directory.with_file_name(sibling))
}
