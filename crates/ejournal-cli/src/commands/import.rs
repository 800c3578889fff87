use ejournal_core::workflows::import_json;
use ejournal_core::JournalError;

use crate::app::AppContext;
use crate::cli::ImportArgs;
use crate::errors::CliError;

/// Write one entry read from a JSON file.
pub fn handle_import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let json = std::fs::read(&args.file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.file.display(), e))?;
    let journal = ctx.open_journal()?;

    let id = match import_json(&journal, &json) {
        Ok(id) => id,
        Err(JournalError::Json { source: err }) => {
            return Err(CliError::invalid_input(format!(
                "{} is not a journal entry: {}",
                args.file.display(),
                err
            ))
            .into());
        }
        Err(err) => return Err(err.into()),
    };

    if ctx.quiet() {
        println!("{}", id);
    } else {
        println!("Imported entry {}", id);
    }
    Ok(())
}
