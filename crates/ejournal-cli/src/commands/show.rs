use ejournal_core::JournalStore;

use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::output::{entry_json, print_entry};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let entry = journal.read(&args.id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entry_json(&entry))?);
    } else {
        print_entry(&entry, ctx.quiet());
    }
    Ok(())
}
