use ejournal_core::workflows::recent_entries;

use crate::app::AppContext;
use crate::cli::PrintArgs;
use crate::output::{entry_json, print_entry};

/// Print the most recent entries in full, newest first.
pub fn handle_print(ctx: &AppContext, args: &PrintArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let entries = recent_entries(&journal, args.count)?;

    if args.json {
        let values: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if entries.is_empty() && !ctx.quiet() {
        println!("No entries found.");
    }
    for (n, entry) in entries.iter().enumerate() {
        if n > 0 {
            println!();
            if !ctx.quiet() {
                println!("---");
                println!();
            }
        }
        print_entry(entry, ctx.quiet());
    }
    Ok(())
}
