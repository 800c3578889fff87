use ejournal_core::{Entry, JournalStore};
use uuid::Uuid;

use crate::app::AppContext;
use crate::cli::WriteArgs;
use crate::helpers::{parse_datetime, read_entry_body};

pub fn handle_write(ctx: &AppContext, args: &WriteArgs) -> anyhow::Result<()> {
    let body = read_entry_body(args.body.clone(), args.stdin)?;
    let journal = ctx.open_journal()?;

    let id = args
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut entry = Entry::new(body).with_id(id.clone()).with_tags(args.tag.clone());
    if let Some(value) = args.date.as_deref() {
        entry = entry.with_date(parse_datetime(value)?);
    }

    journal.write(entry)?;

    if !ctx.quiet() {
        println!("Wrote entry {}", id);
    } else {
        println!("{}", id);
    }
    Ok(())
}
