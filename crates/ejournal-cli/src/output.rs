//! Output formatting helpers for the CLI.

use chrono::{DateTime, SecondsFormat, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::{ContentArrangement, Table};
use ejournal_core::Entry;

/// Convert an entry to JSON for output.
pub fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "id": entry.id,
        "date": entry.date.as_ref().map(format_date),
        "tags": entry.tags,
        "body": entry.body,
    })
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Print a single entry in human-readable format.
pub fn print_entry(entry: &Entry, quiet: bool) {
    if !quiet {
        println!("ID: {}", entry.id);
        if let Some(date) = entry.date.as_ref() {
            println!("Date: {}", format_date(date));
        }
        if !entry.tags.is_empty() {
            println!("Tags: {}", entry.tags.join(", "));
        }
        println!();
    }
    println!("{}", entry.body);
}

/// Render `(date, id)` rows as a table, newest first as given.
pub fn listing_table(rows: &[(DateTime<Utc>, String)]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "ID"]);
    for (date, id) in rows {
        table.add_row(vec![format_date(date), id.clone()]);
    }
    table.to_string()
}

/// Print a listing as a table, or one `date - id` line per entry when quiet.
pub fn print_listing(rows: &[(DateTime<Utc>, String)], json: bool, quiet: bool) -> anyhow::Result<()> {
    if json {
        let values: Vec<serde_json::Value> = rows
            .iter()
            .map(|(date, id)| serde_json::json!({ "date": format_date(date), "id": id }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if rows.is_empty() {
        if !quiet {
            println!("No entries found.");
        }
        return Ok(());
    }

    if quiet {
        for (date, id) in rows {
            println!("{} - {}", format_date(date), id);
        }
    } else {
        println!("{}", listing_table(rows));
    }
    Ok(())
}
