use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use ejournal_core::VERSION;

/// ejournal - an encrypted personal journal
#[derive(Parser)]
#[command(name = "ejournal")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "EJOURNAL_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the config and initialize the journal, rebuilding the index if
    /// entries already exist
    Init(InitArgs),

    /// Write a new entry or replace an existing one
    Write(WriteArgs),

    /// Show a specific entry by ID
    Show(ShowArgs),

    /// List entries, newest first
    List(ListArgs),

    /// Print the most recent entries in full, newest first
    Print(PrintArgs),

    /// Import one entry from a JSON file
    Import(ImportArgs),

    /// Re-encrypt every entry with a new password and salt
    Rekey(RekeyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Directory holding the journal (may start with ~)
    #[arg(long, value_name = "DIR")]
    pub directory: Option<String>,

    /// scrypt work factor as a power of two
    #[arg(long, value_name = "N")]
    pub work_factor: Option<u8>,
}

/// Arguments for the `write` command
#[derive(Args)]
pub struct WriteArgs {
    /// Entry body
    #[arg(long, conflicts_with = "stdin")]
    pub body: Option<String>,

    /// Read the entry body from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Add tags to the entry
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Set custom date/time (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Entry ID; an existing entry with this ID is replaced
    #[arg(long)]
    pub id: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Entry ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Number of most recent entries to list (0 for all)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub count: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `print` command
#[derive(Args)]
pub struct PrintArgs {
    /// Number of most recent entries to print (0 for all)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub count: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `import` command
#[derive(Args)]
pub struct ImportArgs {
    /// JSON file holding one entry; an empty or missing id gets a fresh one
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the `rekey` command
#[derive(Args)]
pub struct RekeyArgs {
    /// scrypt work factor for the rekeyed journal (defaults to the current one)
    #[arg(long, value_name = "N")]
    pub work_factor: Option<u8>,
}
