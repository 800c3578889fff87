//! ejournal CLI - an encrypted personal journal
//!
//! This is the command-line interface for ejournal. It loads the config,
//! asks for the password and drives the core journal store.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::errors::CliError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing()?;

    if let Err(err) = run(&cli) {
        if let Some(cli_error) = CliError::classify(&err) {
            cli_error.exit()
        }
        return Err(err);
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        return commands::handle_completions(*shell);
    }

    let ctx = AppContext::new(cli)?;
    match &cli.command {
        Commands::Init(args) => commands::handle_init(&ctx, args),
        Commands::Write(args) => commands::handle_write(&ctx, args),
        Commands::Show(args) => commands::handle_show(&ctx, args),
        Commands::List(args) => commands::handle_list(&ctx, args),
        Commands::Print(args) => commands::handle_print(&ctx, args),
        Commands::Import(args) => commands::handle_import(&ctx, args),
        Commands::Rekey(args) => commands::handle_rekey(&ctx, args),
        Commands::Completions { .. } => Ok(()),
    }
}
