mod app;
mod cli;
mod commands;
mod config;
mod dispatch;
mod form;
mod logging;
mod model;
mod report;
mod repository;
mod store;
mod ui;
mod worker;

use anyhow::Result;
use clap::Parser;
use commands::Session;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let location = config::locate_config(args.config)?;
    let mut config = config::load_config(&location)?;
    if let Some(server) = args.server {
        config.server_url = server;
    }
    logging::init_logging(&config.log_level, &location.log_path())?;
    tracing::debug!(server = %config.server_url, config = ?location.path, "starting");

    let session = Session { config, location };
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::List => commands::list(&session),
        cli::Command::Add {
            title,
            description,
            at,
        } => commands::add(&session, title, description, at),
        cli::Command::Edit {
            id,
            title,
            description,
            at,
        } => commands::edit(&session, id, title, description, at),
        cli::Command::Delete { id } => commands::delete(&session, id),
        cli::Command::Events => commands::events(&session),
        cli::Command::Activity => commands::activity(&session),
        cli::Command::Tui => commands::tui(&session),
    }
}
