mod cli;
mod commands;
mod config;
mod dispatch;
mod dofusdude;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load()?;
    let api_url = config.api_url(cli.api_url.as_deref());
    let db = cli.db.as_path();

    match cli.command {
        Commands::Configure {
            user_id,
            name,
            email,
            api_url,
            logout,
            show,
        } => commands::configure::handle(config, user_id, name, email, api_url, logout, show),

        Commands::Search {
            query,
            pets,
            format,
        } => commands::search::search(&api_url, &query, pets, format),

        Commands::Lookup { id } => commands::search::lookup(&api_url, id),

        Commands::Items { command } => dispatch::dispatch_items(db, &config, &api_url, command),

        Commands::Creature { command } => {
            dispatch::dispatch_creature(db, &config, &api_url, command)
        }

        Commands::Xp { command } => dispatch::dispatch_xp(db, &config, command),

        Commands::ExportCsv { what, output } => {
            let session = config.require_session()?;
            commands::export::export_csv(db, &session, what, output.as_deref())
        }
    }
}
