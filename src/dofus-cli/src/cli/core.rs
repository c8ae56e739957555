//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::creature::CreatureCommand;
use super::items::{ItemsCommand, OutputFormat};
use super::xp::XpCommand;

#[derive(Parser)]
#[command(name = "dofus")]
#[command(about = "Dofus resource pricing and pet leveling tools", long_about = None)]
pub struct Cli {
    /// Path to database file (can also set DOFUS_DB env var)
    #[arg(short, long, global = true, env = "DOFUS_DB", default_value = dofus_idb::DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Item search API base URL (overrides the configured one)
    #[arg(long, global = true, env = "DOFUS_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure the signed-in user and API settings
    #[command(visible_alias = "c")]
    Configure {
        /// User id that scopes tracked items and creatures
        #[arg(long)]
        user_id: Option<String>,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Default item search API base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Forget the signed-in user
        #[arg(long, conflicts_with = "user_id")]
        logout: bool,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },

    /// Search items by name
    #[command(visible_alias = "s")]
    Search {
        /// Item name (at least 3 characters)
        query: String,

        /// Only search pets
        #[arg(long)]
        pets: bool,

        /// Output format: table (default), csv, json
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Find an item by Ankama id in every category
    Lookup {
        /// Ankama id
        id: u64,
    },

    /// Manage tracked resources and their prices
    #[command(visible_alias = "i")]
    Items {
        #[command(subcommand)]
        command: ItemsCommand,
    },

    /// Plan pet leveling
    #[command(visible_alias = "p")]
    Creature {
        #[command(subcommand)]
        command: CreatureCommand,
    },

    /// Manage the pet experience table
    Xp {
        #[command(subcommand)]
        command: XpCommand,
    },

    /// Export tracked data as CSV
    ExportCsv {
        /// What to export
        #[arg(value_enum, default_value = "items")]
        what: ExportTarget,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Data set for `export-csv`
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ExportTarget {
    /// Tracked items with prices and ratios
    Items,
    /// Tracked creatures with their totals
    Creatures,
    /// Resources applied to creatures
    Resources,
}
