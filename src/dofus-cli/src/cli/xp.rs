//! Experience table command CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum XpCommand {
    /// Show the experience table
    #[command(visible_alias = "ls")]
    List,

    /// Set the cumulative experience of a level
    Set { level: u32, xp_total: u64 },

    /// Remove a level
    Delete { level: u32 },

    /// Replace the table from a JSON array of {level, xp_total} or a
    /// `level,xp_total` CSV file
    Import { path: PathBuf },
}
