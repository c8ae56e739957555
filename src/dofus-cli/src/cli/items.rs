//! Tracked items command CLI definitions

use clap::Subcommand;

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum ItemsCommand {
    /// Initialize the database
    Init,

    /// Track an item
    Add {
        /// Ankama id of the item
        id: u64,

        /// Item name (looked up from the search API if omitted)
        #[arg(long)]
        name: Option<String>,

        /// Experience per unit
        #[arg(long)]
        xp: Option<f64>,

        /// Do not contact the search API
        #[arg(long)]
        offline: bool,
    },

    /// Stop tracking an item
    #[command(visible_alias = "rm")]
    Remove {
        /// Ankama id of the item
        id: u64,
    },

    /// Stop tracking every item
    Clear,

    /// List tracked items with cost per xp for each lot size
    #[command(visible_alias = "ls")]
    List {
        /// Sort column: name, xp, ratio_1u, ratio_10u, ratio_100u, ratio_1000u
        /// (defaults to the saved sort)
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Only items whose name contains this text
        #[arg(long)]
        name: Option<String>,

        /// Output format: table (default), csv, json
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one tracked item
    Show {
        /// Ankama id of the item
        id: u64,
    },

    /// Click a column header: sort by it, or flip the direction if it is
    /// already the sort column
    Sort {
        /// Column: name, xp, ratio_1u, ratio_10u, ratio_100u, ratio_1000u
        key: String,
    },

    /// Forget the saved sort
    Unsort,

    /// Set the xp or a lot price of an item
    Set {
        /// Ankama id of the item
        id: u64,

        /// Field: xp, price_1, price_10, price_100, price_1000
        field: String,

        /// New value, or "none" to clear
        value: String,
    },

    /// Refresh names and icons from the search API
    Refresh {
        /// Only refresh this item
        id: Option<u64>,
    },

    /// Estimate the cost of leveling the selected pet with one item
    Estimate {
        /// Ankama id of the item
        id: u64,

        /// Lot size to buy in: 1, 10, 100 or 1000
        #[arg(short, long, default_value = "1")]
        lot: String,
    },

    /// Show database statistics
    Stats,
}
