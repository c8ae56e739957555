//! Pet leveling command CLI definitions

use clap::Subcommand;

#[derive(Subcommand)]
pub enum CreatureCommand {
    /// Search pets by name
    Search {
        /// Pet name (at least 3 characters)
        query: String,
    },

    /// Start tracking a pet
    Add {
        /// Ankama id of the pet
        pet_id: u64,

        /// Pet name (looked up from the search API if omitted)
        #[arg(long)]
        name: Option<String>,

        /// Experience the pet already has
        #[arg(long, default_value_t = 0)]
        starting_xp: u64,

        /// Price paid for the pet, in kamas
        #[arg(long, default_value_t = 0)]
        price: u64,
    },

    /// List tracked pets
    #[command(visible_alias = "ls")]
    List,

    /// Select the pet resources are applied to
    Select {
        /// Tracked pet id
        #[arg(required_unless_present = "none")]
        id: Option<u64>,

        /// Clear the selection
        #[arg(long, conflicts_with = "id")]
        none: bool,
    },

    /// Show a pet's ledger (the selected one by default)
    Show {
        /// Tracked pet id
        id: Option<u64>,
    },

    /// Buy a tracked item for the selected pet
    Apply {
        /// Ankama id of the item
        item_id: u64,

        /// Lot size to buy in: 1, 10, 100 or 1000
        #[arg(short, long, default_value = "1")]
        lot: String,

        /// Most units to buy in this action (defaults to one lot)
        #[arg(long, conflicts_with = "fill")]
        max: Option<u64>,

        /// Buy as many units as needed to reach the ceiling
        #[arg(long)]
        fill: bool,
    },

    /// Remove an applied resource
    Unapply {
        /// Position in the pet's ledger, as shown by `creature show`
        index: usize,

        /// Tracked pet id (the selected one by default)
        #[arg(long)]
        creature: Option<u64>,
    },

    /// Stop tracking a pet
    #[command(visible_alias = "rm")]
    Delete {
        /// Tracked pet id
        id: u64,
    },
}
