//! # dofus
//!
//! Resource cost-efficiency ranking and pet experience planning for Dofus.
//!
//! This library provides functionality to:
//! - Compute cost per experience point for each purchase lot size
//! - Classify ratios into relative quality tiers
//! - Sort and rank tracked items and search results
//! - Plan pet leveling: allocate resources toward the experience ceiling
//!   and keep a persisted ledger of purchases
//! - Export records to CSV
//!
//! ## Example
//!
//! ```
//! use dofus::{allocate, CreatureProgress, CreatureRef, ItemRef, Offer};
//!
//! let pet = CreatureProgress::new(
//!     1,
//!     CreatureRef { id: 8155, name: "Chacha".into(), image_url: None },
//!     0,
//!     1000,
//!     0,
//! );
//! let wheat = ItemRef { id: 289, name: "Blé".into(), icon_url: None };
//!
//! // 10-unit lot at 300 kamas, 150 xp per unit
//! let offer = Offer::one_lot(Some(300.0), Some(150.0), 10);
//! let resource = allocate(Some(&pet), wheat, &offer).unwrap();
//! assert_eq!(resource.quantity, 7);
//! assert_eq!(resource.cost, 210);
//! ```

pub mod allocation;
pub mod csv;
pub mod items;
pub mod ledger;
pub mod ratio;
pub mod relevance;
pub mod search;
pub mod session;
pub mod sort;
pub mod tier;
pub mod tracker;
pub mod xp_table;

// Re-export commonly used items
#[doc(inline)]
pub use allocation::{allocate, estimate_cost, AllocationError, CostEstimate, Offer};
#[doc(inline)]
pub use csv::{escape_csv, json_to_csv, CsvError};
#[doc(inline)]
pub use items::{Item, ItemRef, LotPrices, LotSize, ParseLotError};
#[doc(inline)]
pub use ledger::{AppliedResource, CreatureId, CreatureProgress, CreatureRef, NewCreature};
#[doc(inline)]
pub use ratio::{compute_ratio, format_ratio};
#[doc(inline)]
pub use relevance::{rank_by_relevance, score};
#[doc(inline)]
pub use search::{
    find_by_id, query_variants, search_ranked, ItemCategory, SearchError, SearchHit, SearchKind,
    SearchProvider, SuggestionGate,
};
#[doc(inline)]
pub use session::{Session, User};
#[doc(inline)]
pub use sort::{SortConfig, SortDirection, SortKey};
#[doc(inline)]
pub use tier::{classify, classify_all, Tier};
#[doc(inline)]
pub use tracker::{LedgerEvent, LedgerSnapshot, LedgerStore, StoreError, Tracker, TrackerError};
#[doc(inline)]
pub use xp_table::{XpLevel, XpTable};
