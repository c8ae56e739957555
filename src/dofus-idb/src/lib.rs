//! Items Database Library for Dofus tools
//!
//! This library provides a trait-based abstraction over the persisted data:
//! the item catalog with its xp and lot prices, which items each user
//! tracks, the pet experience curve, and per-user JSON documents such as
//! the creature ledger and the saved table sort.
//!
//! # Features
//!
//! - `sqlite-sync` (default) - Synchronous SQLite using rusqlite (for CLI)
//!
//! # Example
//!
//! ```no_run
//! use dofus_idb::{ItemFilter, ItemsRepository, SqliteDb};
//!
//! let db = SqliteDb::open("dofus.db").unwrap();
//! db.init().unwrap();
//!
//! // List all items
//! let items = db.list_items(&ItemFilter::default()).unwrap();
//! ```

pub mod repository;
pub mod shared;
pub mod types;

#[cfg(feature = "sqlite-sync")]
pub mod sqlite;

// Re-export types
pub use types::*;

// Re-export repository traits
pub use repository::{
    ItemsRepository, MembershipRepository, RepoError, RepoResult, XpTableRepository,
};

// Re-export implementations
#[cfg(feature = "sqlite-sync")]
pub use sqlite::{SqliteDb, DEFAULT_DB_PATH};
