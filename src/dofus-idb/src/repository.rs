//! Repository traits for items database operations.

use dofus::items::Item;
use dofus::xp_table::{XpLevel, XpTable};

use crate::types::*;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Catalog of items with their xp and lot prices
pub trait ItemsRepository {
    /// Initialize the database schema
    fn init(&self) -> RepoResult<()>;

    /// Add an item with only its id; existing rows are left alone
    fn add_item(&self, id: u64) -> RepoResult<()>;

    /// Insert or fully replace an item
    fn upsert_item(&self, item: &Item) -> RepoResult<()>;

    fn get_item(&self, id: u64) -> RepoResult<Option<Item>>;

    /// Update item metadata
    fn update_item(&self, id: u64, update: &ItemUpdate) -> RepoResult<()>;

    /// Set or clear one numeric column
    fn set_field(&self, id: u64, field: ItemField, value: Option<f64>) -> RepoResult<()>;

    /// List items with optional filters
    fn list_items(&self, filter: &ItemFilter) -> RepoResult<Vec<Item>>;

    /// Delete an item, returning whether it existed
    fn delete_item(&self, id: u64) -> RepoResult<bool>;

    /// Get database statistics
    fn stats(&self) -> RepoResult<DbStats>;
}

/// Which items each user tracks
pub trait MembershipRepository {
    /// Track an item for a user, returning false if it already was
    fn add_user_item(&self, user_id: &str, item_id: u64) -> RepoResult<bool>;

    fn remove_user_item(&self, user_id: &str, item_id: u64) -> RepoResult<bool>;

    /// Item ids tracked by a user, in the order they were added
    fn user_item_ids(&self, user_id: &str) -> RepoResult<Vec<u64>>;

    /// Untrack every item of a user, returning how many were removed
    fn clear_user_items(&self, user_id: &str) -> RepoResult<usize>;
}

/// Pet experience curve storage
pub trait XpTableRepository {
    fn xp_table(&self) -> RepoResult<XpTable>;

    /// Insert or replace one level
    fn set_xp_level(&self, level: XpLevel) -> RepoResult<()>;

    fn delete_xp_level(&self, level: u32) -> RepoResult<bool>;

    /// Replace the whole curve at once
    fn replace_xp_table(&self, table: &XpTable) -> RepoResult<usize>;
}
