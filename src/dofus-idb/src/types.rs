//! Shared types for the items database.

use dofus::items::LotSize;
use serde::{Deserialize, Serialize};

/// Error parsing a stored or user-supplied value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid item field: {0} (expected xp, price_1, price_10, price_100 or price_1000)")]
    InvalidField(String),

    #[error("Invalid stored document {key}: {message}")]
    InvalidDocument { key: String, message: String },
}

/// Editable numeric column of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Xp,
    Price(LotSize),
}

impl ItemField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Xp => "xp",
            Self::Price(LotSize::One) => "price_1",
            Self::Price(LotSize::Ten) => "price_10",
            Self::Price(LotSize::Hundred) => "price_100",
            Self::Price(LotSize::Thousand) => "price_1000",
        }
    }
}

impl std::fmt::Display for ItemField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl std::str::FromStr for ItemField {
    type Err = ParseError;

    /// Accepts `xp`, `price_10`, `price-10u`, `prix_10u`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "xp" {
            return Ok(Self::Xp);
        }
        lower
            .strip_prefix("price")
            .or_else(|| lower.strip_prefix("prix"))
            .map(|rest| rest.trim_start_matches(['_', '-']))
            .and_then(|lot| lot.parse::<LotSize>().ok())
            .map(Self::Price)
            .ok_or_else(|| ParseError::InvalidField(s.to_string()))
    }
}

/// Metadata refreshed from the search provider; `None` keeps the stored value
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub icon_url: Option<String>,
    pub category: Option<String>,
}

/// Filter for listing items
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Only items tracked by this user, in the order they were added
    pub user_id: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Database statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbStats {
    pub item_count: i64,
    pub tracked_count: i64,
    pub user_count: i64,
    pub xp_level_count: i64,
}
