//! Sorting of the tracked item table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::items::{Item, LotSize};

/// Column the item table is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Xp,
    Ratio(LotSize),
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Xp => write!(f, "xp"),
            Self::Ratio(lot) => write!(f, "ratio_{}", lot),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = ParseSortKeyError;

    /// Accepts `name`, `xp`, and `ratio_1u` / `ratio_10u` / `ratio-100` / ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "name" => Ok(Self::Name),
            "xp" => Ok(Self::Xp),
            other => other
                .strip_prefix("ratio")
                .map(|rest| rest.trim_start_matches(['_', '-']))
                .and_then(|lot| lot.parse::<LotSize>().ok())
                .map(Self::Ratio)
                .ok_or_else(|| ParseSortKeyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sort key: {0} (expected name, xp, or ratio_<lot>)")]
pub struct ParseSortKeyError(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Current sort of the item table; `key: None` keeps insertion order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Select a column: the same column again flips the direction, a new
    /// column starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }

    /// Sort `items` in place; stable, so ties keep their current order
    pub fn sort(&self, items: &mut [Item]) {
        if let Some(key) = self.key {
            items.sort_by(compare_by(key, self.direction));
        }
    }
}

/// Comparator over items for `key` in `direction`.
///
/// Names compare case-insensitively (`Item {id}` when unnamed), absent xp
/// counts as zero, and an absent ratio counts as infinitely expensive.
pub fn compare_by(key: SortKey, direction: SortDirection) -> impl Fn(&Item, &Item) -> Ordering {
    move |a, b| {
        let ordering = match key {
            SortKey::Name => a
                .display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase()),
            SortKey::Xp => a
                .xp_per_unit
                .unwrap_or(0.0)
                .total_cmp(&b.xp_per_unit.unwrap_or(0.0)),
            SortKey::Ratio(lot) => ratio_or_infinity(a, lot).total_cmp(&ratio_or_infinity(b, lot)),
        };
        direction.apply(ordering)
    }
}

fn ratio_or_infinity(item: &Item, lot: LotSize) -> f64 {
    item.ratio(lot).unwrap_or(f64::INFINITY)
}
