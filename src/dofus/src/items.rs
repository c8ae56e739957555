//! Tracked item model.
//!
//! An [`Item`] is a tradeable resource identified by its Ankama id. Prices
//! are quoted per purchase lot (1, 10, 100 or 1000 units), each lot price
//! independently optional.

use serde::{Deserialize, Serialize};

use crate::ratio;

/// Purchase granularity a price quote applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LotSize {
    One,
    Ten,
    Hundred,
    Thousand,
}

impl LotSize {
    /// All lot sizes, smallest first
    pub const ALL: [LotSize; 4] = [
        LotSize::One,
        LotSize::Ten,
        LotSize::Hundred,
        LotSize::Thousand,
    ];

    /// Number of units in one lot
    pub fn units(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Ten => 10,
            Self::Hundred => 100,
            Self::Thousand => 1000,
        }
    }

    /// Lot for a unit count, if it is a supported granularity
    pub fn from_units(units: u32) -> Option<Self> {
        match units {
            1 => Some(Self::One),
            10 => Some(Self::Ten),
            100 => Some(Self::Hundred),
            1000 => Some(Self::Thousand),
            _ => None,
        }
    }
}

impl std::fmt::Display for LotSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}u", self.units())
    }
}

impl std::str::FromStr for LotSize {
    type Err = ParseLotError;

    /// Accepts `10`, `10u` and `x10`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('u').trim_start_matches('x');
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(Self::from_units)
            .ok_or_else(|| ParseLotError(s.to_string()))
    }
}

/// Error for an unsupported lot size string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid lot size: {0} (expected 1, 10, 100 or 1000)")]
pub struct ParseLotError(pub String);

/// Price of each purchase lot, in kamas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotPrices {
    pub one: Option<i64>,
    pub ten: Option<i64>,
    pub hundred: Option<i64>,
    pub thousand: Option<i64>,
}

impl LotPrices {
    pub fn get(&self, lot: LotSize) -> Option<i64> {
        match lot {
            LotSize::One => self.one,
            LotSize::Ten => self.ten,
            LotSize::Hundred => self.hundred,
            LotSize::Thousand => self.thousand,
        }
    }

    pub fn set(&mut self, lot: LotSize, price: Option<i64>) {
        let slot = match lot {
            LotSize::One => &mut self.one,
            LotSize::Ten => &mut self.ten,
            LotSize::Hundred => &mut self.hundred,
            LotSize::Thousand => &mut self.thousand,
        };
        *slot = price;
    }
}

/// A tracked resource with its pricing and experience data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: Option<String>,
    pub icon_url: Option<String>,
    pub category: Option<String>,
    pub xp_per_unit: Option<f64>,
    pub prices: LotPrices,
}

impl Item {
    /// A freshly tracked item: no prices, zero xp
    pub fn new(id: u64) -> Self {
        Self {
            id,
            xp_per_unit: Some(0.0),
            ..Default::default()
        }
    }

    /// Name for display, synthesized from the id when unknown
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Item {}", self.id),
        }
    }

    /// Unrounded cost per xp point when buying by `lot`
    pub fn ratio(&self, lot: LotSize) -> Option<f64> {
        ratio::compute_ratio(
            self.prices.get(lot).map(|p| p as f64),
            self.xp_per_unit,
            f64::from(lot.units()),
        )
    }

    /// Lightweight reference used in ledger entries
    pub fn to_ref(&self) -> ItemRef {
        ItemRef {
            id: self.id,
            name: self.display_name(),
            icon_url: self.icon_url.clone(),
        }
    }
}

/// Identity and display data of an item, copied into ledger entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lot_size_parse() {
        assert_eq!("1".parse::<LotSize>().unwrap(), LotSize::One);
        assert_eq!("10u".parse::<LotSize>().unwrap(), LotSize::Ten);
        assert_eq!("x100".parse::<LotSize>().unwrap(), LotSize::Hundred);
        assert_eq!("1000".parse::<LotSize>().unwrap(), LotSize::Thousand);
        assert!("5".parse::<LotSize>().is_err());
        assert!("ten".parse::<LotSize>().is_err());
    }

    #[test]
    fn test_lot_size_display() {
        assert_eq!(LotSize::Hundred.to_string(), "100u");
    }

    #[test]
    fn test_lot_prices_get_set() {
        let mut prices = LotPrices::default();
        prices.set(LotSize::Ten, Some(450));
        assert_eq!(prices.get(LotSize::Ten), Some(450));
        assert_eq!(prices.get(LotSize::One), None);

        prices.set(LotSize::Ten, None);
        assert_eq!(prices.get(LotSize::Ten), None);
    }

    #[test]
    fn test_new_item_has_zero_xp() {
        let item = Item::new(289);
        assert_eq!(item.xp_per_unit, Some(0.0));
        assert_eq!(item.ratio(LotSize::One), None);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut item = Item::new(42);
        assert_eq!(item.display_name(), "Item 42");
        item.name = Some("Farine".to_string());
        assert_eq!(item.display_name(), "Farine");
    }

    #[test]
    fn test_item_ratio_uses_lot_units() {
        let mut item = Item::new(1);
        item.xp_per_unit = Some(5.0);
        item.prices.set(LotSize::Hundred, Some(1000));
        // (1000 / 100) / 5
        assert_eq!(item.ratio(LotSize::Hundred), Some(2.0));
    }
}
