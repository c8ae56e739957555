//! Experience allocation.
//!
//! Given the experience a creature still needs and a purchase offer, work
//! out how many units to buy and what they cost. The allocation is greedy
//! and capped per action: at most `max_units` units are taken from one
//! offer, the caller repeats the action to cover more.

use crate::items::ItemRef;
use crate::ledger::{AppliedResource, CreatureProgress};

/// Why an allocation could not be made
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("No creature is selected")]
    NoActiveCreature,

    #[error("Price and xp must both be filled in before adding this item")]
    MissingPricingData,

    #[error("The purchase is too large to be recorded")]
    QuantityOutOfRange,
}

/// 2^64, the first float a `u64` cannot hold
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// A purchasable lot of one resource
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offer {
    /// Price of a whole lot
    pub lot_price: Option<f64>,
    pub xp_per_unit: Option<f64>,
    /// Units per lot
    pub lot_size: f64,
    /// Most units this single action may buy
    pub max_units: u64,
}

impl Offer {
    /// Offer capped at one lot, the default for a single action
    pub fn one_lot(lot_price: Option<f64>, xp_per_unit: Option<f64>, lot_size: u32) -> Self {
        Self {
            lot_price,
            xp_per_unit,
            lot_size: f64::from(lot_size),
            max_units: u64::from(lot_size),
        }
    }

    pub fn with_max_units(mut self, max_units: u64) -> Self {
        self.max_units = max_units;
        self
    }
}

/// Allocate units from `offer` toward the creature's remaining xp.
///
/// The returned entry is not applied; append it with
/// [`CreatureProgress::apply`] so the derived fields are recomputed.
pub fn allocate(
    creature: Option<&CreatureProgress>,
    item: ItemRef,
    offer: &Offer,
) -> Result<AppliedResource, AllocationError> {
    let creature = creature.ok_or(AllocationError::NoActiveCreature)?;
    let (lot_price, xp_per_unit) = pricing(offer).ok_or(AllocationError::MissingPricingData)?;

    let quantity_needed = units_needed(creature.remaining_xp, xp_per_unit);
    let quantity =
        whole(quantity_needed.min(offer.max_units as f64)).ok_or(AllocationError::QuantityOutOfRange)?;

    let unit_price = lot_price / offer.lot_size;
    let cost = whole(quantity as f64 * unit_price).ok_or(AllocationError::QuantityOutOfRange)?;

    tracing::debug!(
        item = item.id,
        quantity_needed,
        quantity,
        cost,
        "allocated resource"
    );

    Ok(AppliedResource {
        item,
        quantity,
        xp_provided: quantity as f64 * xp_per_unit,
        cost,
    })
}

/// Whole-lot cost of closing the remaining xp gap with a single offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEstimate {
    pub lots_needed: u64,
    pub total_cost: u64,
}

/// Estimate how many full lots reach the xp ceiling and what they cost
pub fn estimate_cost(
    remaining_xp: f64,
    lot_price: Option<f64>,
    xp_per_unit: Option<f64>,
    lot_size: u32,
) -> Option<CostEstimate> {
    let offer = Offer::one_lot(lot_price, xp_per_unit, lot_size);
    let (lot_price, xp_per_unit) = pricing(&offer)?;
    let lots_needed = whole(units_needed(remaining_xp, xp_per_unit * offer.lot_size))?;
    Some(CostEstimate {
        lots_needed,
        total_cost: whole(lots_needed as f64 * lot_price)?,
    })
}

fn pricing(offer: &Offer) -> Option<(f64, f64)> {
    let price = offer.lot_price.filter(|p| p.is_finite() && *p > 0.0)?;
    let xp = offer.xp_per_unit.filter(|x| x.is_finite() && *x > 0.0)?;
    if !(offer.lot_size.is_finite() && offer.lot_size > 0.0) {
        return None;
    }
    Some((price, xp))
}

fn units_needed(remaining_xp: f64, xp_per_unit: f64) -> f64 {
    if remaining_xp <= 0.0 {
        return 0.0;
    }
    (remaining_xp / xp_per_unit).ceil()
}

/// Round to a whole count, `None` when it does not fit a `u64`
fn whole(value: f64) -> Option<u64> {
    let rounded = value.round();
    (rounded.is_finite() && (0.0..U64_LIMIT).contains(&rounded)).then_some(rounded as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CreatureRef;

    fn creature(remaining: u64) -> CreatureProgress {
        CreatureProgress::new(
            1,
            CreatureRef {
                id: 1,
                name: "Chacha".to_string(),
                image_url: None,
            },
            0,
            remaining,
            0,
        )
    }

    fn wheat() -> ItemRef {
        ItemRef {
            id: 289,
            name: "Blé".to_string(),
            icon_url: None,
        }
    }

    #[test]
    fn test_worked_example() {
        let mut pet = creature(1000);
        let offer = Offer::one_lot(Some(300.0), Some(150.0), 10);

        let resource = allocate(Some(&pet), wheat(), &offer).unwrap();
        assert_eq!(resource.quantity, 7);
        assert_eq!(resource.xp_provided, 1050.0);
        assert_eq!(resource.cost, 210);

        pet.apply(resource);
        assert_eq!(pet.remaining_xp, 0.0);
        assert_eq!(pet.total_cost, 210);
    }

    #[test]
    fn test_capped_by_max_units() {
        let pet = creature(100_000);
        let offer = Offer::one_lot(Some(450.0), Some(10.0), 10);
        let resource = allocate(Some(&pet), wheat(), &offer).unwrap();
        assert_eq!(resource.quantity, 10);
        assert_eq!(resource.xp_provided, 100.0);
        assert_eq!(resource.cost, 450);
    }

    #[test]
    fn test_raised_cap_covers_everything() {
        let pet = creature(100_000);
        let offer = Offer::one_lot(Some(450.0), Some(10.0), 10).with_max_units(u64::MAX);
        let resource = allocate(Some(&pet), wheat(), &offer).unwrap();
        assert_eq!(resource.quantity, 10_000);
        assert_eq!(resource.cost, 450_000);
    }

    #[test]
    fn test_cost_rounded_once() {
        // 3 units at 33.333.. each: per-unit rounding would give 99
        let pet = creature(30);
        let offer = Offer::one_lot(Some(1000.0), Some(10.0), 30).with_max_units(30);
        let resource = allocate(Some(&pet), wheat(), &offer).unwrap();
        assert_eq!(resource.quantity, 3);
        assert_eq!(resource.cost, 100);
    }

    #[test]
    fn test_no_active_creature() {
        let offer = Offer::one_lot(Some(300.0), Some(150.0), 10);
        assert_eq!(
            allocate(None, wheat(), &offer),
            Err(AllocationError::NoActiveCreature)
        );
    }

    #[test]
    fn test_missing_pricing() {
        let pet = creature(1000);
        for (price, xp) in [(None, Some(1.0)), (Some(0.0), Some(1.0)), (Some(-3.0), Some(1.0)), (Some(10.0), None), (Some(10.0), Some(0.0))] {
            let offer = Offer::one_lot(price, xp, 1);
            assert_eq!(
                allocate(Some(&pet), wheat(), &offer),
                Err(AllocationError::MissingPricingData)
            );
        }
    }

    #[test]
    fn test_no_active_creature_checked_first() {
        let offer = Offer::one_lot(None, None, 1);
        assert_eq!(
            allocate(None, wheat(), &offer),
            Err(AllocationError::NoActiveCreature)
        );
    }

    #[test]
    fn test_complete_creature_allocates_nothing() {
        let pet = creature(0);
        let offer = Offer::one_lot(Some(300.0), Some(150.0), 10);
        let resource = allocate(Some(&pet), wheat(), &offer).unwrap();
        assert_eq!(resource.quantity, 0);
        assert_eq!(resource.cost, 0);
    }

    #[test]
    fn test_uncapped_tiny_xp_is_rejected() {
        let pet = creature(1000);
        let offer = Offer::one_lot(Some(300.0), Some(1e-300), 10).with_max_units(u64::MAX);
        assert_eq!(
            allocate(Some(&pet), wheat(), &offer),
            Err(AllocationError::QuantityOutOfRange)
        );
    }

    #[test]
    fn test_tiny_xp_within_one_lot() {
        let pet = creature(1000);
        let offer = Offer::one_lot(Some(300.0), Some(1e-300), 10);
        let resource = allocate(Some(&pet), wheat(), &offer).unwrap();
        assert_eq!(resource.quantity, 10);
        assert_eq!(resource.cost, 300);
    }

    #[test]
    fn test_estimate_cost() {
        // 1000 xp at 15 xp/unit, lots of 10: 150 xp per lot -> 7 lots
        let estimate = estimate_cost(1000.0, Some(300.0), Some(15.0), 10).unwrap();
        assert_eq!(estimate.lots_needed, 7);
        assert_eq!(estimate.total_cost, 2100);

        assert_eq!(estimate_cost(1000.0, None, Some(15.0), 10), None);
        assert_eq!(estimate_cost(0.0, Some(300.0), Some(15.0), 10).unwrap().lots_needed, 0);
        assert_eq!(estimate_cost(1000.0, Some(300.0), Some(1e-300), 10), None);
    }
}
