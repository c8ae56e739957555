//! Pet leveling ledger.
//!
//! A [`CreatureProgress`] records how much experience a pet still needs
//! and which resource purchases were applied toward it. `remaining_xp`
//! and `total_cost` are caches: every mutation goes through
//! [`CreatureProgress::recompute`], which derives them again from the
//! applied resources instead of adjusting them incrementally.

use serde::{Deserialize, Serialize};

use crate::items::ItemRef;

/// Local identifier of a tracked creature
pub type CreatureId = u64;

/// The pet or mount being leveled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRef {
    /// Ankama id of the creature item
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One resource purchase applied to a creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedResource {
    pub item: ItemRef,
    /// Units bought
    pub quantity: u64,
    pub xp_provided: f64,
    /// Kamas spent, rounded once for the whole purchase
    pub cost: u64,
}

/// Input of the "add creature" form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewCreature {
    pub creature: Option<CreatureRef>,
    pub starting_xp: u64,
    pub purchase_price: u64,
}

/// Leveling plan of one tracked creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureProgress {
    pub id: CreatureId,
    pub creature: CreatureRef,
    pub starting_xp: u64,
    pub xp_ceiling: u64,
    pub purchase_price: u64,
    #[serde(default)]
    pub applied_resources: Vec<AppliedResource>,
    pub remaining_xp: f64,
    pub total_cost: u64,
}

impl CreatureProgress {
    pub fn new(
        id: CreatureId,
        creature: CreatureRef,
        starting_xp: u64,
        xp_ceiling: u64,
        purchase_price: u64,
    ) -> Self {
        let mut progress = Self {
            id,
            creature,
            starting_xp,
            xp_ceiling,
            purchase_price,
            applied_resources: Vec::new(),
            remaining_xp: 0.0,
            total_cost: 0,
        };
        progress.recompute();
        progress
    }

    /// Derive `remaining_xp` and `total_cost` from scratch
    pub fn recompute(&mut self) {
        let applied_xp: f64 = self.applied_resources.iter().map(|r| r.xp_provided).sum();
        let gap = self.xp_ceiling as f64 - self.starting_xp as f64 - applied_xp;
        self.remaining_xp = gap.max(0.0);

        let resources_cost = self
            .applied_resources
            .iter()
            .map(|r| r.cost)
            .fold(0u64, u64::saturating_add);
        self.total_cost = self.purchase_price.saturating_add(resources_cost);
    }

    /// Append a resource and refresh the derived fields
    pub fn apply(&mut self, resource: AppliedResource) {
        self.applied_resources.push(resource);
        self.recompute();
    }

    /// Remove the resource at `index`, returning it if it existed
    pub fn remove_resource(&mut self, index: usize) -> Option<AppliedResource> {
        if index >= self.applied_resources.len() {
            return None;
        }
        let removed = self.applied_resources.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Experience gathered so far, starting xp included
    pub fn xp_gathered(&self) -> f64 {
        self.starting_xp as f64 + self.applied_resources.iter().map(|r| r.xp_provided).sum::<f64>()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_xp <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> CreatureRef {
        CreatureRef {
            id: 8155,
            name: "Bwak de Feu".to_string(),
            image_url: None,
        }
    }

    fn resource(name: &str, quantity: u64, xp: f64, cost: u64) -> AppliedResource {
        AppliedResource {
            item: ItemRef {
                id: quantity,
                name: name.to_string(),
                icon_url: None,
            },
            quantity,
            xp_provided: xp,
            cost,
        }
    }

    #[test]
    fn test_new_derives_fields() {
        let progress = CreatureProgress::new(1, pet(), 200, 1200, 5000);
        assert_eq!(progress.remaining_xp, 1000.0);
        assert_eq!(progress.total_cost, 5000);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_starting_above_ceiling_clamps_to_zero() {
        let progress = CreatureProgress::new(1, pet(), 5000, 1200, 0);
        assert_eq!(progress.remaining_xp, 0.0);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_apply_recomputes() {
        let mut progress = CreatureProgress::new(1, pet(), 0, 1000, 100);
        progress.apply(resource("Blé", 7, 1050.0, 210));
        assert_eq!(progress.remaining_xp, 0.0);
        assert_eq!(progress.total_cost, 310);
    }

    #[test]
    fn test_removal_matches_never_applied() {
        let mut with_removal = CreatureProgress::new(1, pet(), 100, 5000, 250);
        with_removal.apply(resource("Blé", 10, 1500.0, 300));
        with_removal.apply(resource("Orge", 4, 800.0, 120));
        with_removal.apply(resource("Lin", 2, 4000.0, 999));
        with_removal.remove_resource(2);

        let mut never_applied = CreatureProgress::new(1, pet(), 100, 5000, 250);
        never_applied.apply(resource("Blé", 10, 1500.0, 300));
        never_applied.apply(resource("Orge", 4, 800.0, 120));

        assert_eq!(with_removal.remaining_xp, never_applied.remaining_xp);
        assert_eq!(with_removal.total_cost, never_applied.total_cost);
        assert_eq!(with_removal.remaining_xp, 2600.0);
        assert_eq!(with_removal.total_cost, 670);
    }

    #[test]
    fn test_total_cost_saturates() {
        let mut progress = CreatureProgress::new(1, pet(), 0, 1000, 10);
        progress.apply(resource("Blé", 1, 1.0, u64::MAX));
        progress.apply(resource("Orge", 2, 1.0, u64::MAX));
        assert_eq!(progress.total_cost, u64::MAX);

        progress.remove_resource(1);
        progress.remove_resource(0);
        assert_eq!(progress.total_cost, 10);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut progress = CreatureProgress::new(1, pet(), 0, 1000, 0);
        assert!(progress.remove_resource(0).is_none());
    }

    #[test]
    fn test_serde_roundtrip_keeps_ledger() {
        let mut progress = CreatureProgress::new(3, pet(), 0, 1000, 10);
        progress.apply(resource("Blé", 7, 1050.0, 210));
        let json = serde_json::to_string(&progress).unwrap();
        let back: CreatureProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progress);
    }
}
