//! CSV export command handler

use anyhow::{bail, Context, Result};
use dofus::ledger::CreatureProgress;
use dofus::Session;
use dofus_idb::{ItemFilter, ItemsRepository};
use serde_json::{json, Value};
use std::path::Path;

use super::helpers;
use crate::cli::ExportTarget;

/// Export tracked items, creatures or applied resources as CSV
pub fn export_csv(
    db: &Path,
    session: &Session,
    what: ExportTarget,
    output: Option<&Path>,
) -> Result<()> {
    let tracker = helpers::open_tracker(db, session)?;

    let records = match what {
        ExportTarget::Items => {
            let filter = ItemFilter {
                user_id: Some(session.namespace().to_string()),
                ..Default::default()
            };
            let mut items = tracker.store().list_items(&filter)?;
            tracker
                .store()
                .sort_config(session.namespace())?
                .sort(&mut items);
            items.iter().map(helpers::item_record).collect()
        }
        ExportTarget::Creatures => {
            let active = tracker.snapshot().active;
            tracker
                .creatures()
                .iter()
                .map(|c| creature_record(c, active == Some(c.id)))
                .collect()
        }
        ExportTarget::Resources => resource_records(tracker.creatures()),
    };

    if records.is_empty() {
        bail!("Nothing to export");
    }
    let count = records.len();
    let csv = dofus::json_to_csv(&Value::Array(records))?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", csv))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} rows to {}", count, path.display());
        }
        None => println!("{}", csv),
    }
    Ok(())
}

fn creature_record(creature: &CreatureProgress, active: bool) -> Value {
    json!({
        "id": creature.id,
        "pet_id": creature.creature.id,
        "name": creature.creature.name,
        "starting_xp": creature.starting_xp,
        "xp_ceiling": creature.xp_ceiling,
        "remaining_xp": creature.remaining_xp.ceil() as u64,
        "purchase_price": creature.purchase_price,
        "total_cost": creature.total_cost,
        "resources": creature.applied_resources.len(),
        "active": active,
    })
}

fn resource_records(creatures: &[CreatureProgress]) -> Vec<Value> {
    creatures
        .iter()
        .flat_map(|creature| {
            creature
                .applied_resources
                .iter()
                .enumerate()
                .map(move |(index, resource)| {
                    json!({
                        "creature_id": creature.id,
                        "creature": creature.creature.name,
                        "index": index,
                        "item_id": resource.item.id,
                        "item": resource.item.name,
                        "quantity": resource.quantity,
                        "xp_provided": resource.xp_provided,
                        "cost": resource.cost,
                    })
                })
        })
        .collect()
}
