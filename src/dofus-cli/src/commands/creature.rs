//! Pet leveling command handlers

use anyhow::{bail, Context, Result};
use dofus::items::LotSize;
use dofus::ledger::{CreatureId, CreatureProgress, CreatureRef, NewCreature};
use dofus::search::{ItemCategory, SearchProvider};
use dofus::xp_table::XpTable;
use dofus::{Offer, Session, Tracker};
use dofus_idb::{ItemsRepository, XpTableRepository};
use std::path::Path;

use super::helpers::{self, format_thousands, format_xp};
use crate::dofusdude::DofusDudeClient;

/// Start tracking a pet
pub fn add(
    db: &Path,
    session: &Session,
    api_url: &str,
    pet_id: u64,
    name: Option<String>,
    starting_xp: u64,
    price: u64,
) -> Result<()> {
    let creature = match name {
        Some(name) => CreatureRef {
            id: pet_id,
            name,
            image_url: None,
        },
        None => fetch_pet(&DofusDudeClient::new(api_url), pet_id)?,
    };

    let wdb = helpers::open_db(db)?;
    let table = wdb.xp_table()?;
    if table.is_empty() {
        tracing::warn!("experience table is empty");
    }
    let ceiling = table.ceiling();

    let mut tracker = Tracker::open(wdb, session.namespace())?;
    let events = tracker.subscribe();
    let label = creature.name.clone();
    let id = tracker
        .add_creature(
            NewCreature {
                creature: Some(creature),
                starting_xp,
                purchase_price: price,
            },
            ceiling,
        )
        .context("Could not start tracking the pet (import an xp table with `dofus xp import`)")?;
    helpers::log_events(&events);

    println!("Tracking {} as #{}", label, id);
    if tracker.snapshot().active == Some(id) {
        println!("#{} is now selected", id);
    }
    Ok(())
}

fn fetch_pet<P: SearchProvider + ?Sized>(provider: &P, pet_id: u64) -> Result<CreatureRef> {
    let hit = provider
        .item_by_id(pet_id, ItemCategory::Equipment)?
        .with_context(|| format!("No pet with id {}", pet_id))?;
    Ok(CreatureRef {
        id: hit.ankama_id,
        name: hit.name,
        image_url: hit.image_url.or(hit.icon_url),
    })
}

/// List tracked pets
pub fn list(db: &Path, session: &Session) -> Result<()> {
    let tracker = helpers::open_tracker(db, session)?;
    if tracker.creatures().is_empty() {
        println!("No tracked pets. Add one with `dofus creature add <PET_ID>`.");
        return Ok(());
    }

    let active = tracker.snapshot().active;
    println!(
        "  {:<4} {:<30} {:>12} {:>12} {:>14}",
        "ID", "Pet", "XP", "Remaining", "Total cost"
    );
    println!("{}", "-".repeat(80));
    for creature in tracker.creatures() {
        let marker = if active == Some(creature.id) { "*" } else { " " };
        println!(
            "{} {:<4} {:<30} {:>12} {:>12} {:>14}",
            marker,
            creature.id,
            creature.creature.name,
            progress_label(creature),
            format_xp(creature.remaining_xp),
            format_thousands(creature.total_cost)
        );
    }
    Ok(())
}

fn progress_label(creature: &CreatureProgress) -> String {
    format!(
        "{}/{}",
        format_xp(creature.xp_gathered().min(creature.xp_ceiling as f64)),
        format_thousands(creature.xp_ceiling)
    )
}

pub fn select(db: &Path, session: &Session, id: Option<CreatureId>) -> Result<()> {
    let mut tracker = helpers::open_tracker(db, session)?;
    let events = tracker.subscribe();
    tracker.select(id)?;
    helpers::log_events(&events);

    match tracker.active() {
        Some(creature) => println!("Selected #{} {}", creature.id, creature.creature.name),
        None => println!("No pet selected"),
    }
    Ok(())
}

/// Show a pet's ledger
pub fn show(db: &Path, session: &Session, id: Option<CreatureId>) -> Result<()> {
    let tracker = helpers::open_tracker(db, session)?;
    let creature = match id {
        Some(id) => tracker.get(id).with_context(|| format!("No tracked pet #{}", id))?,
        None => tracker
            .active()
            .context("No pet selected. Pass an id or run `dofus creature select <ID>`.")?,
    };

    println!("#{} {} (pet {})", creature.id, creature.creature.name, creature.creature.id);
    if let Some(level) = level_label(&tracker.store().xp_table()?, creature.xp_gathered()) {
        println!("Level:          {}", level);
    }
    println!("Starting xp:    {}", format_thousands(creature.starting_xp));
    println!("XP ceiling:     {}", format_thousands(creature.xp_ceiling));
    println!("Remaining xp:   {}", format_xp(creature.remaining_xp));
    println!("Purchase price: {}", format_thousands(creature.purchase_price));
    println!("Total cost:     {}", format_thousands(creature.total_cost));
    if creature.is_complete() {
        println!("Ceiling reached");
    }

    if creature.applied_resources.is_empty() {
        return Ok(());
    }

    println!();
    println!("{:>3} {:<30} {:>8} {:>12} {:>12}", "#", "Resource", "Qty", "XP", "Cost");
    for (index, resource) in creature.applied_resources.iter().enumerate() {
        println!(
            "{:>3} {:<30} {:>8} {:>12} {:>12}",
            index,
            resource.item.name,
            resource.quantity,
            format_xp(resource.xp_provided),
            format_thousands(resource.cost)
        );
    }
    Ok(())
}

/// Current level for `xp`, with the total needed for the next one
fn level_label(table: &XpTable, xp: f64) -> Option<String> {
    let level = table.level_for_xp(xp.max(0.0).floor() as u64)?;
    match level.checked_add(1).and_then(|next| table.xp_for_level(next)) {
        Some(next) => Some(format!("{} (next at {} xp)", level, format_thousands(next))),
        None => Some(level.to_string()),
    }
}

/// Per-action unit cap: one lot unless raised
fn offer_for(
    lot_price: Option<i64>,
    xp_per_unit: Option<f64>,
    lot: LotSize,
    max: Option<u64>,
    fill: bool,
) -> Result<Offer> {
    let offer = Offer::one_lot(lot_price.map(|p| p as f64), xp_per_unit, lot.units());
    match (max, fill) {
        (Some(0), _) => bail!("--max must be at least 1"),
        (Some(max), _) => Ok(offer.with_max_units(max)),
        (None, true) => Ok(offer.with_max_units(u64::MAX)),
        (None, false) => Ok(offer),
    }
}

/// Buy a tracked item for the selected pet
pub fn apply(
    db: &Path,
    session: &Session,
    item_id: u64,
    lot: &str,
    max: Option<u64>,
    fill: bool,
) -> Result<()> {
    let lot = lot.parse::<LotSize>()?;
    let mut tracker = helpers::open_tracker(db, session)?;
    let item = tracker
        .store()
        .get_item(item_id)?
        .with_context(|| format!("Item {} not found", item_id))?;

    let offer = offer_for(item.prices.get(lot), item.xp_per_unit, lot, max, fill)?;
    let events = tracker.subscribe();
    let resource = tracker.apply_offer(item.to_ref(), &offer)?;
    helpers::log_events(&events);

    println!(
        "Added {} x {}: {} xp for {} kamas",
        resource.quantity,
        resource.item.name,
        format_xp(resource.xp_provided),
        format_thousands(resource.cost)
    );
    if let Some(creature) = tracker.active() {
        println!(
            "{} needs {} more xp (total cost {})",
            creature.creature.name,
            format_xp(creature.remaining_xp),
            format_thousands(creature.total_cost)
        );
    }
    Ok(())
}

/// Remove an applied resource from a pet's ledger
pub fn unapply(
    db: &Path,
    session: &Session,
    index: usize,
    creature: Option<CreatureId>,
) -> Result<()> {
    let mut tracker = helpers::open_tracker(db, session)?;
    let creature = match creature {
        Some(id) => id,
        None => tracker
            .snapshot()
            .active
            .context("No pet selected. Pass --creature <ID>.")?,
    };

    let events = tracker.subscribe();
    let removed = tracker.remove_resource(creature, index)?;
    helpers::log_events(&events);

    println!(
        "Removed {} x {} from #{}",
        removed.quantity, removed.item.name, creature
    );
    Ok(())
}

/// Stop tracking a pet
pub fn delete(db: &Path, session: &Session, id: CreatureId) -> Result<()> {
    let mut tracker = helpers::open_tracker(db, session)?;
    let events = tracker.subscribe();
    let removed = tracker.remove_creature(id)?;
    helpers::log_events(&events);

    println!("Stopped tracking #{} {}", removed.id, removed.creature.name);
    Ok(())
}
