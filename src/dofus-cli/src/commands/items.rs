//! Tracked items command handlers

use anyhow::{bail, Context, Result};
use dofus::items::{Item, LotSize};
use dofus::ratio::format_ratio;
use dofus::search::{self, ItemCategory, SearchProvider};
use dofus::sort::{SortConfig, SortDirection, SortKey};
use dofus::tier::{classify_all, Tier};
use dofus::Session;
use dofus_idb::{ItemField, ItemFilter, ItemUpdate, ItemsRepository, MembershipRepository};
use serde_json::Value;
use std::path::Path;

use super::helpers::{self, format_price, format_thousands, paint};
use crate::cli::OutputFormat;
use crate::dofusdude::DofusDudeClient;

/// Initialize the database
pub fn init(db: &Path) -> Result<()> {
    helpers::open_db(db)?;
    println!("Initialized database at {}", db.display());
    Ok(())
}

/// Show database statistics
pub fn stats(db: &Path) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    let stats = wdb.stats()?;
    println!("Items:         {}", stats.item_count);
    println!("Tracked:       {}", stats.tracked_count);
    println!("Users:         {}", stats.user_count);
    println!("XP levels:     {}", stats.xp_level_count);
    Ok(())
}

/// Show one item with its ratio for every lot size
pub fn show(db: &Path, id: u64) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    let item = wdb
        .get_item(id)?
        .with_context(|| format!("Item {} not found", id))?;

    println!("Id:       {}", item.id);
    println!("Name:     {}", item.display_name());
    if let Some(category) = &item.category {
        println!("Category: {}", category);
    }
    if let Some(icon) = &item.icon_url {
        println!("Icon:     {}", icon);
    }
    println!(
        "XP:       {}",
        item.xp_per_unit.map(|x| x.to_string()).unwrap_or_else(|| "-".to_string())
    );
    println!();
    println!("{:<8} {:>12} {:>10}", "Lot", "Price", "Kamas/XP");
    for lot in LotSize::ALL {
        println!(
            "{:<8} {:>12} {:>10}",
            lot.to_string(),
            format_price(item.prices.get(lot)),
            format_ratio(item.ratio(lot))
        );
    }
    Ok(())
}

/// List the user's tracked items
pub fn list(
    db: &Path,
    session: &Session,
    sort: Option<&str>,
    desc: bool,
    name: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    let sort_config = match sort {
        Some(key) => SortConfig {
            key: Some(key.parse::<SortKey>()?),
            direction: if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        },
        None => wdb.sort_config(session.namespace())?,
    };

    let filter = ItemFilter {
        user_id: Some(session.namespace().to_string()),
        name_contains: name,
        ..Default::default()
    };
    let mut items = wdb.list_items(&filter)?;
    sort_config.sort(&mut items);

    match format {
        OutputFormat::Json => {
            let records: Vec<Value> = items.iter().map(helpers::item_record).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Csv => {
            if !items.is_empty() {
                let records = Value::Array(items.iter().map(helpers::item_record).collect());
                println!("{}", dofus::json_to_csv(&records)?);
            }
        }
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No tracked items. Add one with `dofus items add <ID>`.");
                return Ok(());
            }
            print_table(&items, &sort_config);
        }
    }

    Ok(())
}

/// Tier of every item for every lot column, `[lot][row]`
fn tier_columns(items: &[Item]) -> Vec<Vec<Tier>> {
    LotSize::ALL
        .iter()
        .map(|&lot| {
            let ratios: Vec<Option<f64>> = items.iter().map(|item| item.ratio(lot)).collect();
            classify_all(&ratios)
        })
        .collect()
}

fn column_header(key: SortKey, sort: &SortConfig) -> String {
    let label = match key {
        SortKey::Name => "Name".to_string(),
        SortKey::Xp => "XP".to_string(),
        SortKey::Ratio(lot) => format!("K/XP {}", lot),
    };
    if sort.key != Some(key) {
        return label;
    }
    match sort.direction {
        SortDirection::Asc => format!("{} ^", label),
        SortDirection::Desc => format!("{} v", label),
    }
}

fn print_table(items: &[Item], sort: &SortConfig) {
    let tiers = tier_columns(items);

    let mut header = format!(
        "{:<8} {:<30} {:>8}",
        "ID",
        column_header(SortKey::Name, sort),
        column_header(SortKey::Xp, sort)
    );
    for lot in LotSize::ALL {
        header.push_str(&format!(" {:>10}", format!("P {}", lot)));
        header.push_str(&format!(" {:>12}", column_header(SortKey::Ratio(lot), sort)));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.chars().count()));

    for (row, item) in items.iter().enumerate() {
        let xp = item.xp_per_unit.map(|x| x.to_string()).unwrap_or_else(|| "-".to_string());
        let mut line = format!("{:<8} {:<30} {:>8}", item.id, item.display_name(), xp);
        for (col, lot) in LotSize::ALL.into_iter().enumerate() {
            line.push_str(&format!(" {:>10}", format_price(item.prices.get(lot))));
            let cell = format!(" {:>12}", format_ratio(item.ratio(lot)));
            line.push_str(&paint(&cell, tiers[col][row]));
        }
        println!("{}", line);
    }

    println!();
    println!("{} items", items.len());
}

/// Track an item, looking its name up unless `api_url` is `None`
pub fn add(
    db: &Path,
    session: &Session,
    api_url: Option<&str>,
    id: u64,
    name: Option<String>,
    xp: Option<f64>,
) -> Result<()> {
    if let Some(xp) = xp {
        if !xp.is_finite() || xp < 0.0 {
            bail!("XP must be a non-negative number, got {}", xp);
        }
    }

    let update = match (name, api_url) {
        (Some(name), _) => ItemUpdate {
            name: Some(name),
            ..Default::default()
        },
        (None, Some(api_url)) => {
            let client = DofusDudeClient::new(api_url);
            match search::find_by_id(&client, id) {
                Some((category, hit)) => hit_update(category, hit),
                None => {
                    tracing::warn!(id, "item not found by the search API");
                    ItemUpdate::default()
                }
            }
        }
        (None, None) => ItemUpdate::default(),
    };

    let wdb = helpers::open_db(db)?;
    wdb.add_item(id)?;
    wdb.update_item(id, &update)?;
    if xp.is_some() {
        wdb.set_field(id, ItemField::Xp, xp)?;
    }
    let added = wdb.add_user_item(session.namespace(), id)?;

    let label = update.name.unwrap_or_else(|| format!("Item {}", id));
    if added {
        println!("Tracking {} ({})", label, id);
    } else {
        println!("{} ({}) is already tracked", label, id);
    }
    Ok(())
}

fn hit_update(category: ItemCategory, hit: search::SearchHit) -> ItemUpdate {
    ItemUpdate {
        name: Some(hit.name),
        icon_url: hit.icon_url,
        category: Some(category.endpoint().to_string()),
    }
}

/// Stop tracking an item; the item row and its prices are kept
pub fn remove(db: &Path, session: &Session, id: u64) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    if wdb.remove_user_item(session.namespace(), id)? {
        println!("Stopped tracking {}", id);
    } else {
        println!("Item {} was not tracked", id);
    }
    Ok(())
}

pub fn clear(db: &Path, session: &Session) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    let removed = wdb.clear_user_items(session.namespace())?;
    println!("Stopped tracking {} items", removed);
    Ok(())
}

/// Toggle the saved sort on `key`
pub fn sort(db: &Path, session: &Session, key: &str) -> Result<()> {
    let key = key.parse::<SortKey>()?;
    let wdb = helpers::open_db(db)?;
    let mut config = wdb.sort_config(session.namespace())?;
    config.toggle(key);
    wdb.set_sort_config(session.namespace(), &config)?;

    let direction = match config.direction {
        SortDirection::Asc => "ascending",
        SortDirection::Desc => "descending",
    };
    println!("Sorting by {} ({})", key, direction);
    Ok(())
}

pub fn unsort(db: &Path, session: &Session) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    wdb.set_sort_config(session.namespace(), &SortConfig::default())?;
    println!("Items are listed in the order they were added");
    Ok(())
}

/// Parse a field value: a non-negative number, or `none` / empty to clear
fn parse_value(value: &str) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    // Prices are often typed with thousands separators
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace() && *c != '_').collect();
    let number: f64 = compact
        .replace(',', ".")
        .parse()
        .with_context(|| format!("Invalid number: {}", value))?;
    if !number.is_finite() || number < 0.0 {
        bail!("Value must be a non-negative number, got {}", value);
    }
    Ok(Some(number))
}

/// Set the xp or a lot price of an item
pub fn set(db: &Path, id: u64, field: &str, value: &str) -> Result<()> {
    let field = field.parse::<ItemField>()?;
    let value = parse_value(value)?;

    let wdb = helpers::open_db(db)?;
    wdb.set_field(id, field, value)?;

    match value {
        Some(v) => println!("{} of {} set to {}", field, id, v),
        None => println!("{} of {} cleared", field, id),
    }
    Ok(())
}

/// Refresh names and icons of tracked items from the search API
pub fn refresh(db: &Path, session: &Session, api_url: &str, id: Option<u64>) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    let ids = match id {
        Some(id) => vec![id],
        None => wdb.user_item_ids(session.namespace())?,
    };

    let client = DofusDudeClient::new(api_url);
    let mut refreshed = 0;
    for id in ids {
        let known = wdb
            .get_item(id)?
            .and_then(|item| item.category)
            .and_then(|c| ItemCategory::parse(&c));

        match lookup(&client, id, known) {
            Some((category, hit)) => {
                let name = hit.name.clone();
                wdb.update_item(id, &hit_update(category, hit))?;
                println!("{:<8} {}", id, name);
                refreshed += 1;
            }
            None => println!("{:<8} not found", id),
        }
    }

    println!("Refreshed {} items", refreshed);
    Ok(())
}

/// Use the stored category first, then try all of them
fn lookup<P: SearchProvider + ?Sized>(
    provider: &P,
    id: u64,
    known: Option<ItemCategory>,
) -> Option<(ItemCategory, search::SearchHit)> {
    if let Some(category) = known {
        match provider.item_by_id(id, category) {
            Ok(Some(hit)) => return Some((category, hit)),
            Ok(None) => {}
            Err(e) => tracing::debug!(id, error = %e, "lookup in stored category failed"),
        }
    }
    search::find_by_id(provider, id)
}

/// Estimate the cost of reaching the selected creature's ceiling with one item
pub fn estimate(db: &Path, session: &Session, id: u64, lot: &str) -> Result<()> {
    let lot = lot.parse::<LotSize>()?;
    let tracker = helpers::open_tracker(db, session)?;
    let Some(creature) = tracker.active() else {
        bail!("No creature is selected. Select one with `dofus creature select <ID>`.");
    };

    let item = tracker
        .store()
        .get_item(id)?
        .with_context(|| format!("Item {} not found", id))?;

    let estimate = dofus::estimate_cost(
        creature.remaining_xp,
        item.prices.get(lot).map(|p| p as f64),
        item.xp_per_unit,
        lot.units(),
    );

    println!(
        "{} for {}: {} xp remaining",
        item.display_name(),
        creature.creature.name,
        helpers::format_xp(creature.remaining_xp)
    );
    match estimate {
        Some(e) => println!(
            "{} lots of {} for {} kamas",
            e.lots_needed,
            lot,
            format_thousands(e.total_cost)
        ),
        None => println!("Price {} and xp must both be filled in", lot),
    }
    Ok(())
}
