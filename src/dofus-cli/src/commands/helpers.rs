//! Shared helpers for command handlers

use anyhow::{Context, Result};
use dofus::items::{Item, LotSize};
use dofus::ratio::format_ratio;
use dofus::tier::Tier;
use dofus::tracker::{LedgerEvent, Tracker};
use dofus::Session;
use dofus_idb::{ItemsRepository, SqliteDb};
use owo_colors::OwoColorize;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Open the database, creating it and applying migrations as needed
pub fn open_db(db: &Path) -> Result<SqliteDb> {
    if let Some(parent) = db.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let wdb = SqliteDb::open(db).with_context(|| format!("Failed to open {}", db.display()))?;
    wdb.init()?;
    Ok(wdb)
}

/// Open the creature ledger of the session user
pub fn open_tracker(db: &Path, session: &Session) -> Result<Tracker<SqliteDb>> {
    let wdb = open_db(db)?;
    Ok(Tracker::open(wdb, session.namespace())?)
}

/// Log every change a command committed
pub fn log_events(events: &crossbeam_channel::Receiver<LedgerEvent>) {
    for event in events.try_iter() {
        match event.creature() {
            Some(creature) => tracing::info!(
                creature = creature.id,
                remaining_xp = creature.remaining_xp,
                total_cost = creature.total_cost,
                "ledger updated"
            ),
            None => tracing::info!(?event, "ledger updated"),
        }
    }
}

/// Group digits by thousands, French style: `1 234 567`
pub fn format_thousands(n: impl Into<i128>) -> String {
    let n: i128 = n.into();
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_price(price: Option<i64>) -> String {
    price.map(format_thousands).unwrap_or_else(|| "-".to_string())
}

/// Experience amounts are fractional; show them rounded up to whole points
pub fn format_xp(xp: f64) -> String {
    format_thousands(xp.ceil() as i128)
}

/// Color a padded cell according to its tier
pub fn paint(cell: &str, tier: Tier) -> String {
    match tier {
        Tier::Best => cell.bright_green().to_string(),
        Tier::Good => cell.green().to_string(),
        Tier::Mid => cell.yellow().to_string(),
        Tier::Poor => cell.bright_red().to_string(),
        Tier::Worst => cell.red().to_string(),
        Tier::None => cell.dimmed().to_string(),
    }
}

/// Flat record of an item for JSON and CSV output
pub fn item_record(item: &Item) -> Value {
    let mut record = Map::new();
    record.insert("id".to_string(), json!(item.id));
    record.insert("name".to_string(), json!(item.display_name()));
    record.insert("category".to_string(), json!(item.category));
    record.insert("xp".to_string(), json!(item.xp_per_unit));
    for lot in LotSize::ALL {
        record.insert(format!("price_{}", lot), json!(item.prices.get(lot)));
    }
    for lot in LotSize::ALL {
        let ratio = item.ratio(lot).map(|r| format_ratio(Some(r)));
        record.insert(format!("ratio_{}", lot), json!(ratio));
    }
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1 000");
        assert_eq!(format_thousands(1234567), "1 234 567");
        assert_eq!(format_thousands(-45000), "-45 000");
        assert_eq!(format_thousands(u64::MAX), "18 446 744 073 709 551 615");
    }

    #[test]
    fn test_format_xp_rounds_up() {
        assert_eq!(format_xp(1049.2), "1 050");
        assert_eq!(format_xp(0.0), "0");
    }

    #[test]
    fn test_item_record_columns() {
        let mut item = Item::new(289);
        item.name = Some("Blé".to_string());
        item.xp_per_unit = Some(10.0);
        item.prices.set(LotSize::Ten, Some(450));

        let record = item_record(&item);
        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "id");
        assert_eq!(keys.len(), 12);
        assert_eq!(record["price_10u"], json!(450));
        assert_eq!(record["ratio_10u"], json!("4.50"));
        assert_eq!(record["ratio_1u"], Value::Null);
    }

    #[test]
    fn test_open_db_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("share").join("dofus.db");
        open_db(&path).unwrap();
        assert!(path.exists());
    }
}
