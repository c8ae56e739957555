//! Experience table command handlers

use anyhow::{bail, Context, Result};
use dofus::xp_table::{XpLevel, XpTable};
use dofus_idb::XpTableRepository;
use std::path::Path;

use super::helpers::{self, format_thousands};

/// Show the experience table
pub fn list(db: &Path) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    let table = wdb.xp_table()?;
    if table.is_empty() {
        println!("Experience table is empty. Import one with `dofus xp import <FILE>`.");
        return Ok(());
    }

    println!("{:>6} {:>14}", "Level", "XP total");
    for row in table.levels() {
        println!("{:>6} {:>14}", row.level, format_thousands(row.xp_total));
    }
    if let Some(ceiling) = table.ceiling() {
        println!();
        println!("Ceiling: {}", format_thousands(ceiling));
    }
    Ok(())
}

pub fn set(db: &Path, level: u32, xp_total: u64) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    wdb.set_xp_level(XpLevel { level, xp_total })?;
    println!("Level {} set to {} xp", level, format_thousands(xp_total));
    Ok(())
}

pub fn delete(db: &Path, level: u32) -> Result<()> {
    let wdb = helpers::open_db(db)?;
    if !wdb.delete_xp_level(level)? {
        bail!("Level {} is not in the table", level);
    }
    println!("Removed level {}", level);
    Ok(())
}

/// Replace the table from a JSON or CSV file
pub fn import(db: &Path, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let levels = parse_xp_levels(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    if levels.is_empty() {
        bail!("{} has no levels", path.display());
    }

    let wdb = helpers::open_db(db)?;
    let count = wdb.replace_xp_table(&XpTable::new(levels))?;
    tracing::info!(count, path = %path.display(), "imported experience table");
    println!("Imported {} levels", count);
    Ok(())
}

/// Parse a JSON array of `{level, xp_total}` objects, or `level,xp_total`
/// lines with an optional header
fn parse_xp_levels(contents: &str) -> Result<Vec<XpLevel>> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Invalid JSON experience table");
    }

    let mut levels = Vec::new();
    for (n, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split([',', ';', '\t']).map(str::trim);
        let (Some(level), Some(xp_total)) = (fields.next(), fields.next()) else {
            bail!("Line {}: expected level,xp_total", n + 1);
        };

        match (level.parse::<u32>(), xp_total.replace(' ', "").parse::<u64>()) {
            (Ok(level), Ok(xp_total)) => levels.push(XpLevel { level, xp_total }),
            // Header row
            _ if n == 0 => {}
            _ => bail!("Line {}: invalid level or xp: {}", n + 1, line),
        }
    }
    Ok(levels)
}
