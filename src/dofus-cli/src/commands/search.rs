//! Item search command handlers

use anyhow::{bail, Result};
use dofus::search::{self, SearchHit, SearchKind, MIN_QUERY_LEN};
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::dofusdude::DofusDudeClient;

/// Search items (or pets) by name and print the ranked suggestions
pub fn search(api_url: &str, query: &str, pets: bool, format: OutputFormat) -> Result<()> {
    if query.trim().chars().count() < MIN_QUERY_LEN {
        bail!("Type at least {} characters to search", MIN_QUERY_LEN);
    }

    let client = DofusDudeClient::new(api_url);
    let kind = if pets { SearchKind::Pets } else { SearchKind::Items };
    let hits = search::search_ranked(&client, query, kind);
    tracing::info!(query, count = hits.len(), "search finished");

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&hits_json(&hits))?);
        }
        OutputFormat::Csv => {
            if !hits.is_empty() {
                println!("{}", dofus::json_to_csv(&hits_json(&hits))?);
            }
        }
        OutputFormat::Table => {
            if hits.is_empty() {
                println!("No results for \"{}\"", query);
            } else {
                print_hits(&hits);
            }
        }
    }

    Ok(())
}

/// Find one id across every item category
pub fn lookup(api_url: &str, id: u64) -> Result<()> {
    let client = DofusDudeClient::new(api_url);
    let Some((category, hit)) = search::find_by_id(&client, id) else {
        bail!("No item with id {}", id);
    };

    println!("Id:       {}", hit.ankama_id);
    println!("Name:     {}", hit.name);
    println!("Type:     {}", hit.type_label());
    println!("Category: {}", category.endpoint());
    if let Some(level) = hit.level {
        println!("Level:    {}", level);
    }
    if let Some(icon) = &hit.icon_url {
        println!("Icon:     {}", icon);
    }
    Ok(())
}

fn hits_json(hits: &[SearchHit]) -> Value {
    Value::Array(
        hits.iter()
            .map(|hit| {
                json!({
                    "id": hit.ankama_id,
                    "name": hit.name,
                    "type": hit.type_label(),
                    "level": hit.level,
                    "icon_url": hit.icon_url,
                })
            })
            .collect(),
    )
}

fn print_hits(hits: &[SearchHit]) {
    println!("{:<8} {:<40} {:<16} {:>5}", "ID", "Name", "Type", "Level");
    println!("{}", "-".repeat(72));
    for hit in hits {
        let level = hit.level.map(|l| l.to_string()).unwrap_or_default();
        println!(
            "{:<8} {:<40} {:<16} {:>5}",
            hit.ankama_id,
            truncate(&hit.name, 40),
            hit.type_label(),
            level
        );
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
