//! Command dispatch functions
//!
//! Breaks up the main match statement into focused dispatch functions.

use std::path::Path;

use anyhow::Result;

use crate::cli::*;
use crate::commands;
use crate::config::Config;

/// Dispatch tracked items subcommands
pub fn dispatch_items(db: &Path, config: &Config, api_url: &str, command: ItemsCommand) -> Result<()> {
    match command {
        ItemsCommand::Init => commands::items::init(db),
        ItemsCommand::Stats => commands::items::stats(db),
        ItemsCommand::Show { id } => commands::items::show(db, id),
        ItemsCommand::List {
            sort,
            desc,
            name,
            format,
        } => {
            let session = config.require_session()?;
            commands::items::list(db, &session, sort.as_deref(), desc, name, format)
        }
        ItemsCommand::Add {
            id,
            name,
            xp,
            offline,
        } => {
            let session = config.require_session()?;
            let api = (!offline).then_some(api_url);
            commands::items::add(db, &session, api, id, name, xp)
        }
        ItemsCommand::Remove { id } => {
            let session = config.require_session()?;
            commands::items::remove(db, &session, id)
        }
        ItemsCommand::Clear => {
            let session = config.require_session()?;
            commands::items::clear(db, &session)
        }
        ItemsCommand::Sort { key } => {
            let session = config.require_session()?;
            commands::items::sort(db, &session, &key)
        }
        ItemsCommand::Unsort => {
            let session = config.require_session()?;
            commands::items::unsort(db, &session)
        }
        ItemsCommand::Set { id, field, value } => {
            config.require_session()?;
            commands::items::set(db, id, &field, &value)
        }
        ItemsCommand::Refresh { id } => {
            let session = config.require_session()?;
            commands::items::refresh(db, &session, api_url, id)
        }
        ItemsCommand::Estimate { id, lot } => {
            let session = config.require_session()?;
            commands::items::estimate(db, &session, id, &lot)
        }
    }
}

/// Dispatch creature subcommands
pub fn dispatch_creature(
    db: &Path,
    config: &Config,
    api_url: &str,
    command: CreatureCommand,
) -> Result<()> {
    match command {
        CreatureCommand::Search { query } => {
            commands::search::search(api_url, &query, true, OutputFormat::Table)
        }
        CreatureCommand::Add {
            pet_id,
            name,
            starting_xp,
            price,
        } => {
            let session = config.require_session()?;
            commands::creature::add(db, &session, api_url, pet_id, name, starting_xp, price)
        }
        CreatureCommand::List => commands::creature::list(db, &config.require_session()?),
        CreatureCommand::Select { id, none } => {
            let session = config.require_session()?;
            commands::creature::select(db, &session, if none { None } else { id })
        }
        CreatureCommand::Show { id } => commands::creature::show(db, &config.require_session()?, id),
        CreatureCommand::Apply {
            item_id,
            lot,
            max,
            fill,
        } => {
            let session = config.require_session()?;
            commands::creature::apply(db, &session, item_id, &lot, max, fill)
        }
        CreatureCommand::Unapply { index, creature } => {
            let session = config.require_session()?;
            commands::creature::unapply(db, &session, index, creature)
        }
        CreatureCommand::Delete { id } => {
            commands::creature::delete(db, &config.require_session()?, id)
        }
    }
}

/// Dispatch experience table subcommands
pub fn dispatch_xp(db: &Path, config: &Config, command: XpCommand) -> Result<()> {
    match command {
        XpCommand::List => commands::xp::list(db),
        XpCommand::Set { level, xp_total } => {
            config.require_session()?;
            commands::xp::set(db, level, xp_total)
        }
        XpCommand::Delete { level } => {
            config.require_session()?;
            commands::xp::delete(db, level)
        }
        XpCommand::Import { path } => {
            config.require_session()?;
            commands::xp::import(db, &path)
        }
    }
}
