//! Configuration command handlers
//!
//! Handles the `configure` subcommand: signing in and out, and the API URL.

use crate::config::Config;
use anyhow::Result;
use dofus::session::User;

/// Handle the configure command
pub fn handle(
    mut config: Config,
    user_id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    api_url: Option<String>,
    logout: bool,
    show: bool,
) -> Result<()> {
    if show {
        show_config(&config);
        return Ok(());
    }

    let changed = apply_changes(&mut config, user_id, name, email, api_url, logout);
    if !changed {
        show_usage();
        return Ok(());
    }

    config.save()?;
    match config.session() {
        Some(session) => println!("Signed in as {}", session.display_name()),
        None => println!("Signed out"),
    }
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Update `config` in place; returns whether anything was requested
fn apply_changes(
    config: &mut Config,
    user_id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    api_url: Option<String>,
    logout: bool,
) -> bool {
    let mut changed = false;

    if logout {
        config.user = None;
        changed = true;
    }

    if let Some(id) = user_id {
        config.user = Some(User {
            id,
            name: None,
            email: None,
        });
        changed = true;
    }

    // Profile fields only make sense for a signed-in user
    if let Some(user) = config.user.as_mut() {
        if let Some(name) = name {
            user.name = Some(name);
            changed = true;
        }
        if let Some(email) = email {
            user.email = Some(email);
            changed = true;
        }
    }

    if let Some(url) = api_url {
        config.api_url = Some(url.trim_end_matches('/').to_string());
        changed = true;
    }

    changed
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.user {
        Some(user) => {
            println!("User ID: {}", user.id);
            if let Some(name) = &user.name {
                println!("Name:    {}", name);
            }
            if let Some(email) = &user.email {
                println!("Email:   {}", email);
            }
        }
        None => println!("Not signed in"),
    }

    println!("API URL: {}", config.api_url(None));

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: dofus configure --user-id YOUR_ID [--name NAME] [--email EMAIL]");
    println!("   or: dofus configure --api-url URL");
    println!("   or: dofus configure --logout");
    println!("   or: dofus configure --show");
    println!();
    println!("Tracked items, the item sort and creatures are stored per user id.");
}
