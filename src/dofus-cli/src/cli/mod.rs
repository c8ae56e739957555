//! CLI argument definitions for dofus
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod creature;
mod items;
mod xp;

pub use core::{Cli, Commands, ExportTarget};
pub use creature::CreatureCommand;
pub use items::{ItemsCommand, OutputFormat};
pub use xp::XpCommand;
