//! Command handlers for dofus CLI
//!
//! Each submodule handles a specific command group.

pub mod configure;
pub mod creature;
pub mod export;
pub mod helpers;
pub mod items;
pub mod search;
pub mod xp;
