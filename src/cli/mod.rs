//! CLI infrastructure for the skirmish controller
//!
//! Subcommands train from a recorded battle, inspect stored weights and
//! initialise fresh weight files.

pub mod commands;
pub mod output;
