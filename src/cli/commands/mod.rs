//! CLI subcommands

pub mod init;
pub mod inspect;
pub mod train;
