//! Subcommands of the `pacman` binary.

pub mod config;
pub mod play;
pub mod train;
