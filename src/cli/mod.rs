//! CLI infrastructure for the chase-game trainer
//!
//! This module provides the command-line interface for training agents,
//! watching them play, and writing configuration files.

pub mod commands;
pub mod output;
