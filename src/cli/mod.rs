//! CLI module for the sectional demo binary
//!
//! This module contains the command definitions, argument parsing, and the
//! demo sections the commands operate on.

pub mod commands;
pub mod sections;

pub use commands::*;
