//! Configuration of the manager itself
//!
//! This module handles the options a manager is built from, loaded from
//! code, an optional options file, or environment variables.

pub mod options;

pub use options::*;
