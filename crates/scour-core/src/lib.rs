//! Core library for `scour`, a prototype front-end for a disk cleaner.
//!
//! Provides the two-level tree of cleaning options with its search filter,
//! result rows, simulated cleaning runs, the session whitelist, and user
//! configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod mock;
pub mod options;
pub mod results;
pub mod whitelist;
