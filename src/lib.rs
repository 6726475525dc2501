//! Offline conversion tools for dungeon room data
//!
//! Re-exports modules for use by the binaries.

pub mod ascii;
pub mod catalog;
pub mod config;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod logging;
pub mod merger;
pub mod tilemap;
