//! Command implementations for the terrafile CLI

pub mod completions;
pub mod sync;
pub mod version;
