/// Compendium - statblock and spell extraction for SRD-style documents
///
/// Core library that turns Markdown-like creature statblocks and spell
/// cards into canonical records for an import pipeline.

pub mod config;
pub mod core;
pub mod ingestion;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
