//! Document ingestion.

pub mod ttrpg;
