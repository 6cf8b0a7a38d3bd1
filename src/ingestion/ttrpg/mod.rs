//! Statblock and Spell Extraction
//!
//! Pulls creature statblocks and spell cards out of Markdown-like SRD
//! documents. Each stage is a pure function over text:
//!
//! - [`grammar`]: named layout rules, the [`GrammarPolicy`] and [`grammar::Cursor`]
//! - [`field_extractor`]: single-line `**Label** value` fields
//! - [`ability_table`]: the six-column STR..CHA table
//! - [`segmenter`]: statblock boundaries
//! - [`beast_assembler`]: one statblock into a [`BeastRecord`]
//! - [`spell_assembler`]: spell boundaries and [`SpellRecord`]s
//! - [`document_classifier`]: pipeline selection with fallback
//! - [`batch`]: byte input and parallel batches

pub mod ability_table;
pub mod batch;
pub mod beast_assembler;
pub mod diagnostics;
pub mod document_classifier;
pub mod errors;
pub mod field_extractor;
pub mod grammar;
pub mod records;
pub mod segmenter;
pub mod spell_assembler;

pub use ability_table::{extract_abilities, extract_score};
pub use batch::{classify_bytes, parse_documents, parse_documents_as};
pub use beast_assembler::{assemble_beast, assemble_beasts};
pub use diagnostics::{Diagnostics, ParseWarning};
pub use document_classifier::{
    classify, classify_with_report, detect_kind, extract_as, DocumentKind, ExtractionReport,
    ParsedDocument,
};
pub use errors::{IngestError, IngestResult};
pub use field_extractor::extract_field;
pub use grammar::GrammarPolicy;
pub use records::{
    challenge_to_decimal, AbilityBlock, AbilityScore, BeastRecord, NamedEntry, SpellRecord,
};
pub use segmenter::{segment_beasts, BeastSegment};
pub use spell_assembler::{assemble_spells, segment_spells, SpellSegment};
