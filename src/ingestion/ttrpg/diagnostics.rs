//! Extraction Diagnostics
//!
//! Non-fatal warnings raised while extracting records. Nothing in the
//! extraction pipeline returns an error for a per-record problem; instead the
//! problem is recorded here, logged, and a documented default is used.

use serde::Serialize;
use thiserror::Error;

/// A recoverable problem found while extracting a record.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A segment lacked the minimum viable fields and was skipped.
    #[error("skipped malformed segment '{title}': {reason}")]
    MalformedSegment {
        /// Header text of the skipped segment.
        title: String,
        /// Which minimum-viable check failed.
        reason: String,
    },

    /// No six-column ability table could be read; defaults were used.
    #[error("no usable ability table for '{entity}'; using default scores")]
    MissingAbilityTable {
        /// Name of the entity being assembled.
        entity: String,
    },

    /// An ability cell did not match `<int> (<sign><int>)`.
    #[error("unparseable ability cell '{cell}'; using 10 (+0)")]
    AbilityCell {
        /// Raw cell text.
        cell: String,
    },

    /// A spell label did not resolve to a numeric level.
    #[error("spell '{spell}' has unresolvable level label '{label}'; using level 0")]
    SpellLevel {
        /// Spell name.
        spell: String,
        /// Raw level/school label.
        label: String,
    },
}

/// Collector for warnings raised during one extraction run.
///
/// Every warning pushed is also emitted through `log::warn!`.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<ParseWarning>,
    skipped: usize,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&mut self, warning: ParseWarning) {
        log::warn!("{}", warning);
        if matches!(warning, ParseWarning::MalformedSegment { .. }) {
            self.skipped += 1;
        }
        self.warnings.push(warning);
    }

    /// Warnings recorded so far, in order.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Number of segments skipped as malformed.
    pub fn skipped_segments(&self) -> usize {
        self.skipped
    }

    /// Whether any warning was recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the collector, returning its warnings.
    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }
}
