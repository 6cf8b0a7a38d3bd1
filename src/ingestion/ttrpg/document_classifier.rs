//! Document Classification Module
//!
//! Decides whether a document holds creature statblocks or spell cards by
//! its structural signature, then runs the matching pipeline. When the
//! signature is ambiguous both pipelines are tried.

use serde::Serialize;

use super::beast_assembler::assemble_beasts_with;
use super::diagnostics::{Diagnostics, ParseWarning};
use super::grammar::{
    normalize_line_endings, GrammarPolicy, BLOCKQUOTE_HEADER, RULE_LINE, SPELL_HEADER,
};
use super::records::{BeastRecord, SpellRecord};
use super::spell_assembler::assemble_spells_with;

// ============================================================================
// Types
// ============================================================================

/// Which pipeline produced a document's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Beasts,
    Spells,
    Unknown,
}

impl DocumentKind {
    /// Machine-readable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beasts => "beasts",
            Self::Spells => "spells",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a kind from its identifier.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beasts" | "beast" | "monsters" | "bestiary" => Some(Self::Beasts),
            "spells" | "spell" => Some(Self::Spells),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum ParsedDocument {
    Beasts(Vec<BeastRecord>),
    Spells(Vec<SpellRecord>),
    Unknown,
}

impl ParsedDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Beasts(_) => DocumentKind::Beasts,
            Self::Spells(_) => DocumentKind::Spells,
            Self::Unknown => DocumentKind::Unknown,
        }
    }

    /// Number of records extracted.
    pub fn len(&self) -> usize {
        match self {
            Self::Beasts(beasts) => beasts.len(),
            Self::Spells(spells) => spells.len(),
            Self::Unknown => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classification outcome together with everything noticed on the way.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub document: ParsedDocument,
    pub warnings: Vec<ParseWarning>,
    pub skipped_segments: usize,
}

impl ExtractionReport {
    fn new(document: ParsedDocument, diagnostics: Diagnostics) -> Self {
        Self {
            document,
            skipped_segments: diagnostics.skipped_segments(),
            warnings: diagnostics.into_warnings(),
        }
    }
}

// ============================================================================
// Detection
// ============================================================================

/// Which pipeline the document's signature points to first.
pub fn detect_kind(text: &str) -> DocumentKind {
    if RULE_LINE.is_match(text) && BLOCKQUOTE_HEADER.is_match(text) {
        DocumentKind::Beasts
    } else if SPELL_HEADER.is_match(text) {
        DocumentKind::Spells
    } else {
        DocumentKind::Unknown
    }
}

/// Classify and extract with the default grammar policy.
///
/// Never fails: a document no pipeline understands is [`ParsedDocument::Unknown`].
pub fn classify(text: &str) -> ParsedDocument {
    classify_with_report(text, &GrammarPolicy::default()).document
}

/// Classify and extract, returning warnings and skip counts alongside.
pub fn classify_with_report(text: &str, policy: &GrammarPolicy) -> ExtractionReport {
    let text = normalize_line_endings(text);
    let preferred = detect_kind(&text);
    log::debug!("Document signature suggests {}", preferred);

    let order = match preferred {
        DocumentKind::Spells => [DocumentKind::Spells, DocumentKind::Beasts],
        DocumentKind::Beasts | DocumentKind::Unknown => [DocumentKind::Beasts, DocumentKind::Spells],
    };

    // Warnings from the preferred layout explain an empty result.
    let mut first_attempt: Option<Diagnostics> = None;
    for kind in order {
        let mut diagnostics = Diagnostics::new();
        let document = run_pipeline(kind, &text, policy, &mut diagnostics);
        if !document.is_empty() {
            log::info!("Extracted {} {} record(s)", document.len(), document.kind());
            return ExtractionReport::new(document, diagnostics);
        }
        log::debug!("{} pipeline produced no records", kind);
        first_attempt.get_or_insert(diagnostics);
    }

    log::info!("Document matched no known layout");
    ExtractionReport::new(ParsedDocument::Unknown, first_attempt.unwrap_or_default())
}

/// Run exactly one pipeline, without fallback.
pub fn extract_as(text: &str, kind: DocumentKind, policy: &GrammarPolicy) -> ExtractionReport {
    let text = normalize_line_endings(text);
    let mut diagnostics = Diagnostics::new();
    let document = run_pipeline(kind, &text, policy, &mut diagnostics);
    if document.is_empty() {
        return ExtractionReport::new(ParsedDocument::Unknown, diagnostics);
    }
    ExtractionReport::new(document, diagnostics)
}

fn run_pipeline(
    kind: DocumentKind,
    text: &str,
    policy: &GrammarPolicy,
    diagnostics: &mut Diagnostics,
) -> ParsedDocument {
    match kind {
        DocumentKind::Beasts => ParsedDocument::Beasts(assemble_beasts_with(text, policy, diagnostics)),
        DocumentKind::Spells => ParsedDocument::Spells(assemble_spells_with(text, diagnostics)),
        DocumentKind::Unknown => ParsedDocument::Unknown,
    }
}
