//! Batch Import
//!
//! Entry points for the import collaborator: raw bytes in, reports out.
//! Documents are independent, so batches are spread over the rayon pool.

use rayon::prelude::*;
use tracing::instrument;

use super::document_classifier::{classify_with_report, extract_as, DocumentKind, ExtractionReport};
use super::errors::{IngestError, IngestResult};
use super::grammar::GrammarPolicy;

/// Decode `bytes` as UTF-8 and classify it.
///
/// Invalid UTF-8 is the one contract violation that fails hard.
pub fn classify_bytes(
    source_name: &str,
    bytes: &[u8],
    policy: &GrammarPolicy,
) -> IngestResult<ExtractionReport> {
    let text = std::str::from_utf8(bytes).map_err(|e| IngestError::NotText {
        source_name: source_name.to_string(),
        offset: e.valid_up_to(),
    })?;
    Ok(classify_with_report(text, policy))
}

/// Classify many documents in parallel, preserving input order.
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn parse_documents<D>(documents: &[D], policy: &GrammarPolicy) -> Vec<ExtractionReport>
where
    D: AsRef<str> + Sync,
{
    documents
        .par_iter()
        .map(|doc| classify_with_report(doc.as_ref(), policy))
        .collect()
}

/// Like [`parse_documents`], forcing one pipeline unless `kind` is `Unknown`.
#[instrument(skip_all, fields(documents = documents.len(), kind = %kind))]
pub fn parse_documents_as<D>(
    documents: &[D],
    kind: DocumentKind,
    policy: &GrammarPolicy,
) -> Vec<ExtractionReport>
where
    D: AsRef<str> + Sync,
{
    if kind == DocumentKind::Unknown {
        return parse_documents(documents, policy);
    }
    documents
        .par_iter()
        .map(|doc| extract_as(doc.as_ref(), kind, policy))
        .collect()
}
