//! Beast Segmentation
//!
//! Splits a document into statblock segments. A segment starts at a
//! horizontal rule followed by a blockquoted `## Name` header and a subtitle
//! line; its body runs to the next such boundary or the end of the text.

use super::beast_assembler::truncate_at_sentinel;
use super::diagnostics::{Diagnostics, ParseWarning};
use super::field_extractor::extract_field;
use super::grammar::{strip_emphasis, Cursor, GrammarPolicy, BEAST_BOUNDARY, DEFAULT_LORE_SENTINEL};

/// Field labels of which at least one must appear in a viable statblock body.
pub const BEAST_VIABILITY_MARKERS: [&str; 2] = ["Armor Class", "Challenge"];

/// One `(title, subtitle, body)` statblock segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeastSegment<'a> {
    /// Creature name from the header line.
    pub title: &'a str,
    /// Size/type/alignment line, emphasis stripped.
    pub subtitle: &'a str,
    /// Everything after the subtitle line up to the next boundary.
    pub body: &'a str,
}

impl<'a> BeastSegment<'a> {
    /// Whether the body passes the minimum-viable-fields check.
    pub fn is_viable(&self) -> bool {
        self.is_viable_before(DEFAULT_LORE_SENTINEL)
    }

    /// Minimum-viable-fields check over the text before `sentinel`.
    ///
    /// Only labeled field lines count; prose that merely mentions
    /// "Armor Class" does not make a statblock.
    pub fn is_viable_before(&self, sentinel: &str) -> bool {
        let (mechanical, _) = truncate_at_sentinel(self.body, sentinel);
        BEAST_VIABILITY_MARKERS
            .iter()
            .any(|label| extract_field(mechanical, label).is_some())
    }
}

/// Iterator over every boundary-delimited segment, viable or not.
///
/// Restartable: iterating the same text again yields identical segments.
#[derive(Debug, Clone)]
pub struct RawSegments<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Iterator for RawSegments<'a> {
    type Item = BeastSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = BEAST_BOUNDARY.captures(self.cursor.rest())?;
        let base = self.cursor.offset();
        let whole = caps.get(0)?;
        let title = caps.name("title")?.as_str().trim();
        let subtitle = strip_emphasis(caps.name("subtitle")?.as_str());

        let body_start = self.cursor.at(base + whole.end());
        let body_end = match body_start.find(&BEAST_BOUNDARY) {
            Some((start, _)) => body_start.at(start),
            None => body_start.at(usize::MAX),
        };
        let body = body_start.slice_to(body_end);

        self.cursor = body_end;
        Some(BeastSegment {
            title,
            subtitle,
            body,
        })
    }
}

/// Every segment in `text`, including malformed ones.
pub fn raw_segments(text: &str) -> RawSegments<'_> {
    RawSegments {
        cursor: Cursor::new(text),
    }
}

/// Viable statblock segments in document order.
///
/// Segments lacking both an Armor Class and a Challenge marker are skipped;
/// segmentation continues past them.
pub fn segment_beasts(text: &str) -> impl Iterator<Item = BeastSegment<'_>> + '_ {
    raw_segments(text).filter(|segment| {
        if !segment.is_viable() {
            log::debug!("Skipping non-statblock segment '{}'", segment.title);
        }
        segment.is_viable()
    })
}

/// Viable segments, recording each skipped segment in `diagnostics`.
pub fn segment_beasts_with<'a>(
    text: &'a str,
    policy: &GrammarPolicy,
    diagnostics: &mut Diagnostics,
) -> Vec<BeastSegment<'a>> {
    let mut segments = Vec::new();
    for segment in raw_segments(text) {
        if segment.is_viable_before(&policy.lore_sentinel) {
            segments.push(segment);
        } else {
            diagnostics.warn(ParseWarning::MalformedSegment {
                title: segment.title.to_string(),
                reason: "no Armor Class or Challenge field".to_string(),
            });
        }
    }
    segments
}
