//! Statblock Grammar Rules
//!
//! Named structural rules for the informal Markdown convention used by
//! statblock and spell documents. Every assumption about the layout lives
//! here as either a named pattern or a field of [`GrammarPolicy`], so the
//! assemblers never carry magic offsets or literal markers of their own.
//!
//! The convention, for reference:
//!
//! ```text
//! ___
//! > ## Goblin
//! >*Small humanoid (goblinoid), neutral evil*
//! > - **Armor Class** 15 (leather armor, shield)
//! >|STR|DEX|CON|INT|WIS|CHA|
//! >|:---:|:---:|:---:|:---:|:---:|:---:|
//! >|8 (-1)|14 (+2)|10 (+0)|10 (+0)|8 (-1)|8 (-1)|
//! > ***Nimble Escape.*** The goblin can take the Disengage action...
//! > ### Actions
//! > ***Scimitar.*** *Melee Weapon Attack:* +4 to hit...
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Policy
// ============================================================================

/// Default token separating mechanical statblock text from trailing lore.
pub const DEFAULT_LORE_SENTINEL: &str = "<!-- end statblock -->";

/// Default distance between the ability header row and its values row.
/// The line in between is the table rule (`|:---:|...`).
pub const DEFAULT_ABILITY_ROW_OFFSET: usize = 2;

/// Alignment used when a subtitle carries no comma-separated alignment.
pub const DEFAULT_ALIGNMENT: &str = "unaligned";

/// Tunable layout assumptions shared by every extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarPolicy {
    /// Literal token marking the end of mechanically relevant text.
    pub lore_sentinel: String,
    /// Number of lines between the ability header row and the values row.
    pub ability_row_offset: usize,
    /// Alignment assigned when the subtitle omits one.
    pub default_alignment: String,
}

impl Default for GrammarPolicy {
    fn default() -> Self {
        Self {
            lore_sentinel: DEFAULT_LORE_SENTINEL.to_string(),
            ability_row_offset: DEFAULT_ABILITY_ROW_OFFSET,
            default_alignment: DEFAULT_ALIGNMENT.to_string(),
        }
    }
}

// ============================================================================
// Regex Patterns
// ============================================================================

/// Beast boundary: a horizontal rule, a blockquoted header with the name,
/// then an emphasized subtitle line.
/// Captures: title, subtitle
pub(crate) static BEAST_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mx)
        ^[\ \t]*(?:_{3,}|-{3,}|\*{3,})[\ \t]*\n         # horizontal rule
        [\ \t]*>[\ \t]*\#{1,3}[\ \t]+(?P<title>[^\n]+?)[\ \t]*\n   # > ## Name
        [\ \t]*>[\ \t]*(?P<subtitle>[^\n]*?)[\ \t]*$    # >*Size type, alignment*
        ",
    )
    .expect("Invalid beast boundary regex")
});

/// Any line starting with a blockquoted header marker.
pub(crate) static BLOCKQUOTE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*>[ \t]*#{1,3}[ \t]+\S").expect("Invalid blockquote header regex")
});

/// A bare horizontal rule line.
pub(crate) static RULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:_{3,}|-{3,}|\*{3,})[ \t]*$").expect("Invalid rule line regex")
});

/// Spell boundary: a level-4 header carrying the spell name.
/// Captures: name
pub(crate) static SPELL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*####[ \t]+(?P<name>[^\n]+?)[ \t]*$").expect("Invalid spell header regex")
});

/// Bolded entry start: `***Name.***` or `**Name.**` at the start of a line.
/// Captures: name
pub(crate) static BOLD_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\*{2,3}(?P<name>[^*\n]+?)\.\*{2,3}[ \t]*")
        .expect("Invalid bold entry regex")
});

/// Section header for the actions list.
pub(crate) static ACTIONS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*#{2,4}[ \t]*actions[ \t]*$").expect("Invalid actions header regex")
});

/// Section header for reactions.
pub(crate) static REACTIONS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*#{2,4}[ \t]*reactions[ \t]*$")
        .expect("Invalid reactions header regex")
});

/// Section header for legendary actions.
pub(crate) static LEGENDARY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*#{2,4}[ \t]*legendary[ \t]+actions[ \t]*$")
        .expect("Invalid legendary actions header regex")
});

/// Ability cell: integer score followed by a parenthesized signed modifier.
/// Captures: score, sign, value
pub(crate) static ABILITY_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<score>\d+)[ \t]*\([ \t]*(?P<sign>[+\-−–]?)[ \t]*(?P<value>\d+)[ \t]*\)$")
        .expect("Invalid ability cell regex")
});

/// Numeric spell level: "3rd-level", "1st level".
/// Captures: level
pub(crate) static SPELL_LEVEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<level>\d)(?:st|nd|rd|th)?[- ]level\b").expect("Invalid spell level regex")
});

/// Meta property line: `- **Casting Time:** 1 action`.
/// Captures: key, value
pub(crate) static META_PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*[-*+][ \t]+\*\*(?P<key>[^*:]+?)[ \t]*(?::\*\*|\*\*:)[ \t]*(?P<value>.*?)[ \t]*$")
        .expect("Invalid meta property regex")
});

/// Bold "At Higher Levels." marker opening the upcast paragraph.
pub(crate) static HIGHER_LEVELS_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*\*{2,3}at[ \t]+higher[ \t]+levels\.?\*{2,3}\.?[ \t]*")
        .expect("Invalid higher levels regex")
});

/// Classes trailer line in any of its encodings.
/// Captures: list
pub(crate) static CLASSES_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:\*\*classes:\*\*|\*\*classes\*\*:|classes:)[ \t]*(?P<list>[^\n]*)$")
        .expect("Invalid classes regex")
});

/// Environment line within trailing lore: `**Environment:** forest, hills`.
/// Captures: value
pub(crate) static ENVIRONMENT_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:[-*][ \t]+)?\*\*environments?(?::\*\*|\*\*:)[ \t]*(?P<value>[^\n]*?)[ \t]*$")
        .expect("Invalid environment field regex")
});

/// Environment header within trailing lore: `#### Environment`.
pub(crate) static ENVIRONMENT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*#{2,6}[ \t]*environments?[ \t]*$")
        .expect("Invalid environment header regex")
});

// ============================================================================
// Line Rules
// ============================================================================

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Strip a single blockquote prefix (`>` plus one optional space) from a line.
pub fn strip_quote(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('>') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

/// Strip blockquote prefixes from every line of a block.
pub fn unquote(block: &str) -> String {
    block.lines().map(strip_quote).collect::<Vec<_>>().join("\n")
}

/// Strip a blockquote prefix and a leading list bullet from a field line.
pub fn strip_field_prefix(line: &str) -> &str {
    let line = strip_quote(line).trim_start();
    for bullet in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim_start();
        }
    }
    line
}

/// Whether a line is a horizontal rule (`___`, `---`, `***`).
pub fn is_rule_line(line: &str) -> bool {
    RULE_LINE.is_match(strip_quote(line))
}

/// Remove surrounding emphasis markers (`*`, `_`) from a short label.
pub fn strip_emphasis(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '*' || c == '_').trim()
}

/// Split a pipe-delimited row into cells, dropping the empty border cells.
pub fn split_table_row(line: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = strip_quote(line).trim().split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

/// Collapse hard-wrapped lines of a description into paragraphs.
///
/// Lines within a paragraph are joined with a space; blank lines separate
/// paragraphs, which are joined with `\n\n`.
pub fn collapse_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(|para| {
            para.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ============================================================================
// Cursor
// ============================================================================

/// An immutable position within a text block.
///
/// Each extraction step takes a cursor and returns a new one rather than
/// advancing shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    /// Byte offset into the underlying text.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Remaining text from the cursor position.
    pub fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    /// Whether nothing remains.
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// A cursor at an absolute offset, clamped to the text length.
    pub fn at(&self, offset: usize) -> Self {
        Self {
            text: self.text,
            offset: offset.min(self.text.len()),
        }
    }

    /// Text between this cursor and `end`.
    pub fn slice_to(&self, end: Cursor<'a>) -> &'a str {
        &self.text[self.offset..end.offset.max(self.offset)]
    }

    /// Find the next match of `pattern` at or after the cursor.
    ///
    /// Returns the absolute `(start, end)` of the match.
    pub fn find(&self, pattern: &Regex) -> Option<(usize, usize)> {
        pattern
            .find(self.rest())
            .map(|m| (self.offset + m.start(), self.offset + m.end()))
    }
}

// ============================================================================
// Tests
// ============================================================================
