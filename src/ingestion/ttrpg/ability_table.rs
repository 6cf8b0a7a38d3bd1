//! Ability Table Extraction
//!
//! Reads the six-column ability table:
//!
//! ```text
//! >|STR|DEX|CON|INT|WIS|CHA|
//! >|:---:|:---:|:---:|:---:|:---:|:---:|
//! >|21 (+5)|9 (-1)|15 (+2)|18 (+4)|15 (+2)|18 (+4)|
//! ```
//!
//! The values row is found at a fixed offset below the header (see
//! [`GrammarPolicy::ability_row_offset`]). A table whose values row does not
//! hold exactly six cells is rejected as a whole rather than misaligned.

use super::diagnostics::{Diagnostics, ParseWarning};
use super::grammar::{split_table_row, GrammarPolicy, ABILITY_CELL};
use super::records::{AbilityBlock, AbilityScore};

/// Column abbreviations expected in the header row, in order.
pub const ABILITY_HEADERS: [&str; 6] = ["STR", "DEX", "CON", "INT", "WIS", "CHA"];

/// Whether a line is the six-column ability header row.
pub fn is_ability_header(line: &str) -> bool {
    let cells = split_table_row(line);
    cells.len() == ABILITY_HEADERS.len()
        && cells
            .iter()
            .zip(ABILITY_HEADERS)
            .all(|(cell, header)| cell.eq_ignore_ascii_case(header))
}

/// Extract the ability block with the default grammar policy.
///
/// Returns `None` when no header is found, the values row is missing, or the
/// row does not have exactly six non-empty cells.
pub fn extract_abilities(body: &str) -> Option<AbilityBlock> {
    extract_abilities_with(body, &GrammarPolicy::default(), &mut Diagnostics::new())
}

/// Extract the ability block, recording unreadable cells in `diagnostics`.
pub fn extract_abilities_with(
    body: &str,
    policy: &GrammarPolicy,
    diagnostics: &mut Diagnostics,
) -> Option<AbilityBlock> {
    let lines: Vec<&str> = body.lines().collect();
    let header_idx = lines.iter().position(|line| is_ability_header(line))?;
    let values_row = lines.get(header_idx + policy.ability_row_offset)?;

    let cells = split_table_row(values_row);
    if cells.len() != ABILITY_HEADERS.len() || cells.iter().any(|c| c.is_empty()) {
        log::debug!(
            "Rejecting ability row with {} cells: {:?}",
            cells.len(),
            values_row
        );
        return None;
    }

    let mut scores: [AbilityScore; 6] = Default::default();
    for (slot, cell) in scores.iter_mut().zip(&cells) {
        *slot = match parse_score(cell) {
            Some(score) => score,
            None => {
                diagnostics.warn(ParseWarning::AbilityCell {
                    cell: cell.to_string(),
                });
                AbilityScore::default()
            }
        };
    }

    Some(AbilityBlock::from_ordered(scores))
}

/// Parse one cell into `(score, modifier)`, defaulting to `(10, "+0")`.
pub fn extract_score(cell: &str) -> (i32, String) {
    let score = parse_score(cell).unwrap_or_else(|| {
        log::warn!("{}", ParseWarning::AbilityCell { cell: cell.to_string() });
        AbilityScore::default()
    });
    (score.score, score.modifier)
}

/// Parse `<int> (<sign><int>)`, normalizing the modifier to carry a sign.
pub fn parse_score(cell: &str) -> Option<AbilityScore> {
    let caps = ABILITY_CELL.captures(cell.trim())?;
    let score: i32 = caps.name("score")?.as_str().parse().ok()?;
    let value: i32 = caps.name("value")?.as_str().parse().ok()?;
    let negative = caps
        .name("sign")
        .map(|s| !s.as_str().is_empty() && s.as_str() != "+")
        .unwrap_or(false);

    let modifier = if negative && value != 0 {
        format!("-{}", value)
    } else {
        format!("+{}", value)
    };
    Some(AbilityScore::new(score, modifier))
}
