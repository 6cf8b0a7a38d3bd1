//! Property-based tests for Ability Cell parsing
//!
//! Tests invariants:
//! - `<score> (<sign><value>)` round-trips into score and signed modifier
//! - Cells without a parenthesized modifier fall back to the default
//! - The modifier always carries an explicit sign

use proptest::prelude::*;

use crate::ingestion::ttrpg::ability_table::{extract_abilities, extract_score};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// A score and a modifier that is never "-0".
fn arb_cell_parts() -> impl Strategy<Value = (u16, bool, u8)> {
    (0u16..=30, any::<bool>(), 0u8..=10)
        .prop_filter("negative zero is normalized", |(_, negative, value)| {
            !(*negative && *value == 0)
        })
}

fn render_modifier(negative: bool, value: u8) -> String {
    if negative {
        format!("-{}", value)
    } else {
        format!("+{}", value)
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: well-formed cells keep both halves verbatim
    #[test]
    fn prop_well_formed_cell_round_trips((score, negative, value) in arb_cell_parts()) {
        let modifier = render_modifier(negative, value);
        let cell = format!("{} ({})", score, modifier);

        let (parsed_score, parsed_modifier) = extract_score(&cell);
        prop_assert_eq!(parsed_score, i32::from(score));
        prop_assert_eq!(parsed_modifier, modifier);
    }

    /// Property: an unsigned modifier is read as positive
    #[test]
    fn prop_unsigned_modifier_gets_plus(score in 0u16..=30, value in 0u8..=10) {
        let (_, modifier) = extract_score(&format!("{} ({})", score, value));
        prop_assert_eq!(modifier, format!("+{}", value));
    }

    /// Property: text with no parenthesized modifier is the default
    #[test]
    fn prop_non_matching_cell_defaults(cell in "[a-zA-Z ]{0,12}") {
        prop_assert_eq!(extract_score(&cell), (10, "+0".to_string()));
    }

    /// Property: a full table round-trips all six cells in column order
    #[test]
    fn prop_table_round_trips(parts in prop::collection::vec(arb_cell_parts(), 6)) {
        let cells: Vec<String> = parts
            .iter()
            .map(|(score, negative, value)| format!("{} ({})", score, render_modifier(*negative, *value)))
            .collect();
        let table = format!(
            ">|STR|DEX|CON|INT|WIS|CHA|\n>|:---:|:---:|:---:|:---:|:---:|:---:|\n>|{}|\n",
            cells.join("|")
        );

        let block = extract_abilities(&table).unwrap();
        for ((_, ability), (score, negative, value)) in block.entries().iter().zip(&parts) {
            prop_assert_eq!(ability.score, i32::from(*score));
            prop_assert_eq!(&ability.modifier, &render_modifier(*negative, *value));
        }
    }
}
