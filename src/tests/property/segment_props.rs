//! Property-based tests for Statblock segmentation
//!
//! Tests invariants:
//! - N well-formed statblocks yield exactly N segments in document order
//! - Segmentation is restartable (same text, same segments)
//! - Nothing at or after the lore sentinel reaches the mechanical text

use proptest::prelude::*;

use crate::ingestion::ttrpg::beast_assembler::{assemble_beasts, truncate_at_sentinel};
use crate::ingestion::ttrpg::grammar::DEFAULT_LORE_SENTINEL;
use crate::ingestion::ttrpg::segmenter::segment_beasts;
use crate::tests::common::statblock;

/// Creature names: one to three capitalized words.
fn arb_name() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z][a-z]{2,8}", 1..=3).prop_map(|words| words.join(" "))
}

proptest! {
    /// Property: segment count and order follow the statblocks
    #[test]
    fn prop_segments_follow_statblocks(names in prop::collection::vec(arb_name(), 1..8)) {
        let document: String = names
            .iter()
            .map(|name| statblock(name, "1 (200 XP)"))
            .collect();

        let titles: Vec<&str> = segment_beasts(&document).map(|s| s.title).collect();
        prop_assert_eq!(titles.len(), names.len());
        for (title, name) in titles.iter().zip(&names) {
            prop_assert_eq!(*title, name.as_str());
        }

        let again: Vec<&str> = segment_beasts(&document).map(|s| s.title).collect();
        prop_assert_eq!(again, titles);
    }

    /// Property: every assembled record keeps its challenge rating
    #[test]
    fn prop_assembled_records_match(names in prop::collection::vec(arb_name(), 1..5), cr in 0u8..=30) {
        let document: String = names
            .iter()
            .map(|name| statblock(name, &format!("{} (10 XP)", cr)))
            .collect();

        let beasts = assemble_beasts(&document);
        prop_assert_eq!(beasts.len(), names.len());
        for beast in &beasts {
            prop_assert_eq!(&beast.challenge_rating, &cr.to_string());
            prop_assert_eq!(beast.experience_points, Some(10));
        }
    }

    /// Property: the sentinel splits text into a prefix and a suffix
    #[test]
    fn prop_sentinel_truncates(before in "[a-zA-Z .\n]{0,60}", after in "[a-zA-Z .\n]{0,60}") {
        let text = format!("{}{}{}", before, DEFAULT_LORE_SENTINEL, after);
        let (mechanical, residual) = truncate_at_sentinel(&text, DEFAULT_LORE_SENTINEL);
        prop_assert_eq!(mechanical, before.as_str());
        prop_assert_eq!(residual, after.as_str());
        prop_assert!(!mechanical.contains(DEFAULT_LORE_SENTINEL));
    }

    /// Property: without a sentinel the text is untouched
    #[test]
    fn prop_missing_sentinel_is_noop(text in "[a-zA-Z .\n]{0,80}") {
        let (mechanical, residual) = truncate_at_sentinel(&text, DEFAULT_LORE_SENTINEL);
        prop_assert_eq!(mechanical, text.as_str());
        prop_assert_eq!(residual, "");
    }
}
