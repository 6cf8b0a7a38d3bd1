//! Bestiary Unit Tests
//!
//! Tests for statblock assembly over a multi-creature chapter, including a
//! malformed sidebar, trailing lore and a statblock without rule lines.

use crate::ingestion::ttrpg::beast_assembler::assemble_beasts_with;
use crate::ingestion::ttrpg::records::AbilityScore;
use crate::ingestion::ttrpg::{
    assemble_beasts, BeastRecord, Diagnostics, GrammarPolicy, ParseWarning,
};
use crate::tests::common::*;

// ============================================================================
// Helpers
// ============================================================================

fn bestiary() -> Vec<BeastRecord> {
    assemble_beasts(BESTIARY)
}

fn find<'a>(beasts: &'a [BeastRecord], name: &str) -> &'a BeastRecord {
    beasts
        .iter()
        .find(|b| b.name == name)
        .unwrap_or_else(|| panic!("no beast named {name}"))
}

// ============================================================================
// Segmentation
// ============================================================================

#[test]
fn test_malformed_block_is_skipped() {
    let beasts = bestiary();
    let names: Vec<&str> = beasts.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, BESTIARY_NAMES);
}

#[test]
fn test_skipped_block_is_reported() {
    let mut diagnostics = Diagnostics::new();
    let beasts = assemble_beasts_with(BESTIARY, &GrammarPolicy::default(), &mut diagnostics);

    assert_eq!(beasts.len(), 3);
    assert_eq!(diagnostics.skipped_segments(), 1);
    assert!(diagnostics.warnings().iter().any(|w| matches!(
        w,
        ParseWarning::MalformedSegment { title, .. } if title == "Variant: Goblin Boss"
    )));
}

#[test]
fn test_record_ids_are_unique() {
    let beasts = bestiary();
    assert_ne!(beasts[0].id, beasts[1].id);
    assert_ne!(beasts[1].id, beasts[2].id);
}

#[test]
fn test_crlf_document_matches_lf() {
    let crlf = BESTIARY.replace('\n', "\r\n");
    let beasts = assemble_beasts(&crlf);
    assert_eq!(beasts.len(), 3);
    assert_eq!(find(&beasts, "Goblin").armor_class, "15 (leather armor, shield)");
}

// ============================================================================
// Goblin
// ============================================================================

#[test]
fn test_goblin_header_fields() {
    let beasts = bestiary();
    let goblin = find(&beasts, "Goblin");

    assert_eq!(goblin.size, "Small");
    assert_eq!(goblin.creature_type, "humanoid (goblinoid)");
    assert_eq!(goblin.alignment, "neutral evil");
    assert_eq!(goblin.armor_class, "15 (leather armor, shield)");
    assert_eq!(goblin.hit_points, "7 (2d6)");
    assert_eq!(goblin.speed, "30 ft.");
}

#[test]
fn test_goblin_optional_fields() {
    let beasts = bestiary();
    let goblin = find(&beasts, "Goblin");

    assert_eq!(goblin.skills.as_deref(), Some("Stealth +6"));
    assert_eq!(
        goblin.senses.as_deref(),
        Some("darkvision 60 ft., passive Perception 9")
    );
    assert_eq!(goblin.languages.as_deref(), Some("Common, Goblin"));
    assert_eq!(goblin.proficiency_bonus.as_deref(), Some("+2"));
    assert!(goblin.saving_throws.is_none());
    assert!(goblin.damage_immunities.is_none());
    assert!(goblin.condition_immunities.is_none());
}

#[test]
fn test_goblin_challenge() {
    let beasts = bestiary();
    let goblin = find(&beasts, "Goblin");

    assert_eq!(goblin.challenge_rating, "1/4");
    assert_eq!(goblin.experience_points, Some(50));
}

#[test]
fn test_goblin_abilities() {
    let beasts = bestiary();
    let abilities = &find(&beasts, "Goblin").abilities;

    assert_eq!(abilities.strength, AbilityScore::new(8, "-1"));
    assert_eq!(abilities.dexterity, AbilityScore::new(14, "+2"));
    assert_eq!(abilities.constitution, AbilityScore::new(10, "+0"));
    assert_eq!(abilities.charisma, AbilityScore::new(8, "-1"));
}

#[test]
fn test_goblin_traits_and_actions() {
    let beasts = bestiary();
    let goblin = find(&beasts, "Goblin");

    assert_eq!(goblin.traits.len(), 1);
    assert_eq!(goblin.traits[0].name, "Nimble Escape");
    assert!(goblin.traits[0].description.starts_with("The goblin can take"));

    let actions: Vec<&str> = goblin.actions.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(actions, ["Scimitar", "Shortbow"]);
    assert!(goblin.actions[1].description.ends_with("piercing damage."));
    assert!(goblin.reactions.is_empty());
    assert!(goblin.legendary_actions.is_empty());
}

#[test]
fn test_goblin_lore_and_environment() {
    let beasts = bestiary();
    let goblin = find(&beasts, "Goblin");

    assert_eq!(
        goblin.environment.as_deref(),
        Some("Forest, grassland, hill, underdark")
    );
    assert_eq!(
        goblin.lore.as_deref(),
        Some("Goblins gather in warrens beneath the hills.")
    );
    assert!(!goblin
        .actions
        .iter()
        .any(|a| a.description.contains("warrens")));
}

// ============================================================================
// Wolf & Giant Rat
// ============================================================================

#[test]
fn test_wolf_has_no_skills() {
    let beasts = bestiary();
    let wolf = find(&beasts, "Wolf");

    assert!(wolf.skills.is_none());
    assert_eq!(wolf.alignment, "unaligned");
    assert_eq!(wolf.languages.as_deref(), Some("—"));
    assert_eq!(wolf.traits.len(), 2);
    assert_eq!(wolf.traits[1].name, "Pack Tactics");
    assert!(wolf.lore.is_none());
    assert!(wolf.environment.is_none());
}

#[test]
fn test_giant_rat_defaults_alignment() {
    let beasts = bestiary();
    let rat = find(&beasts, "Giant Rat");

    assert_eq!(rat.size, "Small");
    assert_eq!(rat.creature_type, "beast");
    assert_eq!(rat.alignment, "unaligned");
    assert_eq!(rat.challenge_rating, "1/8");
    assert_eq!(rat.experience_points, Some(25));
    assert_eq!(rat.abilities.intelligence, AbilityScore::new(2, "-4"));
    assert_eq!(rat.actions.len(), 1);
}

// ============================================================================
// Policy
// ============================================================================

#[test]
fn test_custom_default_alignment() {
    let policy = GrammarPolicy {
        default_alignment: "any alignment".to_string(),
        ..GrammarPolicy::default()
    };
    let beasts = assemble_beasts_with(BESTIARY, &policy, &mut Diagnostics::new());
    assert_eq!(find(&beasts, "Giant Rat").alignment, "any alignment");
    assert_eq!(find(&beasts, "Wolf").alignment, "unaligned");
}

#[test]
fn test_wrong_row_offset_warns_and_defaults() {
    let policy = GrammarPolicy {
        ability_row_offset: 1,
        ..GrammarPolicy::default()
    };
    let mut diagnostics = Diagnostics::new();
    let beasts = assemble_beasts_with(BESTIARY, &policy, &mut diagnostics);

    // Offset 1 lands on the `|:---:|` rule row, whose cells are unreadable.
    let goblin = find(&beasts, "Goblin");
    assert_eq!(goblin.abilities.strength, AbilityScore::default());
    assert!(diagnostics
        .warnings()
        .iter()
        .any(|w| matches!(w, ParseWarning::AbilityCell { .. })));
}

#[test]
fn test_unset_sentinel_keeps_lore_in_mechanical_text() {
    let policy = GrammarPolicy {
        lore_sentinel: String::new(),
        ..GrammarPolicy::default()
    };
    let beasts = assemble_beasts_with(BESTIARY, &policy, &mut Diagnostics::new());
    let goblin = find(&beasts, "Goblin");

    assert!(goblin.lore.is_none());
    assert!(goblin.environment.is_some());
}

#[test]
fn test_generated_statblocks() {
    let document = [statblock("Ox", "1/2 (100 XP)"), statblock("Lion", "1 (200 XP)")].concat();
    let beasts = assemble_beasts(&document);

    assert_eq!(beasts.len(), 2);
    assert_eq!(beasts[0].challenge_rating, "1/2");
    assert_eq!(beasts[1].experience_points, Some(200));
    assert_eq!(beasts[1].actions[0].name, "Slam");
}

#[test]
fn test_one_good_block_one_malformed() {
    let document = format!(
        "{}___\n> ## Lore Box\n>*Sidebar*\n> The hills are old.\n",
        statblock("Boar", "1/4 (50 XP)")
    );
    let mut diagnostics = Diagnostics::new();
    let beasts = assemble_beasts_with(&document, &GrammarPolicy::default(), &mut diagnostics);

    assert_eq!(beasts.len(), 1);
    assert_eq!(beasts[0].name, "Boar");
    assert_eq!(diagnostics.skipped_segments(), 1);
}
