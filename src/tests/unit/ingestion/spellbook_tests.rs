//! Spellbook Unit Tests
//!
//! Tests for spell card assembly: level labels, casting properties,
//! the description/upcast split and class lists.

use crate::ingestion::ttrpg::spell_assembler::assemble_spells_with;
use crate::ingestion::ttrpg::{assemble_spells, segment_spells, Diagnostics, ParseWarning, SpellRecord};
use crate::tests::common::*;

fn spellbook() -> Vec<SpellRecord> {
    assemble_spells(SPELLBOOK)
}

fn find<'a>(spells: &'a [SpellRecord], name: &str) -> &'a SpellRecord {
    spells
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("no spell named {name}"))
}

#[test]
fn test_segments_in_document_order() {
    let names: Vec<&str> = segment_spells(SPELLBOOK).iter().map(|s| s.name).collect();
    assert_eq!(names, ["Fire Bolt", "Detect Magic", "Fireball"]);
}

#[test]
fn test_cantrip() {
    let spells = spellbook();
    let fire_bolt = find(&spells, "Fire Bolt");

    assert_eq!(fire_bolt.level, 0);
    assert!(fire_bolt.is_cantrip());
    assert_eq!(fire_bolt.school, "evocation");
    assert_eq!(fire_bolt.level_label, "Evocation cantrip");
    assert_eq!(fire_bolt.range, "120 feet");
    assert_eq!(fire_bolt.components, "V, S");
    assert!(!fire_bolt.ritual);
    assert!(!fire_bolt.concentration);
}

#[test]
fn test_multi_paragraph_description() {
    let spells = spellbook();
    let fire_bolt = find(&spells, "Fire Bolt");

    assert!(fire_bolt.description.starts_with("You hurl a mote of fire"));
    assert!(fire_bolt.description.contains("\n\nThis spell's damage increases"));
    assert!(!fire_bolt.description.contains("Classes"));
    assert!(fire_bolt.higher_levels.is_none());
}

#[test]
fn test_class_lists() {
    let spells = spellbook();

    assert_eq!(find(&spells, "Fire Bolt").classes, ["Sorcerer", "Wizard"]);
    let detect = find(&spells, "Detect Magic");
    assert_eq!(detect.classes.len(), 7);
    assert_eq!(detect.classes.first().map(String::as_str), Some("Bard"));
    assert_eq!(detect.classes.last().map(String::as_str), Some("Wizard"));
}

#[test]
fn test_ritual_and_concentration() {
    let spells = spellbook();
    let detect = find(&spells, "Detect Magic");

    assert_eq!(detect.level, 1);
    assert_eq!(detect.school, "divination");
    assert!(detect.ritual);
    assert!(detect.concentration);
    assert_eq!(detect.duration, "Concentration, up to 10 minutes");
}

#[test]
fn test_higher_levels_split() {
    let spells = spellbook();
    let fireball = find(&spells, "Fireball");

    assert_eq!(fireball.level, 3);
    assert_eq!(fireball.casting_time, "1 action");
    assert_eq!(
        fireball.components,
        "V, S, M (a tiny ball of bat guano and sulfur)"
    );
    assert!(fireball.description.ends_with("explosion of flame."));
    assert!(!fireball.description.contains("At Higher Levels"));
    assert_eq!(
        fireball.higher_levels.as_deref(),
        Some("When you cast this spell using a spell slot of 4th level or higher, the damage increases by 1d6 for each slot level above 3rd.")
    );
}

#[test]
fn test_spellbook_has_no_warnings() {
    let mut diagnostics = Diagnostics::new();
    let spells = assemble_spells_with(SPELLBOOK, &mut diagnostics);

    assert_eq!(spells.len(), 3);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.warnings());
}

#[test]
fn test_unreadable_level_warns() {
    let text = "#### Odd Spell\n_Mystery magic_\n___\n- **Range:** Self\n___\nSomething happens.\n";
    let mut diagnostics = Diagnostics::new();
    let spells = assemble_spells_with(text, &mut diagnostics);

    assert_eq!(spells[0].level, 0);
    assert!(matches!(
        diagnostics.warnings(),
        [ParseWarning::SpellLevel { spell, .. }] if spell == "Odd Spell"
    ));
}

#[test]
fn test_header_only_spell_is_skipped() {
    let text = "#### Placeholder\n\n#### Light\n_Evocation cantrip_\nYou touch one object.\n";
    let mut diagnostics = Diagnostics::new();
    let spells = assemble_spells_with(text, &mut diagnostics);

    assert_eq!(spells.len(), 1);
    assert_eq!(spells[0].name, "Light");
    assert_eq!(diagnostics.skipped_segments(), 1);
}

#[test]
fn test_classes_line_present_or_absent() {
    let text = "\
#### Goodberry
_1st-level transmutation_
___
- **Casting Time:** 1 action
___
Up to ten berries appear in your hand.

**Classes:** Druid, Ranger

#### Mending
_Transmutation cantrip_
___
- **Casting Time:** 1 minute
___
This spell repairs a single break or tear in an object you touch.
";
    let spells = assemble_spells(text);

    assert_eq!(spells[0].classes, ["Druid", "Ranger"]);
    assert!(spells[1].classes.is_empty());
    assert_eq!(spells[1].school, "transmutation");
}
