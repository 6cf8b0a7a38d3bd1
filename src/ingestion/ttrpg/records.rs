//! Canonical Records
//!
//! The caller-facing shapes produced by the assemblers. Records are built
//! once and handed to the caller; nothing in the extraction pipeline mutates
//! them afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a record identifier.
///
/// UUID v4 draws from the OS random source, so concurrent workers never
/// need to coordinate.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Abilities
// ============================================================================

/// Score used when an ability is missing or unreadable.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

/// Modifier text paired with [`DEFAULT_ABILITY_SCORE`].
pub const DEFAULT_ABILITY_MODIFIER: &str = "+0";

/// One ability entry: a base score and its signed modifier as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub score: i32,
    /// Always carries an explicit sign, e.g. "+2", "-1", "+0".
    pub modifier: String,
}

impl AbilityScore {
    pub fn new(score: i32, modifier: impl Into<String>) -> Self {
        Self {
            score,
            modifier: modifier.into(),
        }
    }

    /// Modifier as an integer, if the text is a well-formed signed number.
    pub fn modifier_value(&self) -> Option<i32> {
        self.modifier.trim_start_matches('+').parse().ok()
    }
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self::new(DEFAULT_ABILITY_SCORE, DEFAULT_ABILITY_MODIFIER)
    }
}

/// The six abilities, owned by value by each beast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBlock {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl AbilityBlock {
    /// Build a block from scores in table order (STR, DEX, CON, INT, WIS, CHA).
    pub fn from_ordered(scores: [AbilityScore; 6]) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores;
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Entries in table order, labelled with their abbreviation.
    pub fn entries(&self) -> [(&'static str, &AbilityScore); 6] {
        [
            ("STR", &self.strength),
            ("DEX", &self.dexterity),
            ("CON", &self.constitution),
            ("INT", &self.intelligence),
            ("WIS", &self.wisdom),
            ("CHA", &self.charisma),
        ]
    }
}

// ============================================================================
// Beasts
// ============================================================================

/// A named trait or action with its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
    pub description: String,
}

impl NamedEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A creature statblock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeastRecord {
    pub id: String,
    pub name: String,
    pub size: String,
    pub creature_type: String,
    pub alignment: String,
    pub armor_class: String,
    pub hit_points: String,
    pub speed: String,
    pub abilities: AbilityBlock,
    pub saving_throws: Option<String>,
    pub skills: Option<String>,
    pub damage_vulnerabilities: Option<String>,
    pub damage_resistances: Option<String>,
    pub damage_immunities: Option<String>,
    pub condition_immunities: Option<String>,
    pub senses: Option<String>,
    pub languages: Option<String>,
    /// Challenge rating as written: "1/8", "1/4", "1/2" or an integer.
    pub challenge_rating: String,
    pub experience_points: Option<u32>,
    pub proficiency_bonus: Option<String>,
    pub traits: Vec<NamedEntry>,
    pub actions: Vec<NamedEntry>,
    pub reactions: Vec<NamedEntry>,
    pub legendary_actions: Vec<NamedEntry>,
    pub environment: Option<String>,
    pub lore: Option<String>,
}

/// Convert a challenge rating string to a decimal.
///
/// Handles the fractional ratings ("1/8", "1/4", "1/2") and integers.
/// The assemblers keep the written form; this is for downstream callers.
pub fn challenge_to_decimal(rating: &str) -> Option<f32> {
    let rating = rating.trim();
    match rating.split_once('/') {
        Some((num, den)) => {
            let num: f32 = num.trim().parse().ok()?;
            let den: f32 = den.trim().parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => rating.parse().ok(),
    }
}

// ============================================================================
// Spells
// ============================================================================

/// A spell card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRecord {
    pub id: String,
    pub name: String,
    /// 0 for cantrips, otherwise 1 through 9.
    pub level: u8,
    /// Lower-cased school name.
    pub school: String,
    pub casting_time: String,
    pub range: String,
    pub components: String,
    pub duration: String,
    pub description: String,
    pub higher_levels: Option<String>,
    pub classes: Vec<String>,
    /// The level/school line as written, e.g. "3rd-level evocation".
    pub level_label: String,
    pub ritual: bool,
    pub concentration: bool,
}

impl SpellRecord {
    /// Whether this spell is a cantrip.
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }
}
