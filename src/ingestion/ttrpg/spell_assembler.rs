//! Spell Segmentation and Assembly
//!
//! Spell cards are delimited by level-4 headers:
//!
//! ```text
//! #### Acid Arrow
//! _2nd-level evocation_
//! ___
//! - **Casting Time:** 1 action
//! - **Range:** 90 feet
//! - **Components:** V, S, M (powdered rhubarb leaf)
//! - **Duration:** Instantaneous
//! ___
//! A shimmering green arrow streaks toward a target...
//!
//! ***At Higher Levels.*** When you cast this spell using a spell slot...
//!
//! **Classes:** Wizard
//! ```

use super::diagnostics::{Diagnostics, ParseWarning};
use super::grammar::{
    is_rule_line, normalize_line_endings, strip_emphasis, Cursor, CLASSES_LINE,
    HIGHER_LEVELS_MARKER, META_PROPERTY, SPELL_HEADER, SPELL_LEVEL,
};
use super::records::{new_record_id, SpellRecord};

// ============================================================================
// Segmentation
// ============================================================================

/// One `#### Name` spell segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellSegment<'a> {
    pub name: &'a str,
    /// Text after the header line up to the next header.
    pub body: &'a str,
}

/// Split `text` on level-4 headers, in document order.
pub fn segment_spells(text: &str) -> Vec<SpellSegment<'_>> {
    let headers: Vec<_> = SPELL_HEADER.captures_iter(text).collect();
    let cursor = Cursor::new(text);

    headers
        .iter()
        .enumerate()
        .filter_map(|(idx, caps)| {
            let whole = caps.get(0)?;
            let name = strip_emphasis(caps.name("name")?.as_str());
            let body_end = headers
                .get(idx + 1)
                .and_then(|next| next.get(0))
                .map(|m| cursor.at(m.start()))
                .unwrap_or_else(|| cursor.at(usize::MAX));
            Some(SpellSegment {
                name,
                body: cursor.at(whole.end()).slice_to(body_end),
            })
        })
        .collect()
}

// ============================================================================
// Label Rules
// ============================================================================

/// Numeric level from a label like "3rd-level evocation" or "Evocation cantrip".
pub fn spell_level(label: &str) -> Option<u8> {
    if label.to_lowercase().contains("cantrip") {
        return Some(0);
    }
    SPELL_LEVEL
        .captures(label)
        .and_then(|caps| caps.name("level")?.as_str().parse::<u8>().ok())
        .filter(|level| *level <= 9)
}

/// School from the level label, lower-cased.
///
/// Takes the word after "level" or "cantrip"; SRD cantrip labels put the
/// school first ("Evocation cantrip"), so the word before "cantrip" is the
/// fallback.
pub fn spell_school(label: &str) -> String {
    let lowered = label.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c == '-')
        .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|w| !w.is_empty())
        .collect();

    let anchor = words
        .iter()
        .position(|w| *w == "level" || *w == "cantrip");
    let school = match anchor {
        Some(idx) => match words.get(idx + 1) {
            Some(next) if *next != "ritual" => Some(*next),
            _ if words[idx] == "cantrip" && idx > 0 => Some(words[idx - 1]),
            _ => None,
        },
        None => None,
    };
    school.unwrap_or_default().to_string()
}

/// Meta keys are lower-cased with whitespace removed: "Casting Time" → "castingtime".
pub fn normalize_meta_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split a classes list on commas, dropping empty entries.
pub fn split_classes(list: &str) -> Vec<String> {
    list.split(',')
        .map(|class| strip_emphasis(class).trim_end_matches('.').trim().to_string())
        .filter(|class| !class.is_empty())
        .collect()
}

// ============================================================================
// Assembly
// ============================================================================

/// Casting properties read from the meta block.
#[derive(Debug, Default)]
struct MetaProperties {
    casting_time: String,
    range: String,
    components: String,
    duration: String,
}

impl MetaProperties {
    fn set(&mut self, spell: &str, key: &str, value: &str) {
        let slot = match normalize_meta_key(key).as_str() {
            "castingtime" => &mut self.casting_time,
            "range" => &mut self.range,
            "components" => &mut self.components,
            "duration" => &mut self.duration,
            other => {
                log::debug!("Ignoring meta property '{}' on spell '{}'", other, spell);
                return;
            }
        };
        *slot = value.trim().to_string();
    }
}

/// Drop rule lines and surrounding blank space from a prose block.
fn tidy_block(text: &str) -> String {
    text.lines()
        .filter(|line| !is_rule_line(line))
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Where the label, meta block and prose sit within a segment.
struct Layout<'a> {
    label: &'a str,
    meta: MetaProperties,
    prose: String,
}

fn read_layout<'a>(name: &str, body: &'a str) -> Layout<'a> {
    let lines: Vec<&'a str> = body.lines().collect();
    let mut idx = 0;

    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }

    let mut label = "";
    if let Some(&line) = lines.get(idx) {
        if !is_rule_line(line) && !META_PROPERTY.is_match(line) {
            label = strip_emphasis(line);
            idx += 1;
        }
    }

    // Opening rule, property lines, closing rule. Prose before a closing
    // rule also ends the block.
    let mut meta = MetaProperties::default();
    let mut opened = false;
    let mut has_properties = false;
    while let Some(line) = lines.get(idx) {
        if line.trim().is_empty() {
            idx += 1;
        } else if is_rule_line(line) {
            idx += 1;
            if opened || has_properties {
                break;
            }
            opened = true;
        } else if let Some(caps) = META_PROPERTY.captures(line) {
            let key = caps.name("key").map(|m| m.as_str()).unwrap_or_default();
            let value = caps.name("value").map(|m| m.as_str()).unwrap_or_default();
            meta.set(name, key, value);
            has_properties = true;
            idx += 1;
        } else {
            break;
        }
    }

    Layout {
        label,
        meta,
        prose: lines.get(idx..).unwrap_or_default().join("\n"),
    }
}

/// Assemble every spell in `text`, discarding warnings.
pub fn assemble_spells(text: &str) -> Vec<SpellRecord> {
    assemble_spells_with(text, &mut Diagnostics::new())
}

/// Assemble every spell, recording skipped segments and warnings.
pub fn assemble_spells_with(text: &str, diagnostics: &mut Diagnostics) -> Vec<SpellRecord> {
    let text = normalize_line_endings(text);
    segment_spells(&text)
        .into_iter()
        .filter_map(|segment| assemble_spell(segment, diagnostics))
        .collect()
}

/// Assemble one segment; `None` when it has no description.
pub fn assemble_spell(segment: SpellSegment<'_>, diagnostics: &mut Diagnostics) -> Option<SpellRecord> {
    let Layout { label, meta, prose } = read_layout(segment.name, segment.body);

    let cursor = Cursor::new(&prose);
    let end = cursor.at(usize::MAX);
    let classes_at = cursor.find(&CLASSES_LINE).map(|(start, _)| cursor.at(start));
    let higher_at = cursor.find(&HIGHER_LEVELS_MARKER);

    let description_end = match (higher_at, classes_at) {
        (Some((start, _)), Some(classes)) => cursor.at(start.min(classes.offset())),
        (Some((start, _)), None) => cursor.at(start),
        (None, Some(classes)) => classes,
        (None, None) => end,
    };
    let description = tidy_block(cursor.slice_to(description_end));
    if description.is_empty() {
        diagnostics.warn(ParseWarning::MalformedSegment {
            title: segment.name.to_string(),
            reason: "spell has no description".to_string(),
        });
        return None;
    }

    let higher_levels = higher_at
        .filter(|(start, _)| classes_at.map_or(true, |classes| *start < classes.offset()))
        .map(|(_, marker_end)| tidy_block(cursor.at(marker_end).slice_to(classes_at.unwrap_or(end))))
        .filter(|text| !text.is_empty());

    let classes = CLASSES_LINE
        .captures(&prose)
        .and_then(|caps| caps.name("list").map(|m| split_classes(m.as_str())))
        .unwrap_or_default();

    let level = spell_level(label).unwrap_or_else(|| {
        diagnostics.warn(ParseWarning::SpellLevel {
            spell: segment.name.to_string(),
            label: label.to_string(),
        });
        0
    });
    let lowered_label = label.to_lowercase();

    log::debug!("Assembled spell '{}' (level {})", segment.name, level);

    Some(SpellRecord {
        id: new_record_id(),
        name: segment.name.to_string(),
        level,
        school: spell_school(label),
        concentration: meta.duration.to_lowercase().starts_with("concentration"),
        casting_time: meta.casting_time,
        range: meta.range,
        components: meta.components,
        duration: meta.duration,
        description,
        higher_levels,
        classes,
        level_label: label.to_string(),
        ritual: lowered_label.contains("ritual"),
    })
}
