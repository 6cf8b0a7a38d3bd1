//! Beast Assembly
//!
//! Turns one statblock segment into a [`BeastRecord`]. Every field other
//! than the name is optional in the source; missing values fall back to
//! empty strings, `None`, or default ability scores rather than failing
//! the record.
//!
//! # Example
//!
//! ```ignore
//! use crate::ingestion::ttrpg::beast_assembler::assemble_beasts;
//!
//! let beasts = assemble_beasts(document);
//! for beast in &beasts {
//!     println!("{} (CR {})", beast.name, beast.challenge_rating);
//! }
//! ```

use super::ability_table::extract_abilities_with;
use super::diagnostics::{Diagnostics, ParseWarning};
use super::field_extractor::{challenge_rating, experience_points, extract_field};
use super::grammar::{
    collapse_paragraphs, is_rule_line, normalize_line_endings, strip_quote, unquote, Cursor,
    GrammarPolicy, ACTIONS_HEADER, BOLD_ENTRY, ENVIRONMENT_FIELD, ENVIRONMENT_HEADER,
    LEGENDARY_HEADER, REACTIONS_HEADER,
};
use super::records::{new_record_id, AbilityBlock, BeastRecord, NamedEntry};
use super::segmenter::segment_beasts_with;

// ============================================================================
// Sections
// ============================================================================

/// Statblock sections that end the traits list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Actions,
    Reactions,
    LegendaryActions,
    Environment,
}

/// Header spans of every section, ordered by position.
fn section_headers(text: &str) -> Vec<(Section, usize, usize)> {
    let patterns = [
        (Section::Actions, &*ACTIONS_HEADER),
        (Section::Reactions, &*REACTIONS_HEADER),
        (Section::LegendaryActions, &*LEGENDARY_HEADER),
        (Section::Environment, &*ENVIRONMENT_HEADER),
    ];

    let mut headers: Vec<(Section, usize, usize)> = patterns
        .iter()
        .flat_map(|(section, pattern)| {
            pattern
                .find_iter(text)
                .map(move |m| (*section, m.start(), m.end()))
        })
        .collect();
    headers.sort_by_key(|(_, start, _)| *start);
    headers
}

/// The statblock split into its traits region and per-section regions.
#[derive(Debug, Default)]
struct Regions<'a> {
    traits: &'a str,
    actions: &'a str,
    reactions: &'a str,
    legendary_actions: &'a str,
}

fn split_regions(mechanical: &str) -> Regions<'_> {
    let headers = section_headers(mechanical);
    let cursor = Cursor::new(mechanical);
    let end = cursor.at(usize::MAX);

    let mut regions = Regions {
        traits: match headers.first() {
            Some((_, start, _)) => cursor.slice_to(cursor.at(*start)),
            None => mechanical,
        },
        ..Regions::default()
    };

    for (idx, (section, _, header_end)) in headers.iter().enumerate() {
        let region_start = cursor.at(*header_end);
        let region_end = headers
            .get(idx + 1)
            .map(|(_, next_start, _)| cursor.at(*next_start))
            .unwrap_or(end);
        let region = region_start.slice_to(region_end);

        // First occurrence wins; repeated headers are authoring noise.
        let slot = match section {
            Section::Actions => &mut regions.actions,
            Section::Reactions => &mut regions.reactions,
            Section::LegendaryActions => &mut regions.legendary_actions,
            Section::Environment => continue,
        };
        if slot.is_empty() {
            *slot = region;
        }
    }

    regions
}

// ============================================================================
// Entry Lists
// ============================================================================

/// Drop rule lines and collapse wrapped lines of a description.
fn clean_description(text: &str) -> String {
    let kept: Vec<&str> = text.lines().filter(|line| !is_rule_line(line)).collect();
    collapse_paragraphs(&kept.join("\n"))
}

/// Split a region into bold `Name.` entries.
///
/// Each description runs until the next bold entry or the end of the region.
/// Text before the first entry is ignored.
pub fn extract_entries(region: &str) -> Vec<NamedEntry> {
    let mut entries = Vec::new();
    let mut cursor = Cursor::new(region);

    while let Some(caps) = BOLD_ENTRY.captures(cursor.rest()) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            break;
        };
        let name = name.as_str().trim().to_string();
        let desc_start = cursor.at(cursor.offset() + whole.end());
        let desc_end = match desc_start.find(&BOLD_ENTRY) {
            Some((start, _)) => desc_start.at(start),
            None => desc_start.at(usize::MAX),
        };

        entries.push(NamedEntry::new(
            name,
            clean_description(desc_start.slice_to(desc_end)),
        ));
        cursor = desc_end;
    }

    entries
}

/// Cut `text` at the lore sentinel, returning `(mechanical, residual)`.
///
/// Without a sentinel the text is returned unchanged with an empty residual.
pub fn truncate_at_sentinel<'a>(text: &'a str, sentinel: &str) -> (&'a str, &'a str) {
    if sentinel.is_empty() {
        return (text, "");
    }
    match text.find(sentinel) {
        Some(pos) => (&text[..pos], &text[pos + sentinel.len()..]),
        None => (text, ""),
    }
}

// ============================================================================
// Environment & Lore
// ============================================================================

/// Best-effort environment tag, plus the byte ranges it was read from.
fn find_environment(text: &str) -> Option<(String, Vec<(usize, usize)>)> {
    if let Some(caps) = ENVIRONMENT_FIELD.captures(text) {
        let whole = caps.get(0)?;
        let value = tidy_environment(caps.name("value")?.as_str());
        if !value.is_empty() {
            return Some((value, vec![(whole.start(), whole.end())]));
        }
    }

    let header = ENVIRONMENT_HEADER.find(text)?;
    let after = Cursor::new(text).at(header.end());
    let mut line_start = after.offset();
    for line in after.rest().split('\n') {
        let line_end = line_start + line.len();
        // The value never runs past the next heading or rule.
        if strip_quote(line).trim_start().starts_with('#') || is_rule_line(line) {
            break;
        }
        let value = tidy_environment(line);
        if !value.is_empty() {
            return Some((value, vec![(header.start(), header.end()), (line_start, line_end)]));
        }
        line_start = line_end + 1;
    }
    None
}

fn tidy_environment(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .trim_end_matches('.')
        .trim()
        .to_string()
}

/// Residual narrative with the environment lines removed.
fn lore_text(residual: &str, environment_spans: &[(usize, usize)]) -> Option<String> {
    let mut kept = String::with_capacity(residual.len());
    let mut last = 0;
    for (start, end) in environment_spans {
        if *start >= last {
            kept.push_str(&residual[last..*start]);
            last = *end;
        }
    }
    kept.push_str(&residual[last..]);

    let lore = kept
        .lines()
        .filter(|line| !is_rule_line(line))
        .collect::<Vec<_>>()
        .join("\n");
    let lore = lore.trim();
    if lore.is_empty() {
        None
    } else {
        Some(lore.to_string())
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Split "Large aberration, lawful evil" into (size, type, alignment).
pub fn split_subtitle(subtitle: &str, default_alignment: &str) -> (String, String, String) {
    let (size_type, alignment) = match subtitle.split_once(',') {
        Some((size_type, alignment)) => (size_type.trim(), alignment.trim()),
        None => (subtitle.trim(), ""),
    };
    let alignment = if alignment.is_empty() {
        default_alignment
    } else {
        alignment
    };
    let (size, creature_type) = match size_type.split_once(char::is_whitespace) {
        Some((size, creature_type)) => (size, creature_type.trim()),
        None => (size_type, ""),
    };
    (
        size.to_string(),
        creature_type.to_string(),
        alignment.to_string(),
    )
}

/// Assemble one beast with the default grammar policy.
pub fn assemble_beast(title: &str, subtitle: &str, body: &str) -> BeastRecord {
    assemble_beast_with(
        title,
        subtitle,
        body,
        &GrammarPolicy::default(),
        &mut Diagnostics::new(),
    )
}

/// Assemble one beast, recording recoverable problems in `diagnostics`.
pub fn assemble_beast_with(
    title: &str,
    subtitle: &str,
    body: &str,
    policy: &GrammarPolicy,
    diagnostics: &mut Diagnostics,
) -> BeastRecord {
    let name = title.trim().to_string();
    let (size, creature_type, alignment) = split_subtitle(subtitle, &policy.default_alignment);

    let text = unquote(&normalize_line_endings(body));
    let (mechanical, residual) = truncate_at_sentinel(&text, &policy.lore_sentinel);

    let field = |label: &str| extract_field(mechanical, label);
    let challenge_raw = field("Challenge").unwrap_or_default();

    let abilities = extract_abilities_with(mechanical, policy, diagnostics).unwrap_or_else(|| {
        diagnostics.warn(ParseWarning::MissingAbilityTable {
            entity: name.clone(),
        });
        AbilityBlock::default()
    });

    let regions = split_regions(mechanical);

    let (environment, lore) = match find_environment(residual) {
        Some((environment, spans)) => (Some(environment), lore_text(residual, &spans)),
        None => (
            find_environment(mechanical).map(|(environment, _)| environment),
            lore_text(residual, &[]),
        ),
    };

    log::debug!("Assembled beast '{}' (CR {})", name, challenge_rating(&challenge_raw));

    BeastRecord {
        id: new_record_id(),
        name,
        size,
        creature_type,
        alignment,
        armor_class: field("Armor Class").unwrap_or_default(),
        hit_points: field("Hit Points").unwrap_or_default(),
        speed: field("Speed").unwrap_or_default(),
        abilities,
        saving_throws: field("Saving Throws"),
        skills: field("Skills"),
        damage_vulnerabilities: field("Damage Vulnerabilities"),
        damage_resistances: field("Damage Resistances"),
        damage_immunities: field("Damage Immunities"),
        condition_immunities: field("Condition Immunities"),
        senses: field("Senses"),
        languages: field("Languages"),
        challenge_rating: challenge_rating(&challenge_raw),
        experience_points: experience_points(&challenge_raw),
        proficiency_bonus: field("Proficiency Bonus"),
        traits: extract_entries(regions.traits),
        actions: extract_entries(regions.actions),
        reactions: extract_entries(regions.reactions),
        legendary_actions: extract_entries(regions.legendary_actions),
        environment,
        lore,
    }
}

/// Segment `text` and assemble every viable statblock.
pub fn assemble_beasts(text: &str) -> Vec<BeastRecord> {
    assemble_beasts_with(text, &GrammarPolicy::default(), &mut Diagnostics::new())
}

/// Segment and assemble, recording skipped segments and warnings.
pub fn assemble_beasts_with(
    text: &str,
    policy: &GrammarPolicy,
    diagnostics: &mut Diagnostics,
) -> Vec<BeastRecord> {
    let text = normalize_line_endings(text);
    let segments = segment_beasts_with(&text, policy, diagnostics);
    segments
        .into_iter()
        .map(|segment| {
            assemble_beast_with(
                segment.title,
                segment.subtitle,
                segment.body,
                policy,
                diagnostics,
            )
        })
        .collect()
}
