//! Labeled Field Extraction
//!
//! Reads single-line statblock fields such as `> - **Armor Class** 15` or
//! `**Senses:** darkvision 60 ft.`. Matching is anchored on the bold label
//! and never continues past the end of the line.

use super::grammar::strip_field_prefix;

/// Return the value of the first line carrying `**label**`, or `None`.
///
/// Accepts `**Label** value`, `**Label:** value` and `**Label**: value`.
/// The label comparison is ASCII case-insensitive.
pub fn extract_field(body: &str, label: &str) -> Option<String> {
    body.lines().find_map(|line| match_field_line(line, label))
}

/// Match one line against a label, returning the trimmed value.
pub fn match_field_line(line: &str, label: &str) -> Option<String> {
    let rest = strip_field_prefix(line).strip_prefix("**")?;
    let candidate = rest.get(..label.len())?;
    if !candidate.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = &rest[label.len()..];

    let value = if let Some(v) = rest.strip_prefix(":**") {
        v
    } else if let Some(v) = rest.strip_prefix("**:") {
        v
    } else if let Some(v) = rest.strip_prefix("**") {
        v
    } else {
        // A longer label sharing this prefix, e.g. "Damage Immunities" vs "Damage"
        return None;
    };

    Some(value.trim().to_string())
}

/// Leading challenge token, without any "(… XP)" annotation.
///
/// `"10 (5,900 XP)"` becomes `"10"`; `"1/4 (50 XP)"` becomes `"1/4"`.
pub fn challenge_rating(raw: &str) -> String {
    raw.split('(')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Experience points from the challenge annotation, commas removed.
pub fn experience_points(raw: &str) -> Option<u32> {
    let (_, annotation) = raw.split_once('(')?;
    let annotation = annotation.split(')').next()?;
    let digits: String = annotation
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}
