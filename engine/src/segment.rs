//! Attributes derived from a segment handle. Nothing here is cached; every call reads
//! the page again.

use crate::config::NavigatorConfig;
use crate::page::Page;

/// Start time of a segment in seconds.
///
/// Tries each configured start-time attribute on the segment itself, then the same
/// attributes on a descendant, then parses a timestamp label.
pub fn start_time_seconds<P: Page>(page: &P, segment: &P::Element, config: &NavigatorConfig) -> Option<f64> {
    let attributes = &config.start_time.attributes;

    let own = attributes.iter().find_map(|attribute| {
        let raw = page.attribute(segment, &attribute.name)?;
        parse_number(&raw).map(|value| attribute.unit.to_seconds(value))
    });
    if own.is_some() {
        return own;
    }

    let nested = attributes.iter().find_map(|attribute| {
        let child = page.query(Some(segment), &attribute.selector())?;
        let raw = page.attribute(&child, &attribute.name)?;
        parse_number(&raw).map(|value| attribute.unit.to_seconds(value))
    });
    if nested.is_some() {
        return nested;
    }

    config.start_time.label_selectors.iter().find_map(|selector| {
        let label = page.query(Some(segment), selector)?;
        parse_timestamp(&page.text(&label))
    })
}

/// Whether the segment or one of its descendants carries an active marker.
pub fn is_explicitly_active<P: Page>(page: &P, segment: &P::Element, config: &NavigatorConfig) -> bool {
    config
        .markers
        .selectors
        .iter()
        .any(|marker| page.matches(segment, marker) || page.query(Some(segment), marker).is_some())
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses the first `M:SS` or `H:MM:SS` token in `text` into seconds.
///
/// Groups are read most-significant first, so `1:02:03` is 3723 seconds. Anything with
/// fewer than two or more than three groups is rejected.
pub fn parse_timestamp(text: &str) -> Option<f64> {
    text.split_whitespace()
        .filter(|word| word.contains(':'))
        .find_map(parse_clock)
}

fn parse_clock(word: &str) -> Option<f64> {
    let token = word.trim_matches(|c: char| !c.is_ascii_digit());
    let groups: Vec<&str> = token.split(':').collect();
    if !(2..=3).contains(&groups.len()) {
        return None;
    }

    let mut total: u64 = 0;
    for group in groups {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u64 = group.parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total as f64)
}
