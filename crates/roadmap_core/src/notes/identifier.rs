//! Remote note identifiers and record bodies.
//!
//! Identifiers are `_`-separated: `<month>_<DD>_<timestamp>_<title...>`,
//! where `DD` is the zero-padded 1-based day number.

use crate::model::curriculum::Day;
use crate::model::position::Position;
use once_cell::sync::Lazy;
use regex::Regex;

static RECORD_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Date: .*\nMonth: .*\nDay: .*\nTitle: .*\n\n").expect("valid header regex")
});

/// Fields after the `<month>_` prefix.
///
/// Month names may themselves contain `_`, so the known month is stripped
/// first; identifiers without that prefix drop their first field instead.
fn after_month<'a>(identifier: &'a str, month: &str) -> Option<&'a str> {
    identifier
        .strip_prefix(month)
        .and_then(|rest| rest.strip_prefix('_'))
        .or_else(|| identifier.split_once('_').map(|(_, rest)| rest))
}

/// Day segment of an identifier listed under `month`.
pub fn day_segment<'a>(identifier: &'a str, month: &str) -> Option<&'a str> {
    after_month(identifier, month)?.split('_').next()
}

/// Timestamp segment; empty when absent so it sorts lowest.
pub fn timestamp_segment<'a>(identifier: &'a str, month: &str) -> &'a str {
    after_month(identifier, month)
        .and_then(|rest| rest.split('_').nth(1))
        .unwrap_or("")
}

/// Whether `identifier` encodes the day of `position`.
pub fn matches_day(identifier: &str, position: &Position) -> bool {
    day_segment(identifier, &position.month) == Some(position.padded_day().as_str())
}

/// Latest identifier for `position` by lexicographic timestamp.
///
/// Among equal timestamps the last one in listing order wins.
pub fn select_latest<'a>(identifiers: &'a [String], position: &Position) -> Option<&'a str> {
    identifiers
        .iter()
        .filter(|identifier| matches_day(identifier, position))
        .max_by(|left, right| {
            let month = position.month.as_str();
            timestamp_segment(left, month).cmp(timestamp_segment(right, month))
        })
        .map(String::as_str)
}

/// Record body without the stored `Date/Month/Day/Title` header block.
pub fn strip_record_header(content: &str) -> &str {
    match RECORD_HEADER_RE.find(content) {
        Some(found) => &content[found.end()..],
        None => content,
    }
}

/// Title sent with explicit saves: spaces become `_`, then `_` and the
/// first three topic characters upper-cased.
pub fn save_title(day: &Day) -> String {
    let abbrev: String = day.topic.chars().take(3).collect::<String>().to_uppercase();
    format!("{}_{}", day.title.replace(' ', "_"), abbrev)
}
