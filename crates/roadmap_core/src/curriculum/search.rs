//! Course search across the whole hierarchy.

use crate::curriculum::day_index::flatten;
use crate::model::curriculum::Curriculum;
use crate::model::position::Position;

const MIN_QUERY_CHARS: usize = 2;
const MAX_RESULTS: usize = 5;

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub month: String,
    /// 1-based day number.
    pub day: usize,
    pub title: String,
    pub topic: String,
}

impl SearchHit {
    /// Position to navigate to when the hit is chosen.
    pub fn position(&self) -> Position {
        Position::new(self.month.clone(), self.day.saturating_sub(1))
    }
}

/// Case-insensitive substring search over title, topic and description.
///
/// Queries shorter than two characters return nothing; at most five hits
/// are returned, in hierarchy order.
pub fn search_days(curriculum: &Curriculum, query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    curriculum
        .months
        .iter()
        .flat_map(|(name, month)| {
            flatten(month)
                .into_iter()
                .enumerate()
                .map(move |(offset, day)| (name, offset, day))
        })
        .filter(|(_, _, day)| {
            day.title.to_lowercase().contains(&needle)
                || day.topic.to_lowercase().contains(&needle)
                || day.description.to_lowercase().contains(&needle)
        })
        .take(MAX_RESULTS)
        .map(|(name, offset, day)| SearchHit {
            month: name.clone(),
            day: offset + 1,
            title: day.title.clone(),
            topic: day.topic.clone(),
        })
        .collect()
}
