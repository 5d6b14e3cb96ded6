//! Curriculum hierarchy model.
//!
//! # Responsibility
//! - Mirror the wire shape supplied by the curriculum provider.
//! - Offer ordered month navigation helpers.
//!
//! # Invariants
//! - `months` and `weeks` keep the order in which the provider listed them.
//! - A week with a missing or `null` `days` field has no days.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Full month → week → day hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Months keyed by display name, in hierarchy order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub months: IndexMap<String, Month>,
}

/// One month of the curriculum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    #[serde(default, deserialize_with = "null_as_default")]
    pub theme: String,
    /// Weeks keyed by week label, in hierarchy order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub weeks: IndexMap<String, Week>,
}

/// One week of a month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    #[serde(default, deserialize_with = "null_as_default")]
    pub focus: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: Vec<Day>,
}

/// One study day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Key into the quote and tip tables.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl Day {
    pub fn new(
        title: impl Into<String>,
        topic: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            topic: topic.into(),
            description: description.into(),
        }
    }

    /// Day shown when the active position has no day.
    pub fn placeholder() -> Self {
        Self::new("No Title", "No Topic", "No description")
    }
}

impl Curriculum {
    /// Parses the provider wire format.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Serializes to the provider wire format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn month(&self, name: &str) -> Option<&Month> {
        self.months.get(name)
    }

    /// Month names in hierarchy order.
    pub fn month_names(&self) -> impl Iterator<Item = &str> {
        self.months.keys().map(String::as_str)
    }

    /// Position of `name` in hierarchy order.
    pub fn month_index(&self, name: &str) -> Option<usize> {
        self.months.get_index_of(name)
    }

    /// Month at hierarchy position `index`.
    pub fn month_at(&self, index: usize) -> Option<(&str, &Month)> {
        self.months
            .get_index(index)
            .map(|(name, month)| (name.as_str(), month))
    }

    pub fn first_month(&self) -> Option<&str> {
        self.month_at(0).map(|(name, _)| name)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
