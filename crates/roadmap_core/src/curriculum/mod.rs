//! Curriculum traversal, search, and load path.

pub mod day_index;
pub mod provider;
pub mod search;
