//! Habit tracker model.

use serde::{Deserialize, Serialize};

/// A tracked habit, stored per-user and keyed by `id`.
///
/// The id is derived from the name at creation time (URL-encoded so it is
/// safe as a Firestore document id) and never changes afterwards, so habits
/// can be renamed without being re-keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    /// Free-form grouping label shown in the tracker UI
    pub category: String,
    pub completed: bool,
}

impl Habit {
    /// Derive a document id from a habit name.
    pub fn id_for(name: &str) -> String {
        urlencoding::encode(name.trim()).into_owned()
    }

    pub fn new(name: &str, category: &str) -> Self {
        let name = name.trim();
        Self {
            id: Self::id_for(name),
            name: name.to_string(),
            category: category.trim().to_string(),
            completed: false,
        }
    }
}
