// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Planner activity catalog: categories and the per-category activity lists.

use serde::{Deserialize, Serialize};

/// The four planner value buckets.
///
/// Serialized as the full display strings so stored planner documents keep
/// the shape the frontend expects as JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "HIGH LIFE TIME (HLV)")]
    HighLifeTime,
    #[serde(rename = "HIGH DOLLAR (HDV)")]
    HighDollar,
    #[serde(rename = "LOW DOLLAR (LDV)")]
    LowDollar,
    #[serde(rename = "ZERO VALUE (ZV)")]
    ZeroValue,
}

impl Category {
    /// All categories in decreasing order of desirability.
    pub const ALL: [Category; 4] = [
        Category::HighLifeTime,
        Category::HighDollar,
        Category::LowDollar,
        Category::ZeroValue,
    ];

    /// Full display label (also the serialized form).
    pub fn label(&self) -> &'static str {
        match self {
            Category::HighLifeTime => "HIGH LIFE TIME (HLV)",
            Category::HighDollar => "HIGH DOLLAR (HDV)",
            Category::LowDollar => "LOW DOLLAR (LDV)",
            Category::ZeroValue => "ZERO VALUE (ZV)",
        }
    }

    /// Short code used in chart legends.
    pub fn code(&self) -> &'static str {
        match self {
            Category::HighLifeTime => "HLV",
            Category::HighDollar => "HDV",
            Category::LowDollar => "LDV",
            Category::ZeroValue => "ZV",
        }
    }

    /// Display color for schedule cells and chart slices.
    pub fn color(&self) -> &'static str {
        match self {
            Category::HighLifeTime => "#16a34a",
            Category::HighDollar => "#2563eb",
            Category::LowDollar => "#38bdf8",
            Category::ZeroValue => "#f97316",
        }
    }

    /// Productivity weight (4 = most desirable, 1 = least).
    pub fn weight(&self) -> u32 {
        match self {
            Category::HighLifeTime => 4,
            Category::HighDollar => 3,
            Category::LowDollar => 2,
            Category::ZeroValue => 1,
        }
    }
}

/// A named activity within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
}

/// The activity catalog: one list per category.
///
/// Persisted inside the planner document with the category display strings
/// as field names, matching the stored shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedActivities {
    #[serde(rename = "HIGH LIFE TIME (HLV)", default)]
    pub high_life_time: Vec<Activity>,
    #[serde(rename = "HIGH DOLLAR (HDV)", default)]
    pub high_dollar: Vec<Activity>,
    #[serde(rename = "LOW DOLLAR (LDV)", default)]
    pub low_dollar: Vec<Activity>,
    #[serde(rename = "ZERO VALUE (ZV)", default)]
    pub zero_value: Vec<Activity>,
}

impl GroupedActivities {
    /// Activities in one category.
    pub fn get(&self, category: Category) -> &[Activity] {
        match category {
            Category::HighLifeTime => &self.high_life_time,
            Category::HighDollar => &self.high_dollar,
            Category::LowDollar => &self.low_dollar,
            Category::ZeroValue => &self.zero_value,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<Activity> {
        match category {
            Category::HighLifeTime => &mut self.high_life_time,
            Category::HighDollar => &mut self.high_dollar,
            Category::LowDollar => &mut self.low_dollar,
            Category::ZeroValue => &mut self.zero_value,
        }
    }

    /// Whether an activity with this name exists in the category.
    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.get(category).iter().any(|a| a.name == name)
    }

    /// Add a named activity to a category.
    ///
    /// Names are trimmed; empty names and duplicates within the category are
    /// rejected.
    pub fn add(&mut self, category: Category, name: &str) -> Result<(), CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.contains(category, name) {
            return Err(CatalogError::Duplicate(name.to_string()));
        }
        self.get_mut(category).push(Activity {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Remove an activity by name from a category.
    pub fn remove(&mut self, category: Category, name: &str) -> Result<(), CatalogError> {
        let list = self.get_mut(category);
        let before = list.len();
        list.retain(|a| a.name != name);
        if list.len() == before {
            return Err(CatalogError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Total number of activities across all categories.
    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }
}

/// Errors from catalog mutation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Activity name must not be empty")]
    EmptyName,

    #[error("Activity already exists: {0}")]
    Duplicate(String),

    #[error("Activity not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_display_string() {
        let json = serde_json::to_string(&Category::HighLifeTime).unwrap();
        assert_eq!(json, "\"HIGH LIFE TIME (HLV)\"");

        let parsed: Category = serde_json::from_str("\"ZERO VALUE (ZV)\"").unwrap();
        assert_eq!(parsed, Category::ZeroValue);
    }

    #[test]
    fn test_weights_decrease_with_desirability() {
        let weights: Vec<u32> = Category::ALL.iter().map(|c| c.weight()).collect();
        assert_eq!(weights, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let mut catalog = GroupedActivities::default();
        catalog.add(Category::HighLifeTime, "  Gym  ").unwrap();
        assert!(catalog.contains(Category::HighLifeTime, "Gym"));

        assert!(matches!(
            catalog.add(Category::HighDollar, "   "),
            Err(CatalogError::EmptyName)
        ));
    }

    #[test]
    fn test_add_rejects_duplicate_within_category() {
        let mut catalog = GroupedActivities::default();
        catalog.add(Category::HighLifeTime, "Gym").unwrap();
        assert!(matches!(
            catalog.add(Category::HighLifeTime, "Gym"),
            Err(CatalogError::Duplicate(_))
        ));
        // Same name in a different category is fine
        catalog.add(Category::ZeroValue, "Gym").unwrap();
    }

    #[test]
    fn test_remove_and_total() {
        let mut catalog = GroupedActivities::default();
        catalog.add(Category::HighLifeTime, "Gym").unwrap();
        catalog.add(Category::HighDollar, "Consulting").unwrap();
        assert_eq!(catalog.total(), 2);

        catalog.remove(Category::HighLifeTime, "Gym").unwrap();
        assert_eq!(catalog.total(), 1);
        assert!(matches!(
            catalog.remove(Category::HighLifeTime, "Gym"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_grouped_round_trip_uses_display_keys() {
        let mut catalog = GroupedActivities::default();
        catalog.add(Category::LowDollar, "Email").unwrap();

        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.get("LOW DOLLAR (LDV)").is_some());

        let back: GroupedActivities = serde_json::from_value(json).unwrap();
        assert_eq!(back, catalog);
    }
}
