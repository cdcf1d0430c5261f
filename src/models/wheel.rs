// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Wheel of Life self-assessment entries.
//!
//! An entry is stored flattened: `firstName`, `date`, then one field per life
//! category holding `{ Score, Goal }`. The `date` field repeats the document
//! key (`"DD-Mon-YY"`).

use crate::time_utils::parse_wheel_date;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The ten life categories, in wheel display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LifeCategory {
    Body,
    Mind,
    Soul,
    Career,
    #[serde(rename = "Self Improvement")]
    SelfImprovement,
    Relationships,
    Romance,
    Money,
    Leisure,
    Environment,
}

impl LifeCategory {
    pub const ALL: [LifeCategory; 10] = [
        LifeCategory::Body,
        LifeCategory::Mind,
        LifeCategory::Soul,
        LifeCategory::Career,
        LifeCategory::SelfImprovement,
        LifeCategory::Relationships,
        LifeCategory::Romance,
        LifeCategory::Money,
        LifeCategory::Leisure,
        LifeCategory::Environment,
    ];

    /// Display label (also the serialized field name).
    pub fn label(&self) -> &'static str {
        match self {
            LifeCategory::Body => "Body",
            LifeCategory::Mind => "Mind",
            LifeCategory::Soul => "Soul",
            LifeCategory::Career => "Career",
            LifeCategory::SelfImprovement => "Self Improvement",
            LifeCategory::Relationships => "Relationships",
            LifeCategory::Romance => "Romance",
            LifeCategory::Money => "Money",
            LifeCategory::Leisure => "Leisure",
            LifeCategory::Environment => "Environment",
        }
    }
}

/// Score and goal for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    #[serde(rename = "Score")]
    pub score: f64,
    #[serde(rename = "Goal", default)]
    pub goal: String,
}

/// One stored wheel entry, keyed by its `"DD-Mon-YY"` date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelEntry {
    #[serde(rename = "firstName")]
    pub first_name: String,
    /// Repeats the document key
    pub date: String,
    /// One flattened field per category
    #[serde(flatten)]
    pub categories: BTreeMap<LifeCategory, CategoryScores>,
}

impl WheelEntry {
    pub fn get(&self, category: LifeCategory) -> Option<&CategoryScores> {
        self.categories.get(&category)
    }

    /// Clamp every score into the 0–10 range. Out-of-range input is clamped
    /// rather than rejected, matching the score form's on-blur behavior.
    pub fn clamp_scores(&mut self) {
        for scores in self.categories.values_mut() {
            scores.score = scores.score.clamp(0.0, 10.0);
        }
    }

    /// Sum of all category scores.
    pub fn total_score(&self) -> f64 {
        self.categories.values().map(|s| s.score).sum()
    }
}

/// One point on the progress chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: String,
    pub total_score: f64,
}

/// Reduce wheel entries to progress points, sorted chronologically.
///
/// The backing query orders by the `date` string (not chronological), so the
/// re-sort here is what puts the chart in time order.
pub fn progress_points(entries: Vec<WheelEntry>) -> Vec<ProgressPoint> {
    let mut points: Vec<ProgressPoint> = entries
        .into_iter()
        .map(|entry| ProgressPoint {
            total_score: entry.total_score(),
            date: entry.date,
        })
        .collect();
    points.sort_by_key(|p| parse_wheel_date(&p.date));
    points
}
