// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weekly planner schedule grid.
//!
//! The grid is derived, never stored: [`GridConfig`] generates the ordered
//! `"HH:MM"` slot sequence and day sequence on demand. Only assignments are
//! persisted, as a sparse slot → day → cell mapping ([`ScheduleData`]).

use crate::models::activity::{Category, GroupedActivities};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Size of one schedule block. Closed set; serialized as the minute count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BlockSize {
    Quarter,
    Half,
    Hour,
}

impl BlockSize {
    pub fn minutes(&self) -> u16 {
        match self {
            BlockSize::Quarter => 15,
            BlockSize::Half => 30,
            BlockSize::Hour => 60,
        }
    }
}

impl TryFrom<u16> for BlockSize {
    type Error = String;

    fn try_from(minutes: u16) -> Result<Self, Self::Error> {
        match minutes {
            15 => Ok(BlockSize::Quarter),
            30 => Ok(BlockSize::Half),
            60 => Ok(BlockSize::Hour),
            other => Err(format!("Invalid block size: {} (expected 15, 30 or 60)", other)),
        }
    }
}

impl From<BlockSize> for u16 {
    fn from(block: BlockSize) -> u16 {
        block.minutes()
    }
}

/// Days of the planner week, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub const WEEKEND: [Day; 2] = [Day::Saturday, Day::Sunday];
}

/// Grid configuration: the inputs to the time-grid generator.
///
/// Not persisted with the planner; the frontend owns these controls and the
/// session keeps the current values in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GridConfig {
    /// First hour of the day shown on the grid (inclusive)
    #[validate(range(max = 23))]
    pub start_hour: u8,
    /// Last hour of the day shown on the grid (exclusive)
    #[validate(range(max = 23))]
    pub end_hour: u8,
    /// Block size for one grid row
    pub block: BlockSize,
    /// Whether Saturday and Sunday are part of the grid
    pub include_weekends: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 22,
            block: BlockSize::Hour,
            include_weekends: false,
        }
    }
}

impl GridConfig {
    /// Generate the ordered `"HH:MM"` slot sequence.
    ///
    /// `end_hour <= start_hour` yields an empty sequence rather than an
    /// error; the grid then renders with no rows.
    pub fn time_slots(&self) -> Vec<String> {
        let mut slots = Vec::new();
        for hour in self.start_hour..self.end_hour {
            let mut minute = 0u16;
            while minute < 60 {
                slots.push(format!("{:02}:{:02}", hour, minute));
                minute += self.block.minutes();
            }
        }
        slots
    }

    /// Generate the ordered day sequence.
    pub fn days(&self) -> Vec<Day> {
        let mut days = Day::WEEKDAYS.to_vec();
        if self.include_weekends {
            days.extend(Day::WEEKEND);
        }
        days
    }

    /// Number of grid rows a duration covers. Integer division: fractional
    /// spans truncate, so a 90-minute assignment on hour blocks fills one row.
    pub fn span_for(&self, duration_minutes: u32) -> usize {
        (duration_minutes / u32::from(self.block.minutes())) as usize
    }
}

/// One assigned cell: an activity name and its category (which selects the
/// display color).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCell {
    pub activity: String,
    pub category: Category,
}

/// The full assignment grid: slot → day → cell.
///
/// Sparse: only slots with at least one assignment appear, and an absent day
/// entry means unassigned. BTreeMaps keep serialization order stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleData(pub BTreeMap<String, BTreeMap<Day, ScheduleCell>>);

impl ScheduleData {
    /// The assignment at a cell, if any.
    pub fn get(&self, time: &str, day: Day) -> Option<&ScheduleCell> {
        self.0.get(time).and_then(|row| row.get(&day))
    }

    /// Assign `cell` to `span` consecutive slots starting at `start`,
    /// clipped to the end of the slot sequence. Existing assignments in the
    /// range are overwritten (last write wins). Returns the number of cells
    /// written.
    pub fn set_block(
        &mut self,
        slots: &[String],
        day: Day,
        start: usize,
        span: usize,
        cell: ScheduleCell,
    ) -> usize {
        let end = start.saturating_add(span).min(slots.len());
        for slot in &slots[start.min(slots.len())..end] {
            self.0.entry(slot.clone()).or_default().insert(day, cell.clone());
        }
        end.saturating_sub(start.min(slots.len()))
    }

    /// Number of assigned cells.
    pub fn assigned(&self) -> usize {
        self.0.values().map(|row| row.len()).sum()
    }

    /// Recompute per-category counts over every assigned cell.
    pub fn productivity_counts(&self) -> ProductivityCounts {
        let mut counts = ProductivityCounts::default();
        for row in self.0.values() {
            for cell in row.values() {
                counts.add(cell.category);
            }
        }
        counts
    }
}

/// The persisted planner document: catalog snapshot, schedule, and the title
/// used as document key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerData {
    pub activities: GroupedActivities,
    #[serde(rename = "weeklySchedule")]
    pub weekly_schedule: ScheduleData,
    pub title: String,
}

impl PlannerData {
    pub fn new(title: &str) -> Self {
        Self {
            activities: GroupedActivities::default(),
            weekly_schedule: ScheduleData::default(),
            title: title.to_string(),
        }
    }
}

/// Assigned-cell counts per category. Derived, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivityCounts {
    #[serde(rename = "HLV")]
    pub hlv: u32,
    #[serde(rename = "HDV")]
    pub hdv: u32,
    #[serde(rename = "LDV")]
    pub ldv: u32,
    #[serde(rename = "ZV")]
    pub zv: u32,
}

impl ProductivityCounts {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::HighLifeTime => self.hlv,
            Category::HighDollar => self.hdv,
            Category::LowDollar => self.ldv,
            Category::ZeroValue => self.zv,
        }
    }

    pub fn add(&mut self, category: Category) {
        match category {
            Category::HighLifeTime => self.hlv += 1,
            Category::HighDollar => self.hdv += 1,
            Category::LowDollar => self.ldv += 1,
            Category::ZeroValue => self.zv += 1,
        }
    }

    /// Total assigned cells across all categories.
    pub fn total(&self) -> u32 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Weighted productivity score out of 4, or `None` when nothing is
    /// assigned yet (no division by zero).
    pub fn score(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: u32 = Category::ALL
            .iter()
            .map(|c| self.get(*c) * c.weight())
            .sum();
        Some(f64::from(weighted) / f64::from(total))
    }

    /// The category with the most assigned cells; ties go to the later
    /// (less desirable) category.
    pub fn most_frequent(&self) -> Category {
        let mut best = Category::HighLifeTime;
        for category in Category::ALL {
            if self.get(category) >= self.get(best) {
                best = category;
            }
        }
        best
    }
}
