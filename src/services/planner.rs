// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Planner session: the cell-click → activity-select → duration-select flow.
//!
//! One session per signed-in user, held in memory on this instance. All
//! mutation is synchronous and happens on explicit user events; nothing is
//! persisted until the session is saved through the gateway.

use crate::error::AppError;
use crate::models::activity::{Category, CatalogError, GroupedActivities};
use crate::models::schedule::{
    Day, GridConfig, PlannerData, ProductivityCounts, ScheduleCell, ScheduleData,
};
use dashmap::DashMap;
use serde::Serialize;

/// Selection state of the assignment flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state")]
pub enum Selection {
    Idle,
    CellSelected {
        time: String,
        day: Day,
    },
    ActivitySelected {
        time: String,
        day: Day,
        activity: String,
        category: Category,
    },
}

/// Errors from session interaction.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("No such time slot on the current grid: {0}")]
    UnknownSlot(String),

    #[error("{0:?} is not part of the current grid")]
    DayNotOnGrid(Day),

    #[error("No cell is selected")]
    NoCellSelected,

    #[error("No activity is selected")]
    NoActivitySelected,

    #[error("No such activity in the catalog: {0}")]
    UnknownActivity(String),

    #[error("Duration must cover at least one block")]
    DurationTooShort,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// An in-memory planner editing session.
#[derive(Debug, Clone)]
pub struct PlannerSession {
    pub title: String,
    config: GridConfig,
    slots: Vec<String>,
    pub activities: GroupedActivities,
    pub schedule: ScheduleData,
    selection: Selection,
}

impl Default for PlannerSession {
    fn default() -> Self {
        let config = GridConfig::default();
        Self {
            title: String::new(),
            slots: config.time_slots(),
            config,
            activities: GroupedActivities::default(),
            schedule: ScheduleData::default(),
            selection: Selection::Idle,
        }
    }
}

impl PlannerSession {
    /// Start a session from a loaded planner document.
    pub fn from_planner(data: PlannerData) -> Self {
        Self {
            title: data.title,
            activities: data.activities,
            schedule: data.weekly_schedule,
            ..Self::default()
        }
    }

    /// Snapshot for persistence.
    pub fn to_planner(&self) -> PlannerData {
        PlannerData {
            activities: self.activities.clone(),
            weekly_schedule: self.schedule.clone(),
            title: self.title.clone(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn days(&self) -> Vec<Day> {
        self.config.days()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the grid configuration and regenerate the slot sequence.
    ///
    /// Existing assignments are kept even when their slot is no longer on the
    /// grid (switching back restores them). Any in-flight selection is
    /// dropped since its cell may no longer exist.
    pub fn set_config(&mut self, config: GridConfig) {
        self.config = config;
        self.slots = config.time_slots();
        self.selection = Selection::Idle;
    }

    /// Cell click: select a (time, day) cell and restart the flow.
    ///
    /// Clicking an already-assigned cell just reopens the flow; the next
    /// commit overwrites.
    pub fn click_cell(&mut self, time: &str, day: Day) -> Result<(), PlannerError> {
        if !self.slots.iter().any(|slot| slot == time) {
            return Err(PlannerError::UnknownSlot(time.to_string()));
        }
        if !self.days().contains(&day) {
            return Err(PlannerError::DayNotOnGrid(day));
        }
        self.selection = Selection::CellSelected {
            time: time.to_string(),
            day,
        };
        Ok(())
    }

    /// Activity select: requires a selected cell; re-selecting replaces the
    /// previous choice.
    pub fn select_activity(&mut self, category: Category, name: &str) -> Result<(), PlannerError> {
        let (time, day) = match &self.selection {
            Selection::CellSelected { time, day }
            | Selection::ActivitySelected { time, day, .. } => (time.clone(), *day),
            Selection::Idle => return Err(PlannerError::NoCellSelected),
        };
        if !self.activities.contains(category, name) {
            return Err(PlannerError::UnknownActivity(name.to_string()));
        }
        self.selection = Selection::ActivitySelected {
            time,
            day,
            activity: name.to_string(),
            category,
        };
        Ok(())
    }

    /// Duration select: commits the assignment and returns to idle.
    ///
    /// The assignment covers `duration_minutes / block` slots starting at the
    /// selected cell, clipped to the end of the day. Returns the number of
    /// cells written.
    pub fn select_duration(&mut self, duration_minutes: u32) -> Result<usize, PlannerError> {
        let (time, day, activity, category) = match &self.selection {
            Selection::ActivitySelected {
                time,
                day,
                activity,
                category,
            } => (time.clone(), *day, activity.clone(), *category),
            Selection::CellSelected { .. } => return Err(PlannerError::NoActivitySelected),
            Selection::Idle => return Err(PlannerError::NoCellSelected),
        };

        let span = self.config.span_for(duration_minutes);
        if span == 0 {
            return Err(PlannerError::DurationTooShort);
        }

        // The slot is validated at click time, but the grid may have been
        // reconfigured since; re-resolve defensively.
        let start = self
            .slots
            .iter()
            .position(|slot| *slot == time)
            .ok_or_else(|| PlannerError::UnknownSlot(time.clone()))?;

        let written = self.schedule.set_block(
            &self.slots,
            day,
            start,
            span,
            ScheduleCell { activity, category },
        );
        self.selection = Selection::Idle;
        Ok(written)
    }

    /// Cancel: return to idle without touching the schedule.
    pub fn cancel(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Recompute the summary block from the current schedule.
    pub fn summary(&self) -> PlannerSummary {
        let counts = self.schedule.productivity_counts();
        let total_hours =
            f64::from(counts.total()) * f64::from(self.config.block.minutes()) / 60.0;
        PlannerSummary {
            counts,
            total_hours,
            score: counts.score(),
            most_frequent: counts.most_frequent(),
            total_activities: self.activities.total(),
        }
    }
}

/// Derived summary for the chart and summary cards.
#[derive(Debug, Clone, Serialize)]
pub struct PlannerSummary {
    pub counts: ProductivityCounts,
    pub total_hours: f64,
    /// Weighted score out of 4; `null` until something is assigned
    pub score: Option<f64>,
    pub most_frequent: Category,
    pub total_activities: usize,
}

/// In-memory planner sessions, keyed by user id.
///
/// Shared across handlers within this instance; sessions are lost on restart
/// (saving is always explicit).
pub struct SessionStore {
    sessions: DashMap<String, PlannerSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Open (or replace) the session for a user.
    pub fn open(&self, uid: &str, session: PlannerSession) {
        self.sessions.insert(uid.to_string(), session);
    }

    /// Run a closure against a user's session.
    pub fn with<T>(
        &self,
        uid: &str,
        f: impl FnOnce(&mut PlannerSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut entry = self
            .sessions
            .get_mut(uid)
            .ok_or_else(|| AppError::NotFound("No open planner session".to_string()))?;
        f(entry.value_mut())
    }

    /// Drop a user's session.
    pub fn close(&self, uid: &str) {
        self.sessions.remove(uid);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
