// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod habit;
pub mod schedule;
pub mod user;
pub mod wheel;

pub use activity::{Activity, Category, GroupedActivities};
pub use habit::Habit;
pub use schedule::{
    BlockSize, Day, GridConfig, PlannerData, ProductivityCounts, ScheduleCell, ScheduleData,
};
pub use user::User;
pub use wheel::{CategoryScores, LifeCategory, ProgressPoint, WheelEntry};
