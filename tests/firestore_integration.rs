// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore round-trip tests.
//!
//! These require the Firestore emulator (FIRESTORE_EMULATOR_HOST set) and
//! skip themselves otherwise.

use lifewheel::models::schedule::{BlockSize, Day, GridConfig, PlannerData, ScheduleCell};
use lifewheel::models::wheel::{CategoryScores, LifeCategory, WheelEntry};
use lifewheel::models::{Category, Habit};
use std::collections::BTreeMap;

mod common;

#[tokio::test]
async fn test_planner_save_load_round_trip() {
    require_emulator!();
    let db = common::test_db().await;

    let config = GridConfig {
        start_hour: 8,
        end_hour: 12,
        block: BlockSize::Half,
        include_weekends: true,
    };
    let slots = config.time_slots();

    let mut planner = PlannerData::new("Integration Week");
    planner
        .activities
        .add(Category::HighLifeTime, "Gym")
        .unwrap();
    planner
        .activities
        .add(Category::ZeroValue, "Scrolling")
        .unwrap();
    planner.weekly_schedule.set_block(
        &slots,
        Day::Saturday,
        2,
        config.span_for(90),
        ScheduleCell {
            activity: "Gym".to_string(),
            category: Category::HighLifeTime,
        },
    );

    db.set_planner("it-user", &planner).await.unwrap();

    let loaded = db
        .get_planner("it-user", "Integration Week")
        .await
        .unwrap()
        .expect("planner should exist after save");
    assert_eq!(loaded, planner);

    let titles = db.list_planner_titles("it-user").await.unwrap();
    assert!(titles.contains(&"Integration Week".to_string()));
}

#[tokio::test]
async fn test_load_missing_planner_is_none() {
    require_emulator!();
    let db = common::test_db().await;

    let loaded = db.get_planner("it-user", "No Such Planner").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_wheel_save_load_round_trip() {
    require_emulator!();
    let db = common::test_db().await;

    let mut categories = BTreeMap::new();
    for (i, category) in LifeCategory::ALL.into_iter().enumerate() {
        categories.insert(
            category,
            CategoryScores {
                score: i as f64,
                goal: format!("Goal for {}", category.label()),
            },
        );
    }
    let entry = WheelEntry {
        first_name: "Ada".to_string(),
        date: "04-Aug-26".to_string(),
        categories,
    };

    db.set_wheel("it-user", &entry).await.unwrap();

    let loaded = db
        .get_wheel("it-user", "04-Aug-26")
        .await
        .unwrap()
        .expect("wheel entry should exist after save");
    assert_eq!(loaded, entry);
    assert_eq!(loaded.total_score(), 45.0);
}

#[tokio::test]
async fn test_habit_lifecycle() {
    require_emulator!();
    let db = common::test_db().await;

    let mut habit = Habit::new("Integration habit", "Mind");
    db.set_habit("it-user", &habit).await.unwrap();

    // Toggle and overwrite (last write wins)
    habit.completed = true;
    db.set_habit("it-user", &habit).await.unwrap();

    let loaded = db
        .get_habit("it-user", &habit.id)
        .await
        .unwrap()
        .expect("habit should exist after save");
    assert!(loaded.completed);

    db.delete_habit("it-user", &habit.id).await.unwrap();
    assert!(db.get_habit("it-user", &habit.id).await.unwrap().is_none());
}
