// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit tracker routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Habit;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/habits", get(list_habits).post(create_habit))
        .route("/api/habits/{id}", axum::routing::put(update_habit).delete(delete_habit))
}

#[derive(Serialize)]
pub struct HabitsResponse {
    pub habits: Vec<Habit>,
}

/// List all habits for the current user.
async fn list_habits(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<HabitsResponse>> {
    let habits = state.db.list_habits(&user.uid).await?;
    Ok(Json(HabitsResponse { habits }))
}

#[derive(Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// Create a habit. New habits start incomplete.
async fn create_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<Json<Habit>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Habit name must not be empty".to_string(),
        ));
    }

    let habit = Habit::new(&payload.name, &payload.category);
    if state.db.get_habit(&user.uid, &habit.id).await?.is_some() {
        return Err(AppError::BadRequest(format!(
            "Habit '{}' already exists",
            habit.name
        )));
    }

    state.db.set_habit(&user.uid, &habit).await?;
    tracing::info!(uid = %user.uid, habit = %habit.name, "Habit created");
    Ok(Json(habit))
}

#[derive(Deserialize)]
pub struct UpdateHabitRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Rename a habit, move it to another category, or toggle completion.
/// The id is fixed at creation so renames do not re-key the document.
async fn update_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateHabitRequest>,
) -> Result<Json<Habit>> {
    let mut habit = state
        .db
        .get_habit(&user.uid, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Habit '{}' not found", id)))?;

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Habit name must not be empty".to_string(),
            ));
        }
        habit.name = name.trim().to_string();
    }
    if let Some(category) = payload.category {
        habit.category = category.trim().to_string();
    }
    if let Some(completed) = payload.completed {
        habit.completed = completed;
    }

    state.db.set_habit(&user.uid, &habit).await?;
    Ok(Json(habit))
}

#[derive(Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
}

/// Delete a habit.
async fn delete_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteHabitResponse>> {
    if state.db.get_habit(&user.uid, &id).await?.is_none() {
        return Err(AppError::NotFound(format!("Habit '{}' not found", id)));
    }

    state.db.delete_habit(&user.uid, &id).await?;
    tracing::info!(uid = %user.uid, habit_id = %id, "Habit deleted");
    Ok(Json(DeleteHabitResponse { success: true }))
}
