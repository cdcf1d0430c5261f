// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wheel of Life routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::wheel::{progress_points, ProgressPoint, WheelEntry};
use crate::time_utils::{parse_wheel_date, sort_wheel_dates};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/wheel", get(list_dates))
        .route("/api/wheel/progress", get(get_progress))
        .route("/api/wheel/{date}", get(get_entry).put(save_entry))
}

#[derive(Serialize)]
pub struct WheelDatesResponse {
    pub dates: Vec<String>,
}

/// List the date keys of the user's stored wheel entries, oldest first.
async fn list_dates(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WheelDatesResponse>> {
    let mut dates = state.db.list_wheel_dates(&user.uid).await?;
    sort_wheel_dates(&mut dates);
    Ok(Json(WheelDatesResponse { dates }))
}

/// Load one wheel entry by its date key (also used for comparisons).
async fn get_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<WheelEntry>> {
    let entry = state
        .db
        .get_wheel(&user.uid, &date)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No data found for {}", date)))?;
    Ok(Json(entry))
}

/// Save a wheel entry at its date key.
///
/// Scores outside 0-10 are clamped rather than rejected (the score form
/// clamps on blur); a missing first name is an error.
async fn save_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    Json(mut entry): Json<WheelEntry>,
) -> Result<Json<WheelEntry>> {
    if parse_wheel_date(&date).is_none() {
        return Err(AppError::BadRequest(format!(
            "Invalid wheel date key '{}' (expected DD-Mon-YY)",
            date
        )));
    }
    if entry.first_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "First name must not be empty".to_string(),
        ));
    }

    // The path segment is the document key; the body field follows it
    entry.date = date;
    entry.clamp_scores();

    state.db.set_wheel(&user.uid, &entry).await?;
    tracing::info!(uid = %user.uid, date = %entry.date, "Wheel entry saved");
    Ok(Json(entry))
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub points: Vec<ProgressPoint>,
}

/// Total-score progress over the most recent entries, in time order.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>> {
    let entries = state.db.recent_wheels(&user.uid).await?;
    Ok(Json(ProgressResponse {
        points: progress_points(entries),
    }))
}
