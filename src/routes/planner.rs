// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Planner routes: stored planner CRUD and the in-memory editing session.
//!
//! The session endpoints mirror the grid interaction flow one event per
//! request: cell click, activity select, duration select (commit), cancel.
//! Nothing touches Firestore until an explicit save.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::schedule::{Day, GridConfig, PlannerData, ScheduleData};
use crate::models::{Category, GroupedActivities};
use crate::services::planner::{PlannerSession, PlannerSummary, Selection};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/planners", get(list_planners))
        .route("/api/planners/{title}", get(get_planner).put(save_planner))
        .route("/api/planner/session", post(open_session).get(get_session))
        .route("/api/planner/session/grid", put(set_grid))
        .route("/api/planner/session/cell", post(click_cell))
        .route("/api/planner/session/activity", post(select_activity))
        .route("/api/planner/session/duration", post(select_duration))
        .route("/api/planner/session/cancel", post(cancel_selection))
        .route("/api/planner/session/save", post(save_session))
        .route(
            "/api/planner/session/activities",
            post(add_activity).delete(remove_activity),
        )
        .route("/api/account", delete(delete_account))
}

// ─── Stored Planners ─────────────────────────────────────────

#[derive(Serialize)]
pub struct PlannersResponse {
    pub planners: Vec<String>,
}

/// List the titles of the user's stored planners.
async fn list_planners(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PlannersResponse>> {
    let planners = state.db.list_planner_titles(&user.uid).await?;
    Ok(Json(PlannersResponse { planners }))
}

/// Load a stored planner by title.
async fn get_planner(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(title): Path<String>,
) -> Result<Json<PlannerData>> {
    let planner = state
        .db
        .get_planner(&user.uid, &title)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Planner '{}' not found", title)))?;
    Ok(Json(planner))
}

/// Store a planner document directly (full overwrite at its title key).
async fn save_planner(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(title): Path<String>,
    Json(mut planner): Json<PlannerData>,
) -> Result<Json<PlannerData>> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Planner title must not be empty".to_string(),
        ));
    }
    // The path segment is the document key; the body field follows it
    planner.title = title;

    state.db.set_planner(&user.uid, &planner).await?;
    tracing::info!(uid = %user.uid, title = %planner.title, "Planner saved");
    Ok(Json(planner))
}

// ─── Editing Session ─────────────────────────────────────────

/// Everything the frontend needs to render the planner page.
#[derive(Serialize)]
pub struct SessionView {
    pub title: String,
    pub config: GridConfig,
    pub slots: Vec<String>,
    pub days: Vec<Day>,
    pub activities: GroupedActivities,
    pub schedule: ScheduleData,
    pub selection: Selection,
    pub summary: PlannerSummary,
}

impl SessionView {
    fn from_session(session: &PlannerSession) -> Self {
        Self {
            title: session.title.clone(),
            config: *session.config(),
            slots: session.slots().to_vec(),
            days: session.days(),
            activities: session.activities.clone(),
            schedule: session.schedule.clone(),
            selection: session.selection().clone(),
            summary: session.summary(),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct OpenSessionRequest {
    /// Stored planner to load; omit to start from scratch
    #[serde(default)]
    pub title: Option<String>,
}

/// Open (or replace) the user's editing session.
async fn open_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<OpenSessionRequest>,
) -> Result<Json<SessionView>> {
    let session = match payload.title {
        Some(title) => {
            let planner = state
                .db
                .get_planner(&user.uid, &title)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Planner '{}' not found", title)))?;
            PlannerSession::from_planner(planner)
        }
        None => PlannerSession::default(),
    };

    let view = SessionView::from_session(&session);
    state.sessions.open(&user.uid, session);
    tracing::debug!(uid = %user.uid, "Planner session opened");
    Ok(Json(view))
}

/// Current session state.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionView>> {
    let view = state
        .sessions
        .with(&user.uid, |session| Ok(SessionView::from_session(session)))?;
    Ok(Json(view))
}

/// Replace the grid configuration.
async fn set_grid(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(config): Json<GridConfig>,
) -> Result<Json<SessionView>> {
    config
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let view = state.sessions.with(&user.uid, |session| {
        session.set_config(config);
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct CellRequest {
    pub time: String,
    pub day: Day,
}

/// Cell click: start (or restart) the assignment flow at a cell.
async fn click_cell(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CellRequest>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with(&user.uid, |session| {
        session.click_cell(&payload.time, payload.day)?;
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct ActivityRequest {
    pub category: Category,
    pub name: String,
}

/// Activity select for the currently selected cell.
async fn select_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with(&user.uid, |session| {
        session.select_activity(payload.category, &payload.name)?;
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct DurationRequest {
    pub duration_minutes: u32,
}

/// Duration select: commits the pending assignment.
async fn select_duration(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<DurationRequest>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with(&user.uid, |session| {
        let written = session.select_duration(payload.duration_minutes)?;
        tracing::debug!(uid = %user.uid, cells = written, "Assignment committed");
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}

/// Cancel the assignment flow without mutating the schedule.
async fn cancel_selection(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with(&user.uid, |session| {
        session.cancel();
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}

#[derive(Deserialize, Default)]
pub struct SaveSessionRequest {
    /// New title for the planner; required if the session has none yet
    #[serde(default)]
    pub title: Option<String>,
}

/// Persist the session's planner through the gateway.
///
/// The session itself is never rolled back: a failed save leaves everything
/// in memory so the user can retry.
async fn save_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SaveSessionRequest>,
) -> Result<Json<SessionView>> {
    let (planner, view) = state.sessions.with(&user.uid, |session| {
        if let Some(title) = &payload.title {
            session.title = title.trim().to_string();
        }
        if session.title.is_empty() {
            return Err(AppError::BadRequest(
                "Planner title must not be empty".to_string(),
            ));
        }
        Ok((session.to_planner(), SessionView::from_session(session)))
    })?;

    state.db.set_planner(&user.uid, &planner).await?;
    tracing::info!(uid = %user.uid, title = %planner.title, "Planner session saved");
    Ok(Json(view))
}

/// Add an activity to the session's catalog.
async fn add_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with(&user.uid, |session| {
        session
            .activities
            .add(payload.category, &payload.name)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}

/// Remove an activity from the session's catalog.
///
/// Cells already assigned to the activity keep their assignment, matching
/// the original planner's behavior.
async fn remove_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<SessionView>> {
    let view = state.sessions.with(&user.uid, |session| {
        session
            .activities
            .remove(payload.category, &payload.name)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(SessionView::from_session(session))
    })?;
    Ok(Json(view))
}

// ─── Account Deletion ────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub deleted_documents: usize,
}

/// Delete the user's account data (GDPR compliance).
///
/// Removes every stored planner, wheel entry, and habit, plus the profile.
/// The identity provider account itself is managed by the frontend.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(uid = %user.uid, "User-initiated account deletion");

    state.sessions.close(&user.uid);
    let deleted_documents = state.db.delete_user_data(&user.uid).await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        deleted_documents,
    }))
}
