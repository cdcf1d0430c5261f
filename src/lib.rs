// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LifeWheel: personal productivity tools backend
//!
//! This crate provides the backend API for the Wheel of Life self-assessment,
//! the weekly activity planner, and the habit tracker. Data is stored per-user
//! in Firestore; credential checks are delegated to the Firebase Identity
//! Toolkit.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{IdentityClient, SessionStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityClient,
    pub sessions: SessionStore,
}
