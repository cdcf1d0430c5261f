// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod identity;
pub mod planner;

pub use identity::{IdentityClient, ProviderSession};
pub use planner::{PlannerSession, PlannerSummary, SessionStore};
