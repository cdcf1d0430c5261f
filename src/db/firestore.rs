// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage)
//! - Planners (activity catalog + weekly schedule, keyed by title)
//! - Wheel of Life entries (keyed by "DD-Mon-YY" date string)
//! - Habits (keyed by name-derived id)
//!
//! Every user document lives in a subcollection of `users/{uid}`. Writes are
//! full-document overwrites at fixed ids: last writer wins, no transactions
//! and no concurrency tokens.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Habit, PlannerData, User, WheelEntry};

/// Most recent wheel entries fetched for the progress chart.
const PROGRESS_FETCH_LIMIT: u32 = 20;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by provider uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Planner Operations ──────────────────────────────────────

    /// Load a planner document by title.
    pub async fn get_planner(&self, uid: &str, title: &str) -> Result<Option<PlannerData>, AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PLANNERS)
            .parent(&parent)
            .obj()
            .one(title)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a planner document, keyed by its title. Full overwrite.
    pub async fn set_planner(&self, uid: &str, planner: &PlannerData) -> Result<(), AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PLANNERS)
            .document_id(&planner.title)
            .parent(&parent)
            .object(planner)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List the titles of a user's stored planners.
    pub async fn list_planner_titles(&self, uid: &str) -> Result<Vec<String>, AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        let planners: Vec<PlannerData> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PLANNERS)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(planners.into_iter().map(|p| p.title).collect())
    }

    // ─── Wheel of Life Operations ────────────────────────────────

    /// Load a wheel entry by its date key.
    pub async fn get_wheel(&self, uid: &str, date_key: &str) -> Result<Option<WheelEntry>, AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WHEEL_OF_LIFE)
            .parent(&parent)
            .obj()
            .one(date_key)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a wheel entry, keyed by its date. Full overwrite.
    pub async fn set_wheel(&self, uid: &str, entry: &WheelEntry) -> Result<(), AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WHEEL_OF_LIFE)
            .document_id(&entry.date)
            .parent(&parent)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List a user's stored wheel entry date keys.
    pub async fn list_wheel_dates(&self, uid: &str) -> Result<Vec<String>, AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        let entries: Vec<WheelEntry> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WHEEL_OF_LIFE)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(entries.into_iter().map(|e| e.date).collect())
    }

    /// Fetch the most recent wheel entries for the progress chart.
    ///
    /// Ordered by the stored `date` field descending. That field is the
    /// "DD-Mon-YY" key, so this ordering is NOT chronological; the caller
    /// re-sorts by parsed date.
    pub async fn recent_wheels(&self, uid: &str) -> Result<Vec<WheelEntry>, AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WHEEL_OF_LIFE)
            .parent(&parent)
            .order_by([(
                "date",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(PROGRESS_FETCH_LIMIT)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Habit Operations ────────────────────────────────────────

    /// List all habits for a user.
    pub async fn list_habits(&self, uid: &str) -> Result<Vec<Habit>, AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        self.get_client()?
            .fluent()
            .select()
            .from(collections::HABITS)
            .parent(&parent)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Load a habit by id.
    pub async fn get_habit(&self, uid: &str, id: &str) -> Result<Option<Habit>, AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::HABITS)
            .parent(&parent)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a habit, keyed by its id. Full overwrite.
    pub async fn set_habit(&self, uid: &str, habit: &Habit) -> Result<(), AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::HABITS)
            .document_id(&habit.id)
            .parent(&parent)
            .object(habit)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a habit by id.
    pub async fn delete_habit(&self, uid: &str, id: &str) -> Result<(), AppError> {
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::HABITS)
            .parent(&parent)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents from a user subcollection using
    /// transactions.
    async fn batch_delete<T, F>(
        &self,
        uid: &str,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;
        let parent = self
            .get_client()?
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .parent(&parent)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── User Data Deletion (GDPR) ─────────────────────────────────

    /// Delete ALL data for a user (GDPR compliance).
    ///
    /// Deletes every subcollection document and the profile:
    /// - `users/{uid}/planners`
    /// - `users/{uid}/wheelOfLife`
    /// - `users/{uid}/habits`
    /// - `users/{uid}`
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, uid: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        // 1. Delete all planners
        let titles = self.list_planner_titles(uid).await?;
        self.batch_delete(uid, &titles, collections::PLANNERS, |t: &String| t.clone())
            .await?;
        deleted_count += titles.len();
        tracing::debug!(uid, count = titles.len(), "Deleted planners");

        // 2. Delete all wheel entries
        let dates = self.list_wheel_dates(uid).await?;
        self.batch_delete(uid, &dates, collections::WHEEL_OF_LIFE, |d: &String| {
            d.clone()
        })
        .await?;
        deleted_count += dates.len();
        tracing::debug!(uid, count = dates.len(), "Deleted wheel entries");

        // 3. Delete all habits
        let habits = self.list_habits(uid).await?;
        self.batch_delete(uid, &habits, collections::HABITS, |h: &Habit| h.id.clone())
            .await?;
        deleted_count += habits.len();
        tracing::debug!(uid, count = habits.len(), "Deleted habits");

        // 4. Delete user profile
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        deleted_count += 1;
        tracing::debug!(uid, "Deleted user profile");

        tracing::info!(uid, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
