//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Identity provider user id (also used as document ID)
    pub uid: String,
    /// Email address (may be None for some OAuth accounts)
    pub email: Option<String>,
    /// Display name, when the provider supplies one
    pub display_name: Option<String>,
    /// When the user first signed in
    pub created_at: String,
    /// Last sign-in timestamp
    pub last_active: String,
}
