// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Identity Toolkit client for credential checks.
//!
//! Handles:
//! - Email/password sign-up and sign-in
//! - Password reset emails
//! - Google OAuth code exchange and federated sign-in
//!
//! The service never stores provider tokens; a successful call only yields
//! the provider user id used as the subject of our own session JWT.

use crate::config::Config;
use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

/// Provider calls are bounded so a hung network call cannot pin a request.
const PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Identity Toolkit client.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    api_key: String,
    google_client_id: String,
    google_client_secret: String,
}

/// Verified provider session returned by sign-in/sign-up calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSession {
    /// Provider user id (our JWT subject)
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "fullName")]
    pub display_name: Option<String>,
}

impl IdentityClient {
    /// Create a new client from application config.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            api_key: config.firebase_api_key.clone(),
            google_client_id: config.google_client_id.clone(),
            google_client_secret: config.google_client_secret.clone(),
        })
    }

    /// Create a new account with email and password.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderSession, AppError> {
        self.post_accounts(
            "signUp",
            &serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Verify an email/password pair.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, AppError> {
        self.post_accounts(
            "signInWithPassword",
            &serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Ask the provider to send a password reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_accounts(
                "sendOobCode",
                &serde_json::json!({
                    "requestType": "PASSWORD_RESET",
                    "email": email,
                }),
            )
            .await?;
        Ok(())
    }

    /// Exchange a Google OAuth authorization code for an ID token.
    pub async fn exchange_google_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, AppError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            id_token: String,
        }

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.google_client_id.as_str()),
                ("client_secret", self.google_client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(body = %body, "Google token exchange failed");
            return Err(AppError::AuthProvider("OAUTH_CODE_EXCHANGE_FAILED".to_string()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))?;
        Ok(token.id_token)
    }

    /// Sign in with a Google ID token (federated identity).
    pub async fn sign_in_with_google(
        &self,
        id_token: &str,
        request_uri: &str,
    ) -> Result<ProviderSession, AppError> {
        self.post_accounts(
            "signInWithIdp",
            &serde_json::json!({
                "postBody": format!("id_token={}&providerId=google.com", id_token),
                "requestUri": request_uri,
                "returnSecureToken": true,
                "returnIdpCredential": true,
            }),
        )
        .await
    }

    /// POST to an `accounts:*` Identity Toolkit endpoint, extracting the
    /// provider error code on failure.
    async fn post_accounts<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}/accounts:{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))?;

        if !response.status().is_success() {
            let code = extract_error_code(&response.text().await.unwrap_or_default());
            tracing::warn!(endpoint, code = %code, "Identity provider rejected request");
            return Err(AppError::AuthProvider(code));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthProvider(e.to_string()))
    }
}

/// Pull the error code out of an Identity Toolkit error body:
/// `{"error": {"message": "EMAIL_NOT_FOUND", ...}}`.
///
/// Some codes carry a suffix (`"WEAK_PASSWORD : Password should be..."`);
/// only the leading token is the code.
fn extract_error_code(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|m| m.split_whitespace().next().unwrap_or(m).to_string())
        })
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Map a provider error code to the user-facing message.
///
/// Unmapped codes fall through to a generic `"Error message: ..."` display.
pub fn user_message(code: &str) -> String {
    match code {
        "INVALID_PASSWORD" => "Wrong Password, please try again.".to_string(),
        "EMAIL_NOT_FOUND" => "Wrong Email or you are not Registered.".to_string(),
        "INVALID_LOGIN_CREDENTIALS" => "Wrong Email or Password, please try again.".to_string(),
        "MISSING_PASSWORD" => "Please Enter your Password.".to_string(),
        "INVALID_EMAIL" => "Please Enter your Email.".to_string(),
        "WEAK_PASSWORD" => "Password should be at least 6 characters.".to_string(),
        "EMAIL_EXISTS" => "Account already registered. Please Log In".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            "Too many attempts. Please try again later.".to_string()
        }
        other => format!("Error message: {}", other),
    }
}
