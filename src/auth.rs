//! Authentication against the PocketBase backend: login, registration, and
//! the persisted auth state.

use crate::storage::KeyValueStorage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const AUTH_KEY: &str = "pb_auth";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Failed to create account")]
    Registration,
    #[error("No response from server. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuthState {
    pub token: String,
    pub record: UserRecord,
}

// --- Persisted auth state ---

/// Holds the current token and user record, mirrored to durable storage
/// under `"pb_auth"` so a login survives reloads.
pub struct AuthStore {
    state: Option<AuthState>,
    storage: Box<dyn KeyValueStorage>,
}

impl AuthStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        let state = if storage.is_available() {
            match storage.read(AUTH_KEY) {
                Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    warn!(error = %e, "Discarding malformed auth state");
                    None
                }),
                None => None,
            }
        } else {
            None
        };
        Self { state, storage }
    }

    pub fn is_valid(&self) -> bool {
        self.state.as_ref().is_some_and(|s| !s.token.is_empty())
    }

    pub fn state(&self) -> Option<&AuthState> {
        self.state.as_ref()
    }

    pub fn set(&mut self, state: AuthState) {
        self.state = Some(state);
        self.persist();
    }

    /// Logs out: drops the in-memory state and the persisted copy.
    pub fn clear(&mut self) {
        self.state = None;
        self.persist();
    }

    fn persist(&mut self) {
        if !self.storage.is_available() {
            return;
        }
        match serde_json::to_string(&self.state) {
            Ok(raw) => {
                if let Err(e) = self.storage.write(AUTH_KEY, &raw) {
                    warn!(error = %e, "Failed to persist auth state");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize auth state"),
        }
    }
}

// --- HTTP wrappers ---

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    email_visibility: bool,
    password: &'a str,
    password_confirm: &'a str,
}

pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Password login. On success the token and user record are written to
    /// the auth store; a rejected login maps to `InvalidCredentials`.
    pub async fn login(
        &self,
        store: &mut AuthStore,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let url = format!(
            "{}/api/collections/users/auth-with-password",
            self.base_url
        );
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                identity: username,
                password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidCredentials);
        }

        let state: AuthState = response
            .json()
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;
        info!(username = %state.record.username, "Login successful");
        store.set(state);
        Ok(())
    }

    /// Creates a user record. The password confirmation is checked before
    /// any request goes out.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        re_password: &str,
    ) -> Result<(), AuthError> {
        if password != re_password {
            return Err(AuthError::PasswordMismatch);
        }

        let url = format!("{}/api/collections/users/records", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest {
                username,
                email,
                email_visibility: false,
                password,
                password_confirm: re_password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Registration);
        }
        info!(%username, "Account created");
        Ok(())
    }
}
