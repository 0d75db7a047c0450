//! Signed-in user session
//!
//! Login is email-only: there is no password and no verification. The
//! session is persisted in the key/value store so that it survives restarts,
//! and it never expires.

use crate::error::{NotebookError, Result};
use crate::kv::KeyValueStore;
use crate::notes::{iso_millis, now};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Key under which the session is persisted
pub const SESSION_KEY: &str = "notebook_user";

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Normalized (trimmed, lower-cased) email address
    pub email: String,
    /// When the user signed in
    #[serde(with = "iso_millis")]
    pub login_time: DateTime<Utc>,
}

/// Normalize an email address for use as a user identity
///
/// Trims surrounding whitespace and lower-cases. Rejects empty input and
/// anything without both an `@` and a `.`.
pub fn normalize_email(email: &str) -> Result<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') || !trimmed.contains('.') {
        return Err(NotebookError::InvalidEmail(email.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Persists the current [`Session`] in a key/value store
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a session store over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Sign in as `email`, replacing any existing session
    pub async fn login(&self, email: &str) -> Result<Session> {
        let session = Session {
            email: normalize_email(email)?,
            login_time: now(),
        };
        let json = serde_json::to_string(&session)?;
        self.store.set(SESSION_KEY, &json).await?;

        tracing::info!("Signed in as {}", session.email);
        Ok(session)
    }

    /// The persisted session, if any
    ///
    /// Unreadable session data counts as signed out.
    pub async fn current(&self) -> Result<Option<Session>> {
        let Some(json) = self.store.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Session>(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session data: {}", e);
                Ok(None)
            }
        }
    }

    /// Sign out; a no-op when nobody is signed in
    pub async fn logout(&self) -> Result<()> {
        if self.store.contains(SESSION_KEY).await? {
            self.store.remove(SESSION_KEY).await?;
            tracing::info!("Signed out");
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
