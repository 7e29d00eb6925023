//! Explicit authentication context.
//!
//! The signed-in user and their bearer token live in a [`SessionContext`] that callers own and
//! pass by reference. A session begins with [`SessionContext::begin`] after a successful login
//! and ends with [`SessionContext::end`] on logout.

use crate::constants::FALLBACK_USER_NAME;
use crate::{CoreError, CoreResult};
use labora_types::Secret;
use serde::Deserialize;

/// The user record returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub token: Secret,
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Debug, Default)]
pub struct SessionContext {
    user: Option<AuthUser>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that is already signed in with a bare token (e.g. from `LABORA_TOKEN`).
    pub fn from_token(token: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.begin(AuthUser {
            id: String::new(),
            email: String::new(),
            name: None,
            role: None,
            token: Secret::new(token),
        });
        session
    }

    /// Starts a session, replacing any previous one.
    pub fn begin(&mut self, user: AuthUser) {
        tracing::info!(user_id = %user.id, "session started");
        self.user = Some(user);
    }

    /// Ends the session and returns the user that was signed in.
    pub fn end(&mut self) -> Option<AuthUser> {
        let user = self.user.take();
        if let Some(user) = &user {
            tracing::info!(user_id = %user.id, "session ended");
        }
        user
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| !u.token.is_empty())
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// The bearer token.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAuthenticated` outside a session.
    pub fn token(&self) -> CoreResult<&str> {
        self.user
            .as_ref()
            .map(|u| u.token.expose())
            .filter(|t| !t.is_empty())
            .ok_or(CoreError::NotAuthenticated)
    }

    /// Greeting name, `"Pengguna"` when unknown.
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(FALLBACK_USER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn researcher() -> AuthUser {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "email": "peneliti@labora.id",
            "name": "Sari",
            "role": "researcher",
            "token": "jwt-123",
        }))
        .unwrap()
    }

    #[test]
    fn token_requires_a_session() {
        let session = SessionContext::new();
        assert!(matches!(session.token(), Err(CoreError::NotAuthenticated)));
        assert_eq!(session.display_name(), "Pengguna");
    }

    #[test]
    fn begin_and_end_drive_the_lifecycle() {
        let mut session = SessionContext::new();
        session.begin(researcher());
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap(), "jwt-123");
        assert_eq!(session.display_name(), "Sari");
        assert_eq!(session.user().unwrap().id, "7");

        let ended = session.end().expect("user was signed in");
        assert_eq!(ended.email, "peneliti@labora.id");
        assert!(!session.is_authenticated());
        assert!(session.end().is_none());
    }

    #[test]
    fn token_never_appears_in_debug_output() {
        let mut session = SessionContext::new();
        session.begin(researcher());
        assert!(!format!("{session:?}").contains("jwt-123"));
    }

    #[test]
    fn bare_token_session_is_authenticated() {
        let session = SessionContext::from_token("abc");
        assert_eq!(session.token().unwrap(), "abc");
        assert!(!SessionContext::from_token("").is_authenticated());
    }
}
