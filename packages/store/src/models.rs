//! # Persisted session model
//!
//! Defines the data structure written through a [`crate::SessionStore`] so a
//! signed-in session survives app restarts. This is the on-disk (or
//! localStorage) projection of a session: just enough to resume without
//! asking for credentials again. The richer in-memory session type lives in
//! the `api` crate and converts to and from this record.

use serde::{Deserialize, Serialize};

/// A resumable authentication session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Bearer token attached to every authenticated request.
    pub access_token: String,
    /// Token the backend accepts for issuing a fresh access token.
    #[serde(default)]
    pub refresh_token: String,
    /// Backend-assigned identity key, also the `profiles.user_id` value.
    pub user_id: String,
    pub email: String,
    /// Unix timestamp the access token expires at, when the backend reported one.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl SessionRecord {
    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_record_roundtrip() {
        let record = SessionRecord {
            access_token: "jwt.header.payload".to_string(),
            refresh_token: "refresh-abc".to_string(),
            user_id: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            expires_at: Some(1_755_000_000),
        };
        let text = record.to_toml().unwrap();
        assert_eq!(SessionRecord::from_toml(&text).unwrap(), record);
    }

    #[test]
    fn test_missing_optional_fields() {
        let record = SessionRecord::from_toml(
            "access_token = \"tok\"\nuser_id = \"u1\"\nemail = \"a@b.c\"\n",
        )
        .unwrap();
        assert_eq!(record.refresh_token, "");
        assert_eq!(record.expires_at, None);
    }
}
