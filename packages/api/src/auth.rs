//! # Token auth against the hosted backend
//!
//! Sign-up, sign-in, and sign-out against the backend's auth endpoints.
//! Successful calls store the issued [`Session`] in the shared [`Backend`]
//! slot so every subsequent table request carries the user's bearer token;
//! sign-out clears the slot first and tells the backend best-effort.
//!
//! Sign-up sends `username` and `full_name` as user metadata; the backend
//! creates the matching `profiles` row from it server-side, so the client
//! never inserts into `profiles` directly.

use chrono::Utc;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Backend;
use crate::error::{message_from_body, Error, Result};

/// The signed-in identity as the auth endpoint reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    /// Identity key; every `user_id` column references this.
    pub id: String,
    pub email: String,
}

/// A live authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp the access token expires at, when reported.
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    /// Project into the persistable record the `store` crate writes.
    pub fn to_record(&self) -> store::SessionRecord {
        store::SessionRecord {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            user_id: self.user.id.clone(),
            email: self.user.email.clone(),
            expires_at: self.expires_at,
        }
    }

    pub fn from_record(record: store::SessionRecord) -> Self {
        Self {
            access_token: record.access_token,
            refresh_token: record.refresh_token,
            expires_at: record.expires_at,
            user: AuthUser {
                id: record.user_id,
                email: record.email,
            },
        }
    }
}

/// Success payload of the signup and token endpoints. Sign-up with email
/// confirmation enabled answers with a bare user and no token.
#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl TokenPayload {
    fn into_session(self) -> Result<Session> {
        let (Some(access_token), Some(user)) = (self.access_token, self.user) else {
            return Err(Error::Auth(
                "Check your email to confirm your account, then sign in".to_string(),
            ));
        };
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| Utc::now().timestamp() + secs));
        Ok(Session {
            access_token,
            refresh_token: self.refresh_token.unwrap_or_default(),
            expires_at,
            user: AuthUser {
                id: user.id,
                email: user.email.unwrap_or_default(),
            },
        })
    }
}

impl Backend {
    /// Create an account and sign in. `username` and `full_name` travel as
    /// user metadata for the backend-side profile creation.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
        full_name: &str,
    ) -> Result<Session> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": {
                "username": username,
                "full_name": full_name,
            },
        });
        self.auth_exchange("signup", body).await
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        self.auth_exchange("token?grant_type=password", body).await
    }

    /// Drop the local session and revoke it on the backend best-effort.
    /// The local slot is cleared even when the revoke call fails.
    pub async fn sign_out(&self) {
        let Some(session) = self.session() else {
            return;
        };
        self.set_session(None);

        let url = self.auth_url("logout");
        let result = self
            .http()
            .post(url)
            .header("apikey", self.publishable_key())
            .bearer_auth(&session.access_token)
            .send()
            .await;
        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(status = response.status().as_u16(), "sign-out revoke rejected");
            }
            Err(err) => tracing::warn!("sign-out revoke failed: {err}"),
            Ok(_) => {}
        }
    }

    /// Resume a persisted session without a network round trip.
    pub fn restore(&self, record: store::SessionRecord) -> Session {
        let session = Session::from_record(record);
        self.set_session(Some(session.clone()));
        session
    }

    async fn auth_exchange(&self, path: &str, body: serde_json::Value) -> Result<Session> {
        let url = self.auth_url(path);
        tracing::debug!(path, "auth exchange");
        let response = self.request(Method::POST, &url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = message_from_body(&text);
            tracing::warn!(status = status.as_u16(), %message, "auth rejected");
            return Err(Error::Auth(message));
        }
        let payload: TokenPayload = serde_json::from_str(&text)?;
        let session = payload.into_session()?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }
}
