use thiserror::Error;

/// Failures surfaced by the backend client.
///
/// Every variant is non-fatal from the app's point of view: interactions
/// catch these at the call site, show a toast, and roll back whatever local
/// state they had applied. A missing row is not an error; single-row
/// fetches return `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum Error {
    /// The auth endpoint rejected the credentials or token.
    #[error("{0}")]
    Auth(String),

    /// The data service answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection-level failure before any response arrived.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A mutation was attempted without a signed-in session. The views
    /// short-circuit with a sign-in prompt before this can fire; the client
    /// enforces it anyway.
    #[error("not signed in")]
    MissingSession,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Pull a human-readable message out of an error response body.
///
/// The data service answers with `{"message": ...}` and the auth endpoint
/// with `{"msg": ...}` or `{"error_description": ...}` depending on the
/// failure. Falls back to the raw body.
pub(crate) fn message_from_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error details".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_rest_body() {
        let body = r#"{"code":"23505","message":"duplicate key value"}"#;
        assert_eq!(message_from_body(body), "duplicate key value");
    }

    #[test]
    fn test_message_from_auth_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(message_from_body(body), "Invalid login credentials");
        let body = r#"{"code":400,"msg":"User already registered"}"#;
        assert_eq!(message_from_body(body), "User already registered");
    }

    #[test]
    fn test_message_falls_back_to_raw_body() {
        assert_eq!(message_from_body("gateway timeout"), "gateway timeout");
        assert_eq!(message_from_body("  "), "no error details");
    }
}
