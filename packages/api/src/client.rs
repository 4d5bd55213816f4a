//! # Backend handle and table request builders
//!
//! [`Backend`] is the one connection object the whole app shares: base URL,
//! publishable key, the signed-in session slot, and a [`reqwest::Client`].
//! It is cheap to clone (everything behind an `Arc`) and is constructed
//! exactly once at app start, then handed around through context.
//!
//! Table access is builder-style, mirroring the hosted service's query
//! dialect: filters become `col=eq.value` / `col=in.(a,b)` query pairs,
//! embedded joins ride in the `select` list, counts use
//! `Prefer: count=exact` and come back in the `Content-Range` header.
//!
//! ```no_run
//! # use api::{Backend, Order, models::Post};
//! # async fn demo(backend: Backend) -> api::Result<()> {
//! let posts: Vec<Post> = backend
//!     .select("posts")
//!     .columns("*, profiles:user_id(*), likes(*), comments(*)")
//!     .eq("user_id", "u-1")
//!     .order("created_at", Order::Desc)
//!     .limit(50)
//!     .fetch()
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Reads work signed out (the publishable key authorizes them); mutations
//! refuse to run without a session and return
//! [`Error::MissingSession`](crate::Error::MissingSession).

use std::sync::{Arc, Mutex};

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::auth::{AuthUser, Session};
use crate::error::{message_from_body, Error, Result};

/// Accept header that makes the service answer with a single JSON object
/// instead of a one-element array.
const OBJECT_ACCEPT: &str = "application/vnd.pgrst.object+json";

/// Shared handle to the hosted backend project.
#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

struct BackendInner {
    base_url: String,
    publishable_key: String,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
}

impl Backend {
    pub fn new(base_url: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(BackendInner {
                base_url,
                publishable_key: publishable_key.into(),
                http: reqwest::Client::new(),
                session: Mutex::new(None),
            }),
        }
    }

    pub fn from_config(config: &store::AppConfig) -> Self {
        Self::new(
            config.backend.url.clone(),
            config.backend.publishable_key.clone(),
        )
    }

    /// The signed-in session, if any.
    pub fn session(&self) -> Option<Session> {
        self.inner.session.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.session().map(|s| s.user)
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        *self.inner.session.lock().unwrap_or_else(|e| e.into_inner()) = session;
    }

    pub(crate) fn require_session(&self) -> Result<Session> {
        self.session().ok_or(Error::MissingSession)
    }

    /// Start a filtered select against a table.
    pub fn select(&self, table: impl Into<String>) -> SelectBuilder {
        SelectBuilder {
            backend: self.clone(),
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Start an insert of one row (field map) into a table.
    pub fn insert(&self, table: impl Into<String>, row: serde_json::Value) -> InsertBuilder {
        InsertBuilder {
            backend: self.clone(),
            table: table.into(),
            row,
            returning: None,
        }
    }

    /// Start a filtered delete against a table.
    pub fn delete(&self, table: impl Into<String>) -> DeleteBuilder {
        DeleteBuilder {
            backend: self.clone(),
            table: table.into(),
            filters: Vec::new(),
        }
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.inner.base_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.inner.base_url, path)
    }

    /// Bearer value for the Authorization header: the session's access token
    /// when signed in, the publishable key otherwise.
    pub(crate) fn bearer(&self) -> String {
        self.session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.inner.publishable_key.clone())
    }

    /// A request with the service headers applied.
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.publishable_key)
            .bearer_auth(self.bearer())
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn publishable_key(&self) -> &str {
        &self.inner.publishable_key
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("base_url", &self.inner.base_url)
            .field("signed_in", &self.session().is_some())
            .finish()
    }
}

/// Sort direction for [`SelectBuilder::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn suffix(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Builder for a filtered `GET /rest/v1/{table}`.
#[must_use]
pub struct SelectBuilder {
    backend: Backend,
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl SelectBuilder {
    /// Column list, including embedded joins
    /// (e.g. `"*, profiles:user_id(*), likes(*)"`). Defaults to `"*"`.
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    /// Equality filter: `column=eq.value`.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Membership filter: `column=in.(a,b,c)`. Values are backend-assigned
    /// ids and must not contain commas.
    pub fn in_list<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.to_string(), format!("in.({list})")));
        self
    }

    pub fn order(mut self, column: &str, direction: Order) -> Self {
        self.order = Some(format!("{column}.{}", direction.suffix()));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The query pairs this select will send, in wire order.
    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Fetch all matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let url = self.backend.rest_url(&self.table);
        tracing::debug!(table = %self.table, "select");
        let response = self
            .backend
            .request(Method::GET, &url)
            .query(&self.query_pairs())
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch at most one row. A missing row is `Ok(None)`, not an error.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>> {
        let rows: Vec<T> = self.limit(1).fetch().await?;
        Ok(rows.into_iter().next())
    }

    /// Count matching rows without fetching them
    /// (`HEAD` + `Prefer: count=exact`, total read from `Content-Range`).
    pub async fn count(self) -> Result<i64> {
        let url = self.backend.rest_url(&self.table);
        tracing::debug!(table = %self.table, "count");
        let response = self
            .backend
            .request(Method::HEAD, &url)
            .query(&self.query_pairs())
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| Error::Status {
                status: status.as_u16(),
                message: "count missing from response".to_string(),
            })
    }
}

/// Builder for a `POST /rest/v1/{table}` inserting one row.
#[must_use]
pub struct InsertBuilder {
    backend: Backend,
    table: String,
    row: serde_json::Value,
    returning: Option<String>,
}

impl InsertBuilder {
    /// Ask for the inserted row back with this column list (embedded joins
    /// allowed, e.g. `"*, profiles:user_id(*)"`). Only affects
    /// [`execute`](Self::execute).
    pub fn returning(mut self, columns: &str) -> Self {
        self.returning = Some(columns.to_string());
        self
    }

    /// Insert and return the created row.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        self.backend.require_session()?;
        let url = self.backend.rest_url(&self.table);
        tracing::debug!(table = %self.table, "insert");
        let mut request = self
            .backend
            .request(Method::POST, &url)
            .header("Prefer", "return=representation")
            .header("Accept", OBJECT_ACCEPT);
        if let Some(returning) = &self.returning {
            request = request.query(&[("select", returning)]);
        }
        let response = request.json(&self.row).send().await?;
        read_json(response).await
    }

    /// Insert without asking for the row back.
    pub async fn execute_unit(self) -> Result<()> {
        self.backend.require_session()?;
        let url = self.backend.rest_url(&self.table);
        tracing::debug!(table = %self.table, "insert");
        let response = self
            .backend
            .request(Method::POST, &url)
            .header("Prefer", "return=minimal")
            .json(&self.row)
            .send()
            .await?;
        read_unit(response).await
    }
}

/// Builder for a filtered `DELETE /rest/v1/{table}`.
#[must_use]
pub struct DeleteBuilder {
    backend: Backend,
    table: String,
    filters: Vec<(String, String)>,
}

impl DeleteBuilder {
    /// Equality filter: `column=eq.value`.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub async fn execute_unit(self) -> Result<()> {
        self.backend.require_session()?;
        let url = self.backend.rest_url(&self.table);
        tracing::debug!(table = %self.table, "delete");
        let response = self
            .backend
            .request(Method::DELETE, &url)
            .query(&self.filters)
            .send()
            .await?;
        read_unit(response).await
    }
}

/// Total row count from a `Content-Range` value such as `0-41/42` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<i64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

fn status_error(status: u16, body: &str) -> Error {
    let message = message_from_body(body);
    tracing::warn!(status, %message, "data service error");
    Error::Status { status, message }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(status_error(status.as_u16(), &body));
    }
    Ok(serde_json::from_str(&body)?)
}

async fn read_unit(response: Response) -> Result<()> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status.as_u16(), &body));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> Backend {
        Backend::new("http://localhost:54321/", "pk-test")
    }

    fn test_session() -> Session {
        Session {
            access_token: "user-token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: None,
            user: AuthUser {
                id: "u-1".to_string(),
                email: "ada@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = backend();
        assert_eq!(backend.rest_url("posts"), "http://localhost:54321/rest/v1/posts");
        assert_eq!(
            backend.auth_url("token?grant_type=password"),
            "http://localhost:54321/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn test_bearer_falls_back_to_publishable_key() {
        let backend = backend();
        assert_eq!(backend.bearer(), "pk-test");

        backend.set_session(Some(test_session()));
        assert_eq!(backend.bearer(), "user-token");
        assert_eq!(backend.current_user().unwrap().id, "u-1");

        backend.set_session(None);
        assert_eq!(backend.bearer(), "pk-test");
    }

    #[test]
    fn test_select_query_pairs() {
        let builder = backend()
            .select("posts")
            .columns("*, profiles:user_id(*), likes(*), comments(*)")
            .in_list("user_id", ["u-1", "u-2"])
            .order("created_at", Order::Desc)
            .limit(50);
        assert_eq!(
            builder.query_pairs(),
            vec![
                (
                    "select".to_string(),
                    "*, profiles:user_id(*), likes(*), comments(*)".to_string()
                ),
                ("user_id".to_string(), "in.(u-1,u-2)".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_defaults_to_star() {
        let builder = backend().select("profiles").eq("user_id", "u-1");
        assert_eq!(
            builder.query_pairs(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.u-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_content_range_totals() {
        assert_eq!(parse_content_range_total("0-41/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-0/7"), Some(7));
        assert_eq!(parse_content_range_total("*/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[tokio::test]
    async fn test_mutations_require_session() {
        // Unroutable address: the guard must fire before any connection.
        let backend = Backend::new("http://127.0.0.1:1", "pk-test");

        let err = backend
            .insert("likes", serde_json::json!({"post_id": "p-1"}))
            .execute_unit()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingSession));

        let err = backend
            .delete("likes")
            .eq("post_id", "p-1")
            .execute_unit()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingSession));
    }
}
