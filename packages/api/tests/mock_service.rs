//! Contract tests against a mock of the hosted data service.
//!
//! Each test stands up an axum server on an ephemeral port, points a
//! [`Backend`] at it, runs the typed operations, and then asserts the
//! requests looked exactly like the service expects: filters and joins in
//! the query string, the publishable key and bearer token in the headers,
//! count totals in `Content-Range`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use api::{queries, Backend, Error};
use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

type Log = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn record(log: &Log, label: &str, headers: &HeaderMap, query: &HashMap<String, String>, body: Value) {
    let mut recorded_headers = serde_json::Map::new();
    for name in ["apikey", "authorization", "prefer", "accept"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            recorded_headers.insert(name.to_string(), Value::String(value.to_string()));
        }
    }
    log.lock().unwrap().push(json!({
        "label": label,
        "headers": recorded_headers,
        "query": query,
        "body": body,
    }));
}

fn find(entries: &[Value], label: &str) -> Value {
    entries
        .iter()
        .find(|e| e["label"] == label)
        .cloned()
        .unwrap_or_else(|| panic!("no {label} request recorded"))
}

fn profile_row(user_id: &str, username: &str) -> Value {
    json!({
        "id": format!("profile-{user_id}"),
        "user_id": user_id,
        "username": username,
        "full_name": null,
        "avatar_url": null,
        "bio": null,
        "created_at": "2024-01-01T00:00:00+00:00",
        "updated_at": "2024-01-01T00:00:00+00:00"
    })
}

fn post_row(id: &str, user_id: &str) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "image_url": format!("https://img.example.com/{id}.jpg"),
        "caption": "golden hour",
        "created_at": "2024-03-01T12:00:00+00:00",
        "updated_at": "2024-03-01T12:00:00+00:00",
        "profiles": profile_row(user_id, "ada"),
        "likes": [],
        "comments": []
    })
}

fn session_json() -> Value {
    json!({
        "access_token": "user-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-1",
        "user": {"id": "u-1", "email": "ada@example.com"}
    })
}

fn restored_session() -> store::SessionRecord {
    store::SessionRecord {
        access_token: "user-token".to_string(),
        refresh_token: "refresh-1".to_string(),
        user_id: "u-1".to_string(),
        email: "ada@example.com".to_string(),
        expires_at: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn discover_feed_when_following_nobody() {
    let log: Log = Log::default();
    let follows_log = log.clone();
    let posts_log = log.clone();
    let app = Router::new()
        .route(
            "/rest/v1/follows",
            get(move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
                let log = follows_log.clone();
                async move {
                    record(&log, "follows", &headers, &query, Value::Null);
                    Json(json!([]))
                }
            }),
        )
        .route(
            "/rest/v1/posts",
            get(move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
                let log = posts_log.clone();
                async move {
                    record(&log, "posts", &headers, &query, Value::Null);
                    Json(json!([post_row("post-1", "u-9")]))
                }
            }),
        );
    let backend = Backend::new(serve(app).await, "pk-test");

    let feed = queries::fetch_feed(&backend, "u-1").await.unwrap();
    assert!(feed.discover);
    assert_eq!(feed.posts.len(), 1);
    assert_eq!(feed.posts[0].author_username(), Some("ada"));

    let entries = log.lock().unwrap().clone();
    let follows = find(&entries, "follows");
    assert_eq!(follows["query"]["select"], "following_id");
    assert_eq!(follows["query"]["follower_id"], "eq.u-1");
    assert_eq!(follows["headers"]["apikey"], "pk-test");
    assert_eq!(follows["headers"]["authorization"], "Bearer pk-test");

    let posts = find(&entries, "posts");
    assert_eq!(
        posts["query"]["select"],
        "*, profiles:user_id(*), likes(*), comments(*)"
    );
    assert_eq!(posts["query"]["order"], "created_at.desc");
    assert_eq!(posts["query"]["limit"], "20");
    assert!(posts["query"].get("user_id").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn feed_covers_followed_users_plus_self() {
    let log: Log = Log::default();
    let follows_log = log.clone();
    let posts_log = log.clone();
    let app = Router::new()
        .route(
            "/rest/v1/follows",
            get(move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
                let log = follows_log.clone();
                async move {
                    record(&log, "follows", &headers, &query, Value::Null);
                    Json(json!([
                        {"following_id": "u-2"},
                        {"following_id": "u-3"}
                    ]))
                }
            }),
        )
        .route(
            "/rest/v1/posts",
            get(move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
                let log = posts_log.clone();
                async move {
                    record(&log, "posts", &headers, &query, Value::Null);
                    Json(json!([post_row("post-1", "u-2"), post_row("post-2", "u-1")]))
                }
            }),
        );
    let backend = Backend::new(serve(app).await, "pk-test");

    let feed = queries::fetch_feed(&backend, "u-1").await.unwrap();
    assert!(!feed.discover);
    assert_eq!(feed.posts.len(), 2);

    let entries = log.lock().unwrap().clone();
    let posts = find(&entries, "posts");
    assert_eq!(posts["query"]["user_id"], "in.(u-2,u-3,u-1)");
    assert_eq!(posts["query"]["limit"], "50");
}

#[tokio::test(flavor = "multi_thread")]
async fn like_flow_switches_to_the_user_bearer_token() {
    let log: Log = Log::default();
    let token_log = log.clone();
    let like_log = log.clone();
    let unlike_log = log.clone();
    let app = Router::new()
        .route(
            "/auth/v1/token",
            post(
                move |Query(query): Query<HashMap<String, String>>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| {
                    let log = token_log.clone();
                    async move {
                        record(&log, "token", &headers, &query, body);
                        Json(session_json())
                    }
                },
            ),
        )
        .route(
            "/rest/v1/likes",
            post(
                move |Query(query): Query<HashMap<String, String>>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| {
                    let log = like_log.clone();
                    async move {
                        record(&log, "like", &headers, &query, body);
                        StatusCode::CREATED
                    }
                },
            )
            .delete(
                move |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| {
                    let log = unlike_log.clone();
                    async move {
                        record(&log, "unlike", &headers, &query, Value::Null);
                        StatusCode::NO_CONTENT
                    }
                },
            ),
        );
    let backend = Backend::new(serve(app).await, "pk-test");

    let session = backend.sign_in("ada@example.com", "secret123").await.unwrap();
    assert_eq!(session.user.id, "u-1");

    queries::like_post(&backend, "p-1").await.unwrap();
    queries::unlike_post(&backend, "p-1").await.unwrap();

    let entries = log.lock().unwrap().clone();
    let token = find(&entries, "token");
    assert_eq!(token["query"]["grant_type"], "password");
    assert_eq!(token["body"]["email"], "ada@example.com");
    assert_eq!(token["headers"]["authorization"], "Bearer pk-test");

    let like = find(&entries, "like");
    assert_eq!(like["headers"]["authorization"], "Bearer user-token");
    assert_eq!(like["headers"]["prefer"], "return=minimal");
    assert_eq!(like["body"], json!({"post_id": "p-1", "user_id": "u-1"}));

    let unlike = find(&entries, "unlike");
    assert_eq!(unlike["headers"]["authorization"], "Bearer user-token");
    assert_eq!(unlike["query"]["post_id"], "eq.p-1");
    assert_eq!(unlike["query"]["user_id"], "eq.u-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn comment_insert_returns_the_confirmed_row() {
    let log: Log = Log::default();
    let comment_log = log.clone();
    let app = Router::new().route(
        "/rest/v1/comments",
        post(
            move |Query(query): Query<HashMap<String, String>>,
                  headers: HeaderMap,
                  Json(body): Json<Value>| {
                let log = comment_log.clone();
                async move {
                    record(&log, "comment", &headers, &query, body);
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "id": "c-10",
                            "post_id": "p-1",
                            "user_id": "u-1",
                            "content": "Nice shot!",
                            "created_at": "2024-03-01T15:00:00+00:00",
                            "updated_at": "2024-03-01T15:00:00+00:00",
                            "profiles": profile_row("u-1", "ada")
                        })),
                    )
                }
            },
        ),
    );
    let backend = Backend::new(serve(app).await, "pk-test");
    backend.restore(restored_session());

    let comment = queries::add_comment(&backend, "p-1", "Nice shot!").await.unwrap();
    assert_eq!(comment.id, "c-10");
    assert_eq!(comment.content, "Nice shot!");
    assert_eq!(comment.profiles.unwrap().username, "ada");

    let entries = log.lock().unwrap().clone();
    let recorded = find(&entries, "comment");
    assert_eq!(recorded["headers"]["prefer"], "return=representation");
    assert_eq!(recorded["headers"]["accept"], "application/vnd.pgrst.object+json");
    assert_eq!(recorded["query"]["select"], "*, profiles:user_id(*)");
    assert_eq!(
        recorded["body"],
        json!({"post_id": "p-1", "user_id": "u-1", "content": "Nice shot!"})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn follow_stats_read_totals_from_content_range() {
    let log: Log = Log::default();
    let follows_log = log.clone();
    let app = Router::new().route(
        "/rest/v1/follows",
        get(move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
            let log = follows_log.clone();
            async move {
                record(&log, "count", &headers, &query, Value::Null);
                let total = if query.contains_key("following_id") { 7 } else { 3 };
                (
                    StatusCode::OK,
                    [(header::CONTENT_RANGE, format!("0-0/{total}"))],
                    Json(json!([])),
                )
            }
        }),
    );
    let backend = Backend::new(serve(app).await, "pk-test");

    let stats = queries::follow_stats(&backend, "u-5").await.unwrap();
    assert_eq!(stats.followers, 7);
    assert_eq!(stats.following, 3);

    let entries = log.lock().unwrap().clone();
    assert!(entries
        .iter()
        .all(|e| e["headers"]["prefer"] == "count=exact"));
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_like_surfaces_as_status_error() {
    let app = Router::new().route(
        "/rest/v1/likes",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "code": "23505",
                    "message": "duplicate key value violates unique constraint"
                })),
            )
        }),
    );
    let backend = Backend::new(serve(app).await, "pk-test");
    backend.restore(restored_session());

    let err = queries::like_post(&backend, "p-1").await.unwrap_err();
    match err {
        Error::Status { status, message } => {
            assert_eq!(status, 409);
            assert!(message.contains("duplicate key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_credentials_surface_as_auth_error() {
    let app = Router::new().route(
        "/auth/v1/token",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                })),
            )
        }),
    );
    let backend = Backend::new(serve(app).await, "pk-test");

    let err = backend.sign_in("ada@example.com", "wrong").await.unwrap_err();
    match err {
        Error::Auth(message) => assert_eq!(message, "Invalid login credentials"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(backend.session().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn absent_post_is_none_not_an_error() {
    let log: Log = Log::default();
    let posts_log = log.clone();
    let app = Router::new().route(
        "/rest/v1/posts",
        get(move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
            let log = posts_log.clone();
            async move {
                record(&log, "posts", &headers, &query, Value::Null);
                Json(json!([]))
            }
        }),
    );
    let backend = Backend::new(serve(app).await, "pk-test");

    let post = queries::fetch_post(&backend, "missing").await.unwrap();
    assert!(post.is_none());

    let entries = log.lock().unwrap().clone();
    let recorded = find(&entries, "posts");
    assert_eq!(recorded["query"]["id"], "eq.missing");
    assert_eq!(recorded["query"]["limit"], "1");
}
