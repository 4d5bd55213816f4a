//! # Row models for the hosted tables
//!
//! Client-side projections of the five backend tables. Every id is an
//! opaque `String` (backend-assigned) so the same types work in WASM, and
//! every struct is `Serialize + Deserialize + PartialEq` so rows can be
//! carried through signals and compared in tests.
//!
//! ## Types
//!
//! | Struct | Table | Notes |
//! |--------|-------|-------|
//! | [`Profile`] | `profiles` | Immutable `user_id` identity key, mutable display fields. [`Profile::display_name`] falls back to the username, [`Profile::initial`] feeds the avatar placeholder. |
//! | [`Post`] | `posts` | Optionally carries embedded `profiles` (author), `likes`, and `comments` when fetched with joins. The embeds are read-only snapshots; the UI keeps its own counters. |
//! | [`Like`] | `likes` | Unique per (post, user); existence is boolean membership. |
//! | [`Comment`] | `comments` | Append-only from the client; optionally carries the embedded author. |
//! | [`Follow`] | `follows` | Unique per (follower, followee). |
//!
//! The auth-side types ([`AuthUser`], [`Session`]) live in [`crate::auth`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row from `profiles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    /// Identity key; matches the auth user id and every `user_id` column.
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Full name when set, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }

    /// Uppercased first letter of the username, for avatar placeholders.
    pub fn initial(&self) -> String {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "U".to_string())
    }
}

/// A row from `posts`, with optional embedded relations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Embedded author row, present when fetched with a `profiles:user_id(*)` join.
    #[serde(default)]
    pub profiles: Option<Profile>,
    /// Embedded likes, present when fetched with a `likes(*)` join.
    #[serde(default)]
    pub likes: Vec<Like>,
    /// Embedded comments, present when fetched with a `comments(*)` join.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn like_count(&self) -> i64 {
        self.likes.len() as i64
    }

    /// Whether the embedded likes contain one from the given user.
    pub fn liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user_id == user_id)
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Embedded author's username, when the join was fetched.
    pub fn author_username(&self) -> Option<&str> {
        self.profiles.as_ref().map(|p| p.username.as_str())
    }
}

/// A row from `likes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// A row from `comments`, with the optional embedded author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub profiles: Option<Profile>,
}

/// A row from `follows`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Follow {
    pub id: String,
    pub follower_id: String,
    pub following_id: String,
    pub created_at: DateTime<Utc>,
}

/// Follower/following totals for one profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowStats {
    pub followers: i64,
    pub following: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: &str, full_name: Option<&str>) -> Profile {
        Profile {
            id: "p-1".to_string(),
            user_id: "u-1".to_string(),
            username: username.to_string(),
            full_name: full_name.map(str::to_string),
            avatar_url: None,
            bio: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(profile("ada", Some("Ada Lovelace")).display_name(), "Ada Lovelace");
        assert_eq!(profile("ada", None).display_name(), "ada");
        assert_eq!(profile("ada", Some("")).display_name(), "ada");
    }

    #[test]
    fn test_avatar_initial() {
        assert_eq!(profile("ada", None).initial(), "A");
        assert_eq!(profile("", None).initial(), "U");
    }

    #[test]
    fn test_post_with_embedded_joins() {
        let body = r#"{
            "id": "post-1",
            "user_id": "u-1",
            "image_url": "https://img.example.com/1.jpg",
            "caption": "golden hour",
            "created_at": "2024-03-01T12:00:00+00:00",
            "updated_at": "2024-03-01T12:00:00+00:00",
            "profiles": {
                "id": "p-1", "user_id": "u-1", "username": "ada",
                "full_name": null, "avatar_url": null, "bio": null,
                "created_at": "2024-01-01T00:00:00+00:00",
                "updated_at": "2024-01-01T00:00:00+00:00"
            },
            "likes": [
                {"id": "l-1", "post_id": "post-1", "user_id": "u-2",
                 "created_at": "2024-03-01T13:00:00+00:00"}
            ],
            "comments": []
        }"#;
        let post: Post = serde_json::from_str(body).unwrap();
        assert_eq!(post.author_username(), Some("ada"));
        assert_eq!(post.like_count(), 1);
        assert!(post.liked_by("u-2"));
        assert!(!post.liked_by("u-1"));
        assert_eq!(post.comment_count(), 0);
    }

    #[test]
    fn test_post_without_joins() {
        let body = r#"{
            "id": "post-1",
            "user_id": "u-1",
            "image_url": "https://img.example.com/1.jpg",
            "caption": null,
            "created_at": "2024-03-01T12:00:00+00:00",
            "updated_at": "2024-03-01T12:00:00+00:00"
        }"#;
        let post: Post = serde_json::from_str(body).unwrap();
        assert!(post.profiles.is_none());
        assert_eq!(post.like_count(), 0);
        assert_eq!(post.comment_count(), 0);
    }
}
