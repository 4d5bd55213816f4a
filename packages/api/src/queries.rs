//! # Typed remote operations
//!
//! One function per remote exchange the views perform. The views never
//! touch the raw builders; everything they need from the backend passes
//! through here, so the wire shapes live in a single place.
//!
//! ## Reads
//!
//! | Function | Tables | Notes |
//! |----------|--------|-------|
//! | [`fetch_feed`] | `follows`, `posts` | Followed users plus self, newest first. Falls back to a discover feed of everyone's newest posts when the viewer follows nobody. |
//! | [`fetch_post`] | `posts` | Single post with author and likes embedded. `Ok(None)` when absent. |
//! | [`fetch_comments`] | `comments` | Oldest first, author embedded. |
//! | [`fetch_profile`] / [`fetch_own_profile`] | `profiles` | By identity key. |
//! | [`fetch_profile_posts`] | `posts` | One user's posts with likes embedded, newest first. |
//! | [`follow_stats`] | `follows` | Exact counts, no row transfer. |
//! | [`is_following`] | `follows` | Membership check. |
//!
//! ## Mutations (all require a signed-in session)
//!
//! [`like_post`] / [`unlike_post`], [`follow_user`] / [`unfollow_user`],
//! [`add_comment`] (returns the confirmed row with its author embedded),
//! and [`create_post`].

use serde::Deserialize;

use crate::client::{Backend, Order};
use crate::error::Result;
use crate::models::{Comment, FollowStats, Post, Profile};

/// Most posts fetched for a following feed.
pub const FEED_LIMIT: u32 = 50;
/// Most posts fetched for the discover fallback.
pub const DISCOVER_LIMIT: u32 = 20;

/// Column list for feed cards: post plus author, likes, and comments.
pub const FEED_COLUMNS: &str = "*, profiles:user_id(*), likes(*), comments(*)";
/// Column list for the post detail view; comments are fetched separately.
pub const POST_COLUMNS: &str = "*, profiles:user_id(*), likes(*)";
/// Column list for comments with their author.
pub const COMMENT_COLUMNS: &str = "*, profiles:user_id(*)";
/// Column list for a profile's post grid; only like counts are shown there.
pub const GRID_COLUMNS: &str = "*, likes(*)";

/// A loaded feed page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub posts: Vec<Post>,
    /// True when this is the discover fallback rather than posts from
    /// followed users.
    pub discover: bool,
}

#[derive(Deserialize)]
struct FollowingId {
    following_id: String,
}

#[derive(Deserialize)]
struct RowId {
    #[allow(dead_code)]
    id: String,
}

/// Load the viewer's home feed.
///
/// Posts from followed users and the viewer's own, newest first, capped at
/// [`FEED_LIMIT`]. A viewer who follows nobody gets the discover fallback:
/// everyone's newest posts, capped at [`DISCOVER_LIMIT`].
pub async fn fetch_feed(backend: &Backend, viewer_id: &str) -> Result<Feed> {
    let following: Vec<FollowingId> = backend
        .select("follows")
        .columns("following_id")
        .eq("follower_id", viewer_id)
        .fetch()
        .await?;

    if following.is_empty() {
        let posts = backend
            .select("posts")
            .columns(FEED_COLUMNS)
            .order("created_at", Order::Desc)
            .limit(DISCOVER_LIMIT)
            .fetch()
            .await?;
        return Ok(Feed {
            posts,
            discover: true,
        });
    }

    let mut user_ids: Vec<String> = following.into_iter().map(|f| f.following_id).collect();
    user_ids.push(viewer_id.to_string());

    let posts = backend
        .select("posts")
        .columns(FEED_COLUMNS)
        .in_list("user_id", &user_ids)
        .order("created_at", Order::Desc)
        .limit(FEED_LIMIT)
        .fetch()
        .await?;
    Ok(Feed {
        posts,
        discover: false,
    })
}

/// One post with author and likes embedded.
pub async fn fetch_post(backend: &Backend, post_id: &str) -> Result<Option<Post>> {
    backend
        .select("posts")
        .columns(POST_COLUMNS)
        .eq("id", post_id)
        .fetch_optional()
        .await
}

/// A post's comments, oldest first, with authors embedded.
pub async fn fetch_comments(backend: &Backend, post_id: &str) -> Result<Vec<Comment>> {
    backend
        .select("comments")
        .columns(COMMENT_COLUMNS)
        .eq("post_id", post_id)
        .order("created_at", Order::Asc)
        .fetch()
        .await
}

/// One profile by identity key.
pub async fn fetch_profile(backend: &Backend, user_id: &str) -> Result<Option<Profile>> {
    backend
        .select("profiles")
        .eq("user_id", user_id)
        .fetch_optional()
        .await
}

/// The signed-in user's own profile; `Ok(None)` when signed out.
pub async fn fetch_own_profile(backend: &Backend) -> Result<Option<Profile>> {
    let Some(user) = backend.current_user() else {
        return Ok(None);
    };
    fetch_profile(backend, &user.id).await
}

/// One user's posts for the profile grid, newest first.
pub async fn fetch_profile_posts(backend: &Backend, user_id: &str) -> Result<Vec<Post>> {
    backend
        .select("posts")
        .columns(GRID_COLUMNS)
        .eq("user_id", user_id)
        .order("created_at", Order::Desc)
        .fetch()
        .await
}

/// Follower and following totals for a profile.
pub async fn follow_stats(backend: &Backend, user_id: &str) -> Result<FollowStats> {
    let followers = backend
        .select("follows")
        .columns("id")
        .eq("following_id", user_id)
        .count()
        .await?;
    let following = backend
        .select("follows")
        .columns("id")
        .eq("follower_id", user_id)
        .count()
        .await?;
    Ok(FollowStats {
        followers,
        following,
    })
}

/// Whether `follower_id` currently follows `following_id`.
pub async fn is_following(
    backend: &Backend,
    follower_id: &str,
    following_id: &str,
) -> Result<bool> {
    let row: Option<RowId> = backend
        .select("follows")
        .columns("id")
        .eq("follower_id", follower_id)
        .eq("following_id", following_id)
        .fetch_optional()
        .await?;
    Ok(row.is_some())
}

/// Insert the signed-in user's like on a post.
pub async fn like_post(backend: &Backend, post_id: &str) -> Result<()> {
    let user = backend.require_session()?.user;
    backend
        .insert(
            "likes",
            serde_json::json!({ "post_id": post_id, "user_id": user.id }),
        )
        .execute_unit()
        .await
}

/// Remove the signed-in user's like from a post.
pub async fn unlike_post(backend: &Backend, post_id: &str) -> Result<()> {
    let user = backend.require_session()?.user;
    backend
        .delete("likes")
        .eq("post_id", post_id)
        .eq("user_id", &user.id)
        .execute_unit()
        .await
}

/// Follow another user.
pub async fn follow_user(backend: &Backend, following_id: &str) -> Result<()> {
    let user = backend.require_session()?.user;
    backend
        .insert(
            "follows",
            serde_json::json!({ "follower_id": user.id, "following_id": following_id }),
        )
        .execute_unit()
        .await
}

/// Stop following another user.
pub async fn unfollow_user(backend: &Backend, following_id: &str) -> Result<()> {
    let user = backend.require_session()?.user;
    backend
        .delete("follows")
        .eq("follower_id", &user.id)
        .eq("following_id", following_id)
        .execute_unit()
        .await
}

/// Add a comment and return the server-confirmed row with its author
/// embedded. `content` is stored as given; callers trim first.
pub async fn add_comment(backend: &Backend, post_id: &str, content: &str) -> Result<Comment> {
    let user = backend.require_session()?.user;
    backend
        .insert(
            "comments",
            serde_json::json!({
                "post_id": post_id,
                "user_id": user.id,
                "content": content,
            }),
        )
        .returning(COMMENT_COLUMNS)
        .execute()
        .await
}

/// Create a post. The feed picks it up on its next load; nothing is
/// returned here.
pub async fn create_post(backend: &Backend, image_url: &str, caption: Option<&str>) -> Result<()> {
    let user = backend.require_session()?.user;
    backend
        .insert(
            "posts",
            serde_json::json!({
                "user_id": user.id,
                "image_url": image_url,
                "caption": caption,
            }),
        )
        .execute_unit()
        .await
}
