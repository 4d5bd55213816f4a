//! Feed card for a single post: author header, image, like/comment
//! actions, caption, and the comments link.

use api::{queries, Post};
use dioxus::prelude::*;

use crate::components::{use_toast, Avatar, ToastOptions};
use crate::icons::{FaComment, FaEllipsis, FaHeart};
use crate::optimistic::OptimisticToggle;
use crate::time::time_ago;
use crate::{use_auth, use_backend, Icon};

/// How long the heart overlay stays visible after a like.
const HEART_PULSE_MS: u64 = 300;

#[component]
pub fn PostCard(
    post: Post,
    on_open_post: EventHandler<String>,
    on_open_profile: EventHandler<String>,
    /// Raised after a like round-trip resolves, so the parent can refetch.
    #[props(default)]
    on_like_change: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();

    let state = auth();
    let liked = state
        .user_id()
        .map(|id| post.liked_by(id))
        .unwrap_or(false);
    let like_count = post.like_count();

    let mut toggle = use_signal(|| OptimisticToggle::new(liked, like_count));
    let mut heart = use_signal(|| false);

    // Reconcile when a refetch or a sign-in changes the underlying row.
    let mut seen = use_signal(|| (post.id.clone(), liked, like_count));
    if *seen.peek() != (post.id.clone(), liked, like_count) {
        seen.set((post.id.clone(), liked, like_count));
        toggle.write().reconcile(liked, like_count);
    }

    let heart_pulse = use_callback(move |()| {
        heart.set(true);
        spawn(async move {
            #[cfg(target_arch = "wasm32")]
            gloo_timers::future::sleep(std::time::Duration::from_millis(HEART_PULSE_MS)).await;
            #[cfg(not(target_arch = "wasm32"))]
            tokio::time::sleep(std::time::Duration::from_millis(HEART_PULSE_MS)).await;
            heart.set(false);
        });
    });

    let toggle_like = use_callback({
        let backend = backend.clone();
        let post_id = post.id.clone();
        move |()| {
            if auth().user.is_none() {
                toast.error("Please sign in to like posts".to_string(), ToastOptions::new());
                return;
            }
            heart_pulse.call(());
            let ticket = toggle.write().begin();
            let backend = backend.clone();
            let post_id = post_id.clone();
            spawn(async move {
                let result = if ticket.desired {
                    queries::like_post(&backend, &post_id).await
                } else {
                    queries::unlike_post(&backend, &post_id).await
                };
                match result {
                    Ok(()) => {
                        if !toggle.read().settle(&ticket) {
                            tracing::debug!("stale like completion for post {post_id} ignored");
                        }
                    }
                    Err(e) => {
                        tracing::warn!("like toggle for post {post_id} failed: {e}");
                        if toggle.write().rollback(&ticket) {
                            let message = if ticket.desired {
                                "Failed to like post"
                            } else {
                                "Failed to unlike post"
                            };
                            toast.error(message.to_string(), ToastOptions::new());
                        }
                    }
                }
                on_like_change.call(());
            });
        }
    });

    let author_name = post.author_username().unwrap_or("unknown").to_string();
    let author_avatar = post.profiles.as_ref().and_then(|p| p.avatar_url.clone());
    let author_initial = post
        .profiles
        .as_ref()
        .map(|p| p.initial())
        .unwrap_or_else(|| "U".to_string());
    let when = time_ago(post.created_at);
    let count = toggle().count();
    let likes_label = if count == 1 {
        "1 like".to_string()
    } else {
        format!("{count} likes")
    };

    rsx! {
        article {
            class: "post-card",
            header {
                class: "post-card__header",
                button {
                    class: "post-card__author",
                    onclick: {
                        let user_id = post.user_id.clone();
                        move |_| on_open_profile.call(user_id.clone())
                    },
                    Avatar {
                        image: author_avatar,
                        initial: author_initial,
                    }
                    div {
                        p { class: "post-card__username", "{author_name}" }
                        p { class: "post-card__time", "{when}" }
                    }
                }
                button {
                    class: "icon-button",
                    Icon { icon: FaEllipsis, width: 18, height: 18 }
                }
            }

            div {
                class: "post-card__media",
                ondoubleclick: move |_| {
                    if toggle().active() {
                        heart_pulse.call(());
                    } else {
                        toggle_like.call(());
                    }
                },
                img {
                    src: "{post.image_url}",
                    alt: post.caption.clone().unwrap_or_else(|| "Post image".to_string()),
                }
                if heart() {
                    div {
                        class: "post-card__heart-overlay",
                        Icon { icon: FaHeart, width: 96, height: 96 }
                    }
                }
            }

            div {
                class: "post-card__body",
                div {
                    class: "post-card__actions",
                    button {
                        class: if toggle().active() { "icon-button icon-button--liked" } else { "icon-button" },
                        onclick: move |_| toggle_like.call(()),
                        Icon { icon: FaHeart, width: 24, height: 24 }
                    }
                    button {
                        class: "icon-button",
                        onclick: {
                            let post_id = post.id.clone();
                            move |_| on_open_post.call(post_id.clone())
                        },
                        Icon { icon: FaComment, width: 24, height: 24 }
                    }
                }

                p { class: "post-card__likes", "{likes_label}" }

                if let Some(caption) = post.caption.as_ref().filter(|c| !c.is_empty()) {
                    p {
                        class: "post-card__caption",
                        strong { "{author_name}" }
                        " {caption}"
                    }
                }

                if post.comment_count() > 0 {
                    button {
                        class: "post-card__comments-link",
                        onclick: {
                            let post_id = post.id.clone();
                            move |_| on_open_post.call(post_id.clone())
                        },
                        "View all {post.comment_count()} comments"
                    }
                }
            }
        }
    }
}
