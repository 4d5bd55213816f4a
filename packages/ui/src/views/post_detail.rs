//! Single-post page: full image, author, caption, the comment thread in
//! ascending order, like toggle, and the comment composer.

use api::{queries, Comment, Post};
use dioxus::prelude::*;

use crate::components::{use_toast, Avatar, Input, Skeleton, ToastOptions};
use crate::icons::{FaArrowLeft, FaComment, FaHeart, FaPaperPlane};
use crate::optimistic::{OptimisticToggle, PendingAppend};
use crate::time::time_ago;
use crate::{use_auth, use_backend, Icon};

const HEART_PULSE_MS: u64 = 300;

#[component]
pub fn PostDetailView(
    post_id: String,
    on_back: EventHandler<()>,
    on_open_profile: EventHandler<String>,
) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();

    // Track the route param so navigating between posts reloads.
    let mut id_signal = use_signal(|| post_id.clone());
    if *id_signal.peek() != post_id {
        id_signal.set(post_id.clone());
    }

    let mut toggle = use_signal(|| OptimisticToggle::new(false, 0));
    let mut pending: Signal<PendingAppend<Comment>> = use_signal(|| PendingAppend::new(Vec::new()));
    let mut new_comment = use_signal(String::new);
    let mut heart = use_signal(|| false);

    let detail: Resource<Option<Post>> = use_resource(move || {
        let backend = backend.clone();
        async move {
            let id = id_signal();
            let viewer = auth().user_id().map(str::to_string);
            let post = match queries::fetch_post(&backend, &id).await {
                Ok(post) => post,
                Err(e) => {
                    tracing::warn!("post {id} load failed: {e}");
                    None
                }
            };
            let comments = match queries::fetch_comments(&backend, &id).await {
                Ok(comments) => comments,
                Err(e) => {
                    tracing::warn!("comments for post {id} load failed: {e}");
                    Vec::new()
                }
            };
            if let Some(post) = &post {
                let liked = viewer
                    .as_deref()
                    .map(|viewer| post.liked_by(viewer))
                    .unwrap_or(false);
                toggle.write().reconcile(liked, post.like_count());
            }
            pending.write().reset(comments);
            post
        }
    });

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
        let backend = use_backend();
        move |()| {
            if auth().user.is_none() {
                toast.error("Please sign in to like posts".to_string(), ToastOptions::new());
                return;
            }
            heart_pulse.call(());
            let ticket = toggle.write().begin();
            let backend = backend.clone();
            let post_id = id_signal.peek().clone();
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
            });
        }
    });

    let handle_comment = {
        let backend = use_backend();
        move |evt: FormEvent| {
            evt.prevent_default();
            if auth().user.is_none() {
                toast.error("Please sign in to comment".to_string(), ToastOptions::new());
                return;
            }
            let Some(ticket) = pending.write().try_begin(&new_comment()) else {
                return;
            };
            let backend = backend.clone();
            let post_id = id_signal.peek().clone();
            spawn(async move {
                match queries::add_comment(&backend, &post_id, &ticket.content).await {
                    Ok(row) => {
                        if pending.write().commit(&ticket, row) {
                            new_comment.set(String::new());
                            toast.success("Comment added!".to_string(), ToastOptions::new());
                        } else {
                            tracing::debug!("stale comment completion for post {post_id} ignored");
                        }
                    }
                    Err(e) => {
                        tracing::warn!("comment on post {post_id} failed: {e}");
                        if pending.write().abort(&ticket) {
                            toast.error("Failed to add comment".to_string(), ToastOptions::new());
                        }
                    }
                }
            });
        }
    };

    let state = auth();
    if state.loading || detail().is_none() {
        return rsx! {
            div {
                class: "post-detail",
                Skeleton { class: "skeleton--media" }
            }
        };
    }
    if state.user.is_none() {
        // The route wrapper redirects to the auth page.
        return rsx! {};
    }

    let Some(Some(post)) = detail() else {
        return rsx! {
            div {
                class: "not-found",
                h2 { "Post not found" }
                p { "This post doesn't exist." }
            }
        };
    };

    let author_name = post.author_username().unwrap_or("unknown").to_string();
    let author_avatar = post.profiles.as_ref().and_then(|p| p.avatar_url.clone());
    let author_initial = post
        .profiles
        .as_ref()
        .map(|p| p.initial())
        .unwrap_or_else(|| "U".to_string());
    let count = toggle().count();
    let likes_label = if count == 1 {
        "1 like".to_string()
    } else {
        format!("{count} likes")
    };
    let composer_blank = new_comment().trim().is_empty();

    rsx! {
        div {
            class: "post-detail",
            button {
                class: "post-detail__back",
                onclick: move |_| on_back.call(()),
                Icon { icon: FaArrowLeft, width: 14, height: 14 }
                "Back to feed"
            }

            div {
                class: "card post-detail__card",
                div {
                    class: "post-detail__media",
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
                    class: "post-detail__side",
                    header {
                        class: "post-detail__author",
                        button {
                            class: "post-card__author",
                            onclick: {
                                let user_id = post.user_id.clone();
                                move |_| on_open_profile.call(user_id.clone())
                            },
                            Avatar {
                                image: author_avatar.clone(),
                                initial: author_initial.clone(),
                            }
                            div {
                                p { class: "post-card__username", "{author_name}" }
                                p { class: "post-card__time", "{time_ago(post.created_at)}" }
                            }
                        }
                    }

                    div {
                        class: "post-detail__thread",
                        if let Some(caption) = post.caption.as_ref().filter(|c| !c.is_empty()) {
                            div {
                                class: "comment",
                                Avatar {
                                    image: author_avatar.clone(),
                                    initial: author_initial.clone(),
                                    class: "avatar--small",
                                }
                                div {
                                    p {
                                        class: "comment__text",
                                        strong { "{author_name}" }
                                        " {caption}"
                                    }
                                }
                            }
                        }

                        for comment in pending().rows().to_vec() {
                            CommentRow {
                                key: "{comment.id}",
                                comment,
                                on_open_profile,
                            }
                        }
                    }

                    div {
                        class: "post-detail__actions",
                        div {
                            class: "post-card__actions",
                            button {
                                class: if toggle().active() { "icon-button icon-button--liked" } else { "icon-button" },
                                onclick: move |_| toggle_like.call(()),
                                Icon { icon: FaHeart, width: 24, height: 24 }
                            }
                            button {
                                class: "icon-button",
                                Icon { icon: FaComment, width: 24, height: 24 }
                            }
                        }
                        p { class: "post-card__likes", "{likes_label}" }

                        form {
                            class: "comment-form",
                            onsubmit: handle_comment,
                            Input {
                                class: "comment-form__input",
                                placeholder: "Add a comment...",
                                value: new_comment(),
                                oninput: move |evt: FormEvent| new_comment.set(evt.value()),
                            }
                            button {
                                class: "icon-button",
                                r#type: "submit",
                                disabled: composer_blank || pending().in_flight(),
                                Icon { icon: FaPaperPlane, width: 20, height: 20 }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CommentRow(comment: Comment, on_open_profile: EventHandler<String>) -> Element {
    let username = comment
        .profiles
        .as_ref()
        .map(|p| p.username.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let avatar_image = comment.profiles.as_ref().and_then(|p| p.avatar_url.clone());
    let initial = comment
        .profiles
        .as_ref()
        .map(|p| p.initial())
        .unwrap_or_else(|| "U".to_string());

    rsx! {
        div {
            class: "comment",
            button {
                class: "comment__avatar",
                onclick: {
                    let user_id = comment.user_id.clone();
                    move |_| on_open_profile.call(user_id.clone())
                },
                Avatar {
                    image: avatar_image,
                    initial,
                    class: "avatar--small",
                }
            }
            div {
                p {
                    class: "comment__text",
                    strong { "{username}" }
                    " {comment.content}"
                }
                p { class: "comment__time", "{time_ago(comment.created_at)}" }
            }
        }
    }
}
