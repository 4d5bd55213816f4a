//! Profile page: identity header, follow stats, follow toggle, and the
//! 3-column posts grid.

use api::{queries, FollowStats, Post, Profile};
use dioxus::prelude::*;

use crate::components::{use_toast, Avatar, Button, ButtonVariant, Skeleton, ToastOptions};
use crate::icons::{FaCamera, FaGear, FaTableCells, FaUserMinus, FaUserPlus};
use crate::optimistic::OptimisticToggle;
use crate::{use_auth, use_backend, Icon};

#[derive(Clone, Debug, PartialEq)]
struct ProfileData {
    profile: Profile,
    posts: Vec<Post>,
    stats: FollowStats,
}

#[component]
pub fn ProfileView(user_id: String, on_open_post: EventHandler<String>) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();

    // Track the route param so navigating between profiles reloads.
    let mut id_signal = use_signal(|| user_id.clone());
    if *id_signal.peek() != user_id {
        id_signal.set(user_id.clone());
    }

    // Membership plus the followers counter it drives.
    let mut follow = use_signal(|| OptimisticToggle::new(false, 0));

    let data: Resource<Option<ProfileData>> = use_resource(move || {
        let backend = backend.clone();
        async move {
            let target = id_signal();
            let viewer = auth().user_id().map(str::to_string);
            let profile = match queries::fetch_profile(&backend, &target).await {
                Ok(profile) => profile?,
                Err(e) => {
                    tracing::warn!("profile {target} load failed: {e}");
                    return None;
                }
            };
            let posts = match queries::fetch_profile_posts(&backend, &target).await {
                Ok(posts) => posts,
                Err(e) => {
                    tracing::warn!("posts for profile {target} load failed: {e}");
                    Vec::new()
                }
            };
            let stats = match queries::follow_stats(&backend, &target).await {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::warn!("follow stats for profile {target} load failed: {e}");
                    FollowStats::default()
                }
            };
            let viewer_follows = match viewer.as_deref() {
                Some(viewer) if viewer != target => {
                    match queries::is_following(&backend, viewer, &target).await {
                        Ok(following) => following,
                        Err(e) => {
                            tracing::warn!("follow check for profile {target} failed: {e}");
                            false
                        }
                    }
                }
                _ => false,
            };
            follow.write().reconcile(viewer_follows, stats.followers);
            Some(ProfileData {
                profile,
                posts,
                stats,
            })
        }
    });

    let follow_toggle = use_callback({
        let backend = use_backend();
        move |()| {
            if auth().user.is_none() {
                toast.error("Please sign in to follow users".to_string(), ToastOptions::new());
                return;
            }
            let ticket = follow.write().begin();
            let backend = backend.clone();
            let target = id_signal.peek().clone();
            spawn(async move {
                let result = if ticket.desired {
                    queries::follow_user(&backend, &target).await
                } else {
                    queries::unfollow_user(&backend, &target).await
                };
                match result {
                    Ok(()) => {
                        if follow.read().settle(&ticket) {
                            let message = if ticket.desired {
                                "Following!"
                            } else {
                                "Unfollowed successfully"
                            };
                            toast.success(message.to_string(), ToastOptions::new());
                        } else {
                            tracing::debug!("stale follow completion for {target} ignored");
                        }
                    }
                    Err(e) => {
                        tracing::warn!("follow toggle for {target} failed: {e}");
                        if follow.write().rollback(&ticket) {
                            let message = if ticket.desired {
                                "Failed to follow user"
                            } else {
                                "Failed to unfollow user"
                            };
                            toast.error(message.to_string(), ToastOptions::new());
                        }
                    }
                }
            });
        }
    });

    let state = auth();
    if state.loading || data().is_none() {
        return rsx! {
            div {
                class: "profile",
                div {
                    class: "profile__header",
                    Skeleton { class: "skeleton--avatar-large" }
                    div {
                        Skeleton { class: "skeleton--line skeleton--w40" }
                        Skeleton { class: "skeleton--line" }
                        Skeleton { class: "skeleton--line skeleton--w24" }
                    }
                }
            }
        };
    }
    if state.user.is_none() {
        // The route wrapper redirects to the auth page.
        return rsx! {};
    }

    let Some(Some(data)) = data() else {
        return rsx! {
            div {
                class: "not-found",
                h2 { "User not found" }
                p { "This profile doesn't exist." }
            }
        };
    };

    let own_profile = state.user_id() == Some(id_signal().as_str());
    let profile = &data.profile;
    let following = follow().active();

    rsx! {
        div {
            class: "profile",
            div {
                class: "profile__header",
                Avatar {
                    image: profile.avatar_url.clone(),
                    initial: profile.initial(),
                    class: "avatar--large",
                }

                div {
                    class: "profile__identity",
                    div {
                        class: "profile__name-row",
                        h1 { "{profile.username}" }
                        if own_profile {
                            Button {
                                variant: ButtonVariant::Outline,
                                Icon { icon: FaGear, width: 14, height: 14 }
                                "Edit Profile"
                            }
                        } else {
                            Button {
                                variant: if following { ButtonVariant::Outline } else { ButtonVariant::Primary },
                                onclick: move |_| follow_toggle.call(()),
                                if following {
                                    Icon { icon: FaUserMinus, width: 14, height: 14 }
                                    "Unfollow"
                                } else {
                                    Icon { icon: FaUserPlus, width: 14, height: 14 }
                                    "Follow"
                                }
                            }
                        }
                    }

                    div {
                        class: "profile__stats",
                        div {
                            class: "profile__stat",
                            p { class: "profile__stat-value", "{data.posts.len()}" }
                            p { class: "profile__stat-label", "posts" }
                        }
                        div {
                            class: "profile__stat",
                            p { class: "profile__stat-value", "{follow().count()}" }
                            p { class: "profile__stat-label", "followers" }
                        }
                        div {
                            class: "profile__stat",
                            p { class: "profile__stat-value", "{data.stats.following}" }
                            p { class: "profile__stat-label", "following" }
                        }
                    }

                    if let Some(full_name) = profile.full_name.as_ref().filter(|n| !n.is_empty()) {
                        p { class: "profile__full-name", "{full_name}" }
                    }
                    if let Some(bio) = profile.bio.as_ref().filter(|b| !b.is_empty()) {
                        p { class: "profile__bio", "{bio}" }
                    }
                }
            }

            div {
                class: "profile__grid-section",
                div {
                    class: "profile__grid-title",
                    Icon { icon: FaTableCells, width: 14, height: 14 }
                    span { "Posts" }
                }

                if data.posts.is_empty() {
                    div {
                        class: "empty-state",
                        span {
                            class: "empty-state__icon",
                            Icon { icon: FaCamera, width: 48, height: 48 }
                        }
                        h3 { "No Posts Yet" }
                        if own_profile {
                            p { "Share your first photo to get started!" }
                        }
                    }
                } else {
                    div {
                        class: "profile__grid",
                        for post in data.posts.iter() {
                            button {
                                key: "{post.id}",
                                class: "grid-tile",
                                onclick: {
                                    let post_id = post.id.clone();
                                    move |_| on_open_post.call(post_id.clone())
                                },
                                img {
                                    src: "{post.image_url}",
                                    alt: post.caption.clone().unwrap_or_else(|| "Post".to_string()),
                                }
                                span {
                                    class: "grid-tile__overlay",
                                    "❤️ {post.like_count()}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
