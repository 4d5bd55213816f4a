//! Home feed: posts from followed users plus the viewer's own, newest
//! first. Falls back to a discover selection while following nobody.

use api::queries::{self, Feed};
use dioxus::prelude::*;

use crate::components::{Button, ButtonVariant, Skeleton};
use crate::icons::{FaCamera, FaUsers};
use crate::post_card::PostCard;
use crate::{use_auth, use_backend, Icon};

#[component]
pub fn FeedView(
    on_open_post: EventHandler<String>,
    on_open_profile: EventHandler<String>,
    on_create: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let backend = use_backend();

    let mut feed: Signal<Option<Feed>> = use_signal(|| None);
    let reload = use_signal(|| 0u32);

    let _loader = use_resource(move || {
        let backend = backend.clone();
        async move {
            let _ = reload();
            let Some(viewer) = auth().user_id().map(str::to_string) else {
                return;
            };
            match queries::fetch_feed(&backend, &viewer).await {
                Ok(fresh) => feed.set(Some(fresh)),
                Err(e) => {
                    tracing::warn!("feed load failed: {e}");
                    feed.set(Some(Feed::default()));
                }
            }
        }
    });

    let refetch = use_callback(move |()| {
        let mut reload = reload;
        let n = *reload.peek();
        reload.set(n + 1);
    });

    let state = auth();
    if state.loading {
        return rsx! {
            div {
                class: "splash",
                Icon { icon: FaCamera, width: 48, height: 48 }
            }
        };
    }
    if state.user.is_none() {
        // The route wrapper redirects to the auth page.
        return rsx! {};
    }

    let Some(loaded) = feed() else {
        return rsx! {
            div {
                class: "feed",
                for i in 0..3 {
                    div {
                        key: "{i}",
                        class: "post-card post-card--skeleton",
                        div {
                            class: "post-card__header",
                            Skeleton { class: "skeleton--avatar" }
                            div {
                                Skeleton { class: "skeleton--line skeleton--w24" }
                                Skeleton { class: "skeleton--line skeleton--w16" }
                            }
                        }
                        Skeleton { class: "skeleton--media" }
                        div {
                            class: "post-card__body",
                            Skeleton { class: "skeleton--line skeleton--w20" }
                            Skeleton { class: "skeleton--line" }
                        }
                    }
                }
            }
        };
    };

    if loaded.posts.is_empty() {
        return rsx! {
            div {
                class: "feed",
                div {
                    class: "empty-state",
                    span {
                        class: "empty-state__icon",
                        Icon { icon: FaUsers, width: 48, height: 48 }
                    }
                    h2 { "Your feed is empty" }
                    p { "Start following people to see their posts here, or create your first post!" }
                    Button {
                        variant: ButtonVariant::Primary,
                        onclick: move |_| on_create.call(()),
                        Icon { icon: FaCamera, width: 16, height: 16 }
                        "Create Post"
                    }
                }
            }
        };
    }

    rsx! {
        div {
            class: "feed",
            if loaded.discover {
                h2 { class: "feed__discover", "Discover" }
            }
            for post in loaded.posts {
                PostCard {
                    key: "{post.id}",
                    post: post.clone(),
                    on_open_post,
                    on_open_profile,
                    on_like_change: move |_| refetch.call(()),
                }
            }
        }
    }
}
