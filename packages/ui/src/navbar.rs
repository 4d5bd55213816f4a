//! Top navigation bar shown on every page.

use dioxus::prelude::*;

use crate::components::{Avatar, Button, ButtonVariant};
use crate::icons::{FaCamera, FaHouse, FaMagnifyingGlass, FaRightFromBracket, FaSquarePlus, FaUser};
use crate::{use_auth, use_backend, Icon};

/// Which navbar button reflects the active route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NavSection {
    #[default]
    None,
    Home,
    Create,
}

#[component]
pub fn Navbar(
    #[props(default)] section: NavSection,
    on_home: EventHandler<()>,
    on_create: EventHandler<()>,
    on_profile: EventHandler<String>,
    on_auth: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let mut menu_open = use_signal(|| false);

    let state = auth();
    let avatar_image = state.profile.as_ref().and_then(|p| p.avatar_url.clone());
    let avatar_initial = state
        .profile
        .as_ref()
        .map(|p| p.initial())
        .unwrap_or_else(|| "U".to_string());

    let nav_class = |active: bool| {
        if active {
            "icon-button icon-button--active"
        } else {
            "icon-button"
        }
    };

    rsx! {
        nav {
            class: "navbar",
            div {
                class: "navbar__inner",
                button {
                    class: "navbar__brand",
                    onclick: move |_| on_home.call(()),
                    span {
                        class: "navbar__brand-icon",
                        Icon { icon: FaCamera, width: 18, height: 18 }
                    }
                    span { class: "navbar__brand-name", "Lightbox" }
                }

                div {
                    class: "navbar__search",
                    Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                    input {
                        r#type: "text",
                        placeholder: "Search users...",
                    }
                }

                div {
                    class: "navbar__links",
                    button {
                        class: nav_class(section == NavSection::Home),
                        onclick: move |_| on_home.call(()),
                        Icon { icon: FaHouse, width: 20, height: 20 }
                    }
                    button {
                        class: nav_class(section == NavSection::Create),
                        onclick: move |_| on_create.call(()),
                        Icon { icon: FaSquarePlus, width: 20, height: 20 }
                    }

                    if let Some(user) = state.user.as_ref() {
                        button {
                            class: "navbar__avatar",
                            onclick: move |_| {
                                let open = *menu_open.peek();
                                menu_open.set(!open);
                            },
                            Avatar {
                                image: avatar_image.clone(),
                                initial: avatar_initial.clone(),
                                class: "avatar--small",
                            }
                        }
                        if menu_open() {
                            div {
                                class: "navbar__menu-backdrop",
                                onclick: move |_| menu_open.set(false),
                            }
                            div {
                                class: "navbar__menu",
                                button {
                                    class: "navbar__menu-item",
                                    onclick: {
                                        let user_id = user.id.clone();
                                        move |_| {
                                            menu_open.set(false);
                                            on_profile.call(user_id.clone());
                                        }
                                    },
                                    Icon { icon: FaUser, width: 14, height: 14 }
                                    "Profile"
                                }
                                button {
                                    class: "navbar__menu-item navbar__menu-item--destructive",
                                    onclick: {
                                        let backend = backend.clone();
                                        move |_| {
                                            menu_open.set(false);
                                            let backend = backend.clone();
                                            spawn(async move {
                                                crate::auth::sign_out(&backend, auth).await;
                                                on_auth.call(());
                                            });
                                        }
                                    },
                                    Icon { icon: FaRightFromBracket, width: 14, height: 14 }
                                    "Sign out"
                                }
                            }
                        }
                    } else {
                        Button {
                            variant: ButtonVariant::Primary,
                            onclick: move |_| on_auth.call(()),
                            "Sign in"
                        }
                    }
                }
            }
        }
    }
}
