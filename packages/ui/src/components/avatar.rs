use dioxus::prelude::*;

/// Round avatar with an initial-letter fallback when no image is set.
#[component]
pub fn Avatar(
    #[props(default)] image: Option<String>,
    initial: String,
    #[props(default)] class: String,
) -> Element {
    match image.filter(|url| !url.is_empty()) {
        Some(url) => rsx! {
            img {
                class: "avatar {class}",
                src: "{url}",
                alt: "avatar",
            }
        },
        None => rsx! {
            span {
                class: "avatar avatar--fallback {class}",
                "{initial}"
            }
        },
    }
}
