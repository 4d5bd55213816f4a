use dioxus::prelude::*;

/// Gray pulsing placeholder block shown while a resource loads.
#[component]
pub fn Skeleton(#[props(default)] class: String) -> Element {
    rsx! {
        div { class: "skeleton {class}" }
    }
}
